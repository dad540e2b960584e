//! Short data-driven findings shown under each dashboard tab.

use crate::analyzers::regression::LinearFit;
use crate::analyzers::types::{BoxSummary, GroupMean, Insight, Tab};
use crate::records::{TEMP_CELSIUS_SCALE, month_label, weather_label};

fn peak<K>(groups: &[GroupMean<K>]) -> Option<&GroupMean<K>> {
    groups.iter().max_by(|a, b| a.total.total_cmp(&b.total))
}

fn trough<K>(groups: &[GroupMean<K>]) -> Option<&GroupMean<K>> {
    groups.iter().min_by(|a, b| a.total.total_cmp(&b.total))
}

fn insight(tab: Tab, text: String) -> Insight {
    Insight { tab, text }
}

pub fn month_insights(by_month: &[GroupMean<u8>], by_season: &[BoxSummary]) -> Vec<Insight> {
    let mut out = Vec::new();

    if let Some(top) = peak(by_month) {
        out.push(insight(
            Tab::MonthsAndSeason,
            format!(
                "Rentals peak in {} with {:.0} rentals per hour on average.",
                month_label(top.key),
                top.total
            ),
        ));
    }

    if let Some(top) = by_season
        .iter()
        .max_by(|a, b| a.median.total_cmp(&b.median))
    {
        out.push(insight(
            Tab::MonthsAndSeason,
            format!(
                "{} has the highest median daily rentals ({:.0}).",
                top.label, top.median
            ),
        ));
    }

    out
}

pub fn hour_insights(by_hour: &[GroupMean<u8>]) -> Vec<Insight> {
    let mut out = Vec::new();

    if let Some(top) = peak(by_hour) {
        out.push(insight(
            Tab::TimeOfDay,
            format!(
                "The busiest hour is {:02}:00 with {:.0} rentals on average.",
                top.key, top.total
            ),
        ));
    }

    let registered: f64 = by_hour.iter().map(|g| g.registered).sum();
    let total: f64 = by_hour.iter().map(|g| g.total).sum();
    if total > 0.0 {
        out.push(insight(
            Tab::TimeOfDay,
            format!(
                "Registered users account for {:.0}% of hourly rentals.",
                registered / total * 100.0
            ),
        ));
    }

    out
}

pub fn temperature_insights(fit: &LinearFit, correlation: Option<f64>) -> Vec<Insight> {
    let mut out = Vec::new();

    if let Some(r) = correlation {
        let direction = if r >= 0.0 { "positively" } else { "negatively" };
        out.push(insight(
            Tab::Temperature,
            format!("Temperature and daily rentals are {direction} correlated (r = {r:.2})."),
        ));
    }

    out.push(insight(
        Tab::Temperature,
        format!(
            "Each additional °C changes daily rentals by about {:.0} (R² = {:.2}).",
            fit.slope / TEMP_CELSIUS_SCALE,
            fit.r_squared
        ),
    ));

    out
}

pub fn weather_insights(by_weather: &[GroupMean<u8>]) -> Vec<Insight> {
    let mut out = Vec::new();

    if let (Some(best), Some(worst)) = (peak(by_weather), trough(by_weather)) {
        out.push(insight(
            Tab::Weather,
            format!(
                "Rentals are highest in weather condition {} ({}) at {:.0} per hour.",
                best.key,
                weather_label(best.key),
                best.total
            ),
        ));
        if best.key != worst.key {
            out.push(insight(
                Tab::Weather,
                format!(
                    "Rentals are lowest in weather condition {} ({}) at {:.0} per hour.",
                    worst.key,
                    weather_label(worst.key),
                    worst.total
                ),
            ));
        }
    }

    out
}
