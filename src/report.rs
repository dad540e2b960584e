//! Self-contained HTML dashboard rendered from an embedded `tera` template.
//!
//! Tabs are plain CSS (radio inputs + sibling selectors), charts are inlined
//! SVG, so the page needs no scripts or external assets.

use anyhow::{Context as _, Result};
use chrono::Utc;
use serde::Serialize;
use tera::{Context, Tera};

use crate::analyzers::analyzer::Analysis;
use crate::analyzers::types::{DatasetSummary, Tab};
use crate::charts::Chart;
use crate::records::{DailyRecord, HourlyRecord, weather_description};

/// Rows of each dataset shown in the overview tables.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

const TEMPLATE_NAME: &str = "dashboard.html";

const SUMMARY_HEADERS: [&str; 9] = [
    "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
];
const HOURLY_HEADERS: [&str; 11] = [
    "instant", "dteday", "hr", "season", "mnth", "weathersit", "temp", "hum", "casual",
    "registered", "cnt",
];
const DAILY_HEADERS: [&str; 10] = [
    "instant", "dteday", "season", "mnth", "weathersit", "temp", "hum", "casual", "registered",
    "cnt",
];

/// One dataset column of the overview: summary statistics plus a preview.
#[derive(Debug, Serialize)]
struct DatasetView {
    title: &'static str,
    rows: usize,
    span: String,
    summary: Vec<Vec<String>>,
    preview_headers: &'static [&'static str],
    preview: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct TabView<'a> {
    slug: &'static str,
    title: &'static str,
    charts: Vec<&'a Chart>,
    weather_conditions: Vec<&'static str>,
    fit: Option<String>,
    insights: Vec<&'a str>,
}

fn daily_rows(rows: &[DailyRecord], limit: usize) -> Vec<Vec<String>> {
    rows.iter()
        .take(limit)
        .map(|r| {
            vec![
                r.instant.to_string(),
                r.dteday.to_string(),
                r.season.to_string(),
                r.mnth.to_string(),
                r.weathersit.to_string(),
                format!("{:.4}", r.temp),
                format!("{:.4}", r.hum),
                r.casual.to_string(),
                r.registered.to_string(),
                r.cnt.to_string(),
            ]
        })
        .collect()
}

fn hourly_rows(rows: &[HourlyRecord], limit: usize) -> Vec<Vec<String>> {
    rows.iter()
        .take(limit)
        .map(|r| {
            vec![
                r.instant.to_string(),
                r.dteday.to_string(),
                r.hr.to_string(),
                r.season.to_string(),
                r.mnth.to_string(),
                r.weathersit.to_string(),
                format!("{:.2}", r.temp),
                format!("{:.2}", r.hum),
                r.casual.to_string(),
                r.registered.to_string(),
                r.cnt.to_string(),
            ]
        })
        .collect()
}

fn summary_rows(summary: &DatasetSummary) -> Vec<Vec<String>> {
    summary
        .columns
        .iter()
        .map(|c| {
            vec![
                c.column.clone(),
                c.count.to_string(),
                format!("{:.2}", c.mean),
                format!("{:.2}", c.std),
                format!("{:.2}", c.min),
                format!("{:.2}", c.p25),
                format!("{:.2}", c.p50),
                format!("{:.2}", c.p75),
                format!("{:.2}", c.max),
            ]
        })
        .collect()
}

fn date_span(summary: &DatasetSummary) -> String {
    match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => "no rows".to_string(),
    }
}

fn tab_view<'a>(tab: Tab, analysis: &'a Analysis, charts: &'a [Chart]) -> TabView<'a> {
    let weather_conditions = if tab == Tab::Weather {
        (1..=4).map(weather_description).collect()
    } else {
        Vec::new()
    };

    let fit = (tab == Tab::Temperature).then(|| {
        let fit = &analysis.fit;
        format!(
            "Least-squares fit: cnt = {:.1} + {:.1} · temp (R² = {:.3}, n = {})",
            fit.intercept, fit.slope, fit.r_squared, fit.observations
        )
    });

    TabView {
        slug: tab.slug(),
        title: tab.title(),
        charts: charts.iter().filter(|c| c.tab == Some(tab)).collect(),
        weather_conditions,
        fit,
        insights: analysis
            .insights
            .iter()
            .filter(|i| i.tab == tab)
            .map(|i| i.text.as_str())
            .collect(),
    }
}

/// Renders the dashboard page.
///
/// # Errors
///
/// Returns an error if the embedded template fails to parse or render.
pub fn build_dashboard(
    analysis: &Analysis,
    charts: &[Chart],
    daily: &[DailyRecord],
    hourly: &[HourlyRecord],
    preview_rows: usize,
) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, include_str!("../templates/dashboard.html"))
        .context("failed to load dashboard template")?;

    let datasets = [
        DatasetView {
            title: "Hourly Data",
            rows: analysis.hourly_summary.rows,
            span: date_span(&analysis.hourly_summary),
            summary: summary_rows(&analysis.hourly_summary),
            preview_headers: &HOURLY_HEADERS,
            preview: hourly_rows(hourly, preview_rows),
        },
        DatasetView {
            title: "Daily Data",
            rows: analysis.daily_summary.rows,
            span: date_span(&analysis.daily_summary),
            summary: summary_rows(&analysis.daily_summary),
            preview_headers: &DAILY_HEADERS,
            preview: daily_rows(daily, preview_rows),
        },
    ];
    let overview_charts: Vec<&Chart> = charts.iter().filter(|c| c.tab.is_none()).collect();
    let tabs: Vec<TabView> = Tab::ALL
        .iter()
        .map(|tab| tab_view(*tab, analysis, charts))
        .collect();

    let mut context = Context::new();
    context.insert(
        "generated_at",
        &Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
    );
    context.insert("summary_headers", &SUMMARY_HEADERS);
    context.insert("datasets", &datasets);
    context.insert("overview_charts", &overview_charts);
    context.insert("tabs", &tabs);

    tera.render(TEMPLATE_NAME, &context)
        .context("failed to render dashboard")
}
