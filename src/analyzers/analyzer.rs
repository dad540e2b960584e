use crate::analyzers::aggregate::{
    TREND_WINDOW, box_summary, column_summary, group_means, group_values, moving_average,
};
use crate::analyzers::insights::{
    hour_insights, month_insights, temperature_insights, weather_insights,
};
use crate::analyzers::quartile::{QUARTILE_LABELS, QuartileBins};
use crate::analyzers::regression::LinearFit;
use crate::analyzers::types::{BoxSummary, DatasetSummary, DerivedDay, GroupMean, Insight};
use crate::analyzers::utility::correlation;
use crate::records::{DailyRecord, HourlyRecord, season_label};
use anyhow::{Result, anyhow};
use serde::Serialize;
use tracing::{debug, info};

/// Everything the dashboard shows, computed from the two datasets.
#[derive(Debug, Serialize)]
pub struct Analysis {
    pub daily_summary: DatasetSummary,
    pub hourly_summary: DatasetSummary,
    pub fit: LinearFit,
    pub correlation: Option<f64>,
    pub quartile_edges: [f64; 5],
    pub by_month: Vec<GroupMean<u8>>,
    pub by_hour: Vec<GroupMean<u8>>,
    pub by_weather: Vec<GroupMean<u8>>,
    pub by_season_mean: Vec<GroupMean<u8>>,
    pub by_season: Vec<BoxSummary>,
    pub by_temperature: Vec<BoxSummary>,
    pub insights: Vec<Insight>,
    #[serde(skip)]
    pub derived: Vec<DerivedDay>,
}

/// Runs every aggregation and the temperature regression.
///
/// Daily rows are expected in date order; the moving average follows row
/// order as loaded.
#[tracing::instrument(skip_all, fields(days = daily.len(), hours = hourly.len()))]
pub fn analyze(daily: &[DailyRecord], hourly: &[HourlyRecord]) -> Result<Analysis> {
    let cnt: Vec<f64> = daily.iter().map(|d| f64::from(d.cnt)).collect();
    let temp: Vec<f64> = daily.iter().map(|d| d.temp).collect();

    let trend = moving_average(&cnt, TREND_WINDOW);

    let fit = LinearFit::fit(&temp, &cnt)?;
    let r = correlation(&temp, &cnt);
    info!(
        intercept = fit.intercept,
        slope = fit.slope,
        r_squared = fit.r_squared,
        "Fitted rentals ~ temperature"
    );

    let bins = QuartileBins::fit(&temp)?;
    debug!(edges = ?bins.edges, "Temperature quartile edges");

    let categories: Vec<usize> = daily
        .iter()
        .map(|d| {
            bins.index(d.temp).ok_or_else(|| {
                anyhow!("temperature {} of {} falls outside every quartile", d.temp, d.dteday)
            })
        })
        .collect::<Result<_>>()?;

    let predicted = fit.predict_all(&temp);
    let derived: Vec<DerivedDay> = daily
        .iter()
        .zip(trend.iter().zip(&predicted))
        .zip(&categories)
        .map(|((day, (avg, pred)), idx)| DerivedDay {
            date: day.dteday,
            temp: day.temp,
            temp_celsius: day.temp_celsius(),
            cnt: day.cnt,
            cnt_moving_avg: *avg,
            predicted_cnt: *pred,
            temp_category: QUARTILE_LABELS[*idx].to_string(),
        })
        .collect();

    let by_month = group_means(hourly, |h| h.mnth);
    let by_hour = group_means(hourly, |h| h.hr);
    let by_weather = group_means(hourly, |h| h.weathersit);
    let by_season_mean = group_means(daily, |d| d.season);

    let by_season: Vec<BoxSummary> = group_values(daily, |d| d.season, |d| f64::from(d.cnt))
        .iter()
        .filter_map(|(code, values)| box_summary(&season_label(*code), values))
        .collect();

    let categorized: Vec<(usize, f64)> = categories
        .iter()
        .zip(daily)
        .map(|(idx, d)| (*idx, f64::from(d.cnt)))
        .collect();
    let by_temperature: Vec<BoxSummary> = group_values(&categorized, |c| c.0, |c| c.1)
        .iter()
        .filter_map(|(idx, values)| box_summary(QUARTILE_LABELS[*idx], values))
        .collect();

    let mut insights = month_insights(&by_month, &by_season);
    insights.extend(hour_insights(&by_hour));
    insights.extend(temperature_insights(&fit, r));
    insights.extend(weather_insights(&by_weather));

    Ok(Analysis {
        daily_summary: summarize_daily(daily),
        hourly_summary: summarize_hourly(hourly),
        fit,
        correlation: r,
        quartile_edges: bins.edges,
        by_month,
        by_hour,
        by_weather,
        by_season_mean,
        by_season,
        by_temperature,
        insights,
        derived,
    })
}

fn column<R>(rows: &[R], f: impl Fn(&R) -> f64) -> Vec<f64> {
    rows.iter().map(f).collect()
}

pub fn summarize_daily(rows: &[DailyRecord]) -> DatasetSummary {
    DatasetSummary {
        name: "Daily".to_string(),
        rows: rows.len(),
        first_date: rows.iter().map(|r| r.dteday).min(),
        last_date: rows.iter().map(|r| r.dteday).max(),
        columns: vec![
            column_summary("temp", &column(rows, |r| r.temp)),
            column_summary("hum", &column(rows, |r| r.hum)),
            column_summary("windspeed", &column(rows, |r| r.windspeed)),
            column_summary("casual", &column(rows, |r| f64::from(r.casual))),
            column_summary("registered", &column(rows, |r| f64::from(r.registered))),
            column_summary("cnt", &column(rows, |r| f64::from(r.cnt))),
        ],
    }
}

pub fn summarize_hourly(rows: &[HourlyRecord]) -> DatasetSummary {
    DatasetSummary {
        name: "Hourly".to_string(),
        rows: rows.len(),
        first_date: rows.iter().map(|r| r.dteday).min(),
        last_date: rows.iter().map(|r| r.dteday).max(),
        columns: vec![
            column_summary("temp", &column(rows, |r| r.temp)),
            column_summary("hum", &column(rows, |r| r.hum)),
            column_summary("windspeed", &column(rows, |r| r.windspeed)),
            column_summary("casual", &column(rows, |r| f64::from(r.casual))),
            column_summary("registered", &column(rows, |r| f64::from(r.registered))),
            column_summary("cnt", &column(rows, |r| f64::from(r.cnt))),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn day(i: i64, season: u8, temp: f64, casual: u32, registered: u32) -> DailyRecord {
        let start = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        DailyRecord {
            instant: i as u32 + 1,
            dteday: start + Duration::days(i),
            season,
            yr: 0,
            mnth: 1,
            holiday: 0,
            weekday: 0,
            workingday: 1,
            weathersit: 1,
            temp,
            atemp: temp,
            hum: 0.5,
            windspeed: 0.1,
            casual,
            registered,
            cnt: casual + registered,
        }
    }

    fn hour(hr: u8, mnth: u8, weathersit: u8, casual: u32, registered: u32) -> HourlyRecord {
        HourlyRecord {
            instant: 1,
            dteday: NaiveDate::from_ymd_opt(2011, mnth as u32, 1).unwrap(),
            season: 1,
            yr: 0,
            mnth,
            hr,
            holiday: 0,
            weekday: 0,
            workingday: 1,
            weathersit,
            temp: 0.3,
            atemp: 0.3,
            hum: 0.5,
            windspeed: 0.1,
            casual,
            registered,
            cnt: casual + registered,
        }
    }

    fn sample() -> (Vec<DailyRecord>, Vec<HourlyRecord>) {
        let daily: Vec<DailyRecord> = (0..20)
            .map(|i| {
                let temp = 0.1 + 0.04 * i as f64;
                let season = (i / 5) as u8 + 1;
                day(i, season, temp, 100 + 10 * i as u32, 1000 + 200 * i as u32)
            })
            .collect();
        let hourly = vec![
            hour(0, 1, 1, 2, 10),
            hour(8, 1, 2, 20, 200),
            hour(17, 6, 1, 60, 400),
            hour(17, 6, 3, 10, 40),
        ];
        (daily, hourly)
    }

    #[test]
    fn test_analyze_sample() {
        let (daily, hourly) = sample();
        let analysis = analyze(&daily, &hourly).unwrap();

        assert_eq!(analysis.derived.len(), 20);
        assert!(analysis.derived[..3].iter().all(|d| d.cnt_moving_avg.is_none()));
        assert!(analysis.derived[17..].iter().all(|d| d.cnt_moving_avg.is_none()));
        assert!(analysis.derived[3].cnt_moving_avg.is_some());

        assert!(analysis.fit.slope > 0.0);
        assert!(analysis.correlation.unwrap() > 0.99);

        assert_eq!(analysis.by_month.len(), 2);
        assert_eq!(analysis.by_hour.len(), 3);
        assert_eq!(analysis.by_weather.len(), 3);
        assert_eq!(analysis.by_season_mean.len(), 4);
        assert_eq!(analysis.by_season_mean[0].key, 1);
        assert_eq!(analysis.by_season_mean[0].rows, 5);
        assert_eq!(analysis.by_season.len(), 4);
        assert_eq!(analysis.by_season[0].label, "Spring");
        assert_eq!(analysis.by_temperature.len(), 4);
        assert_eq!(analysis.by_temperature[0].label, "Low");
        assert_eq!(analysis.by_temperature[3].label, "Very High");
        assert!(!analysis.insights.is_empty());
    }

    #[test]
    fn test_temperature_categories_cover_every_day() {
        let (daily, hourly) = sample();
        let analysis = analyze(&daily, &hourly).unwrap();

        let total: usize = analysis.by_temperature.iter().map(|b| b.count).sum();
        assert_eq!(total, daily.len());
        for b in &analysis.by_temperature {
            assert!((4..=6).contains(&b.count));
        }
    }

    #[test]
    fn test_predicted_matches_fit() {
        let (daily, hourly) = sample();
        let analysis = analyze(&daily, &hourly).unwrap();

        for d in &analysis.derived {
            let expected = analysis.fit.intercept + analysis.fit.slope * d.temp;
            assert!((d.predicted_cnt - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_temperature_fails() {
        let daily: Vec<DailyRecord> = (0..5).map(|i| day(i, 1, 0.5, 10, 20)).collect();
        assert!(analyze(&daily, &[]).is_err());
    }

    #[test]
    fn test_nan_temperature_fails() {
        let (mut daily, hourly) = sample();
        daily[4].temp = f64::NAN;
        assert!(analyze(&daily, &hourly).is_err());
    }

    #[test]
    fn test_summaries() {
        let (daily, hourly) = sample();
        let summary = summarize_daily(&daily);

        assert_eq!(summary.rows, 20);
        assert_eq!(summary.first_date, NaiveDate::from_ymd_opt(2011, 1, 1));
        assert_eq!(summary.last_date, NaiveDate::from_ymd_opt(2011, 1, 20));
        assert_eq!(summary.columns.len(), 6);
        assert_eq!(summarize_hourly(&hourly).rows, 4);
    }
}
