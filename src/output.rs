//! Output formatting and persistence for the dashboard.
//!
//! Writes the HTML report with its chart files, exports the derived daily
//! table as CSV and the analysis summary as JSON, and logs summary tables.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::analyzer::Analysis;
use crate::analyzers::types::{DatasetSummary, DerivedDay};
use crate::charts::Chart;

/// File name of the HTML report inside the output directory.
pub const DASHBOARD_FILE: &str = "dashboard.html";
/// Sub-directory holding the standalone SVG charts.
pub const CHARTS_DIR: &str = "charts";
pub const DERIVED_CSV_FILE: &str = "daily_derived.csv";
pub const SUMMARY_JSON_FILE: &str = "summary.json";

/// Writes `dashboard.html` and `charts/<name>.svg` under `out_dir`.
///
/// Returns the path of the HTML file.
pub fn write_dashboard(out_dir: &Path, html: &str, charts: &[Chart]) -> Result<PathBuf> {
    let charts_dir = out_dir.join(CHARTS_DIR);
    fs::create_dir_all(&charts_dir)
        .with_context(|| format!("failed to create {}", charts_dir.display()))?;

    for chart in charts {
        let path = charts_dir.join(format!("{}.svg", chart.name));
        fs::write(&path, &chart.svg)?;
        debug!(path = %path.display(), "Chart written");
    }

    let html_path = out_dir.join(DASHBOARD_FILE);
    fs::write(&html_path, html)?;
    info!(path = %html_path.display(), charts = charts.len(), "Dashboard written");

    Ok(html_path)
}

/// Writes `daily_derived.csv` and `summary.json` under `out_dir`, creating
/// the directory if needed.
pub fn write_export(out_dir: &Path, analysis: &Analysis) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    write_derived_csv(&out_dir.join(DERIVED_CSV_FILE), &analysis.derived)?;
    write_summary_json(&out_dir.join(SUMMARY_JSON_FILE), analysis)?;

    info!(
        out_dir = %out_dir.display(),
        days = analysis.derived.len(),
        "Export complete"
    );
    Ok(())
}

/// Writes one CSV row per day with the derived columns.
pub fn write_derived_csv(path: &Path, days: &[DerivedDay]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for day in days {
        writer.serialize(day)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = days.len(), "Derived CSV written");
    Ok(())
}

/// Writes the analysis (everything but the per-day table) as pretty JSON.
pub fn write_summary_json(path: &Path, analysis: &Analysis) -> Result<()> {
    let json = serde_json::to_string_pretty(analysis)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), "Summary JSON written");
    Ok(())
}

/// Logs a dataset summary, one line per column.
pub fn log_summary(summary: &DatasetSummary) {
    info!(
        dataset = %summary.name,
        rows = summary.rows,
        first_date = ?summary.first_date,
        last_date = ?summary.last_date,
        "Dataset"
    );

    for c in &summary.columns {
        info!(
            dataset = %summary.name,
            column = %c.column,
            count = c.count,
            mean = c.mean,
            std = c.std,
            min = c.min,
            p25 = c.p25,
            p50 = c.p50,
            p75 = c.p75,
            max = c.max,
            "Column"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::env;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir); // clean up any prior run
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn day(offset: u32, avg: Option<f64>) -> DerivedDay {
        DerivedDay {
            date: NaiveDate::from_ymd_opt(2011, 1, 1 + offset).unwrap(),
            temp: 0.3,
            temp_celsius: 12.3,
            cnt: 1000,
            cnt_moving_avg: avg,
            predicted_cnt: 980.5,
            temp_category: "Medium".into(),
        }
    }

    #[test]
    fn test_write_derived_csv_one_row_per_day() {
        let dir = temp_dir("bike_dashboard_test_csv");
        let path = dir.join(DERIVED_CSV_FILE);

        write_derived_csv(&path, &[day(0, None), day(1, Some(1010.0))]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        // header + 2 rows
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,temp,temp_celsius,cnt,cnt_moving_avg"));
        assert!(lines[1].starts_with("2011-01-01,"));
        assert!(lines[2].contains("1010"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_dashboard_creates_files() {
        let dir = temp_dir("bike_dashboard_test_html");
        let charts = vec![Chart {
            name: "rentals_by_hour",
            tab: None,
            caption: "x".into(),
            svg: "<svg></svg>".into(),
        }];

        let html_path = write_dashboard(&dir, "<html></html>", &charts).unwrap();

        assert_eq!(html_path, dir.join(DASHBOARD_FILE));
        assert!(html_path.exists());
        assert!(dir.join(CHARTS_DIR).join("rentals_by_hour.svg").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_log_summary_does_not_panic() {
        let summary = DatasetSummary {
            name: "Daily".into(),
            rows: 0,
            first_date: None,
            last_date: None,
            columns: vec![],
        };
        log_summary(&summary);
    }
}
