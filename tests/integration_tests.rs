use bike_dashboard::analyzers::analyzer::analyze;
use bike_dashboard::analyzers::quartile::QUARTILE_LABELS;
use bike_dashboard::analyzers::types::{GroupMean, Tab};
use bike_dashboard::analyzers::utility::{correlation, mean};
use bike_dashboard::charts::render_charts;
use bike_dashboard::loader::{load_daily, load_hourly};
use bike_dashboard::output::{
    CHARTS_DIR, DERIVED_CSV_FILE, SUMMARY_JSON_FILE, write_dashboard, write_derived_csv,
    write_export, write_summary_json,
};
use bike_dashboard::records::{DailyRecord, HourlyRecord};
use bike_dashboard::report::build_dashboard;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load() -> (Vec<DailyRecord>, Vec<HourlyRecord>) {
    let daily = load_daily(&fixture("day_sample.csv")).expect("Failed to load daily fixture");
    let hourly = load_hourly(&fixture("hour_sample.csv")).expect("Failed to load hourly fixture");
    (daily, hourly)
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_fixtures_load_every_row() {
    let (daily, hourly) = load();

    assert_eq!(daily.len(), 30);
    assert_eq!(hourly.len(), 48);
    assert_eq!(daily[0].dteday.to_string(), "2011-01-01");
    assert_eq!(hourly[47].hr, 23);
}

#[test]
fn test_moving_average_matches_window_mean() {
    let (daily, hourly) = load();
    let analysis = analyze(&daily, &hourly).unwrap();
    let cnt: Vec<f64> = daily.iter().map(|d| f64::from(d.cnt)).collect();

    for (i, day) in analysis.derived.iter().enumerate() {
        if i < 3 || i + 3 >= daily.len() {
            assert!(day.cnt_moving_avg.is_none(), "day {i} should have no average");
        } else {
            let expected = mean(&cnt[i - 3..=i + 3]);
            assert!((day.cnt_moving_avg.unwrap() - expected).abs() < 1e-9);
        }
    }
}

#[test]
fn test_group_means_match_row_filters() {
    let (daily, hourly) = load();
    let analysis = analyze(&daily, &hourly).unwrap();

    // 24 distinct hours, 2 months, 3 weather codes in the fixture
    assert_eq!(analysis.by_hour.len(), 24);
    assert_eq!(analysis.by_month.len(), 2);
    assert_eq!(analysis.by_weather.len(), 3);
    assert_eq!(analysis.by_season_mean.len(), 4);

    let check = |groups: &[GroupMean<u8>], counts: &[(u8, u32)]| {
        for g in groups {
            let matching: Vec<f64> = counts
                .iter()
                .filter(|(key, _)| *key == g.key)
                .map(|(_, cnt)| f64::from(*cnt))
                .collect();
            assert_eq!(g.rows, matching.len(), "key {}", g.key);
            assert!((g.total - mean(&matching)).abs() < 1e-9, "key {}", g.key);
        }
    };

    let by = |f: fn(&HourlyRecord) -> u8| -> Vec<(u8, u32)> {
        hourly.iter().map(|h| (f(h), h.cnt)).collect()
    };
    check(&analysis.by_weather, &by(|h| h.weathersit));
    check(&analysis.by_month, &by(|h| h.mnth));
    check(&analysis.by_hour, &by(|h| h.hr));

    let seasons: Vec<(u8, u32)> = daily.iter().map(|d| (d.season, d.cnt)).collect();
    check(&analysis.by_season_mean, &seasons);
}

#[test]
fn test_regression_follows_correlation() {
    let (daily, hourly) = load();
    let analysis = analyze(&daily, &hourly).unwrap();

    let temp: Vec<f64> = daily.iter().map(|d| d.temp).collect();
    let cnt: Vec<f64> = daily.iter().map(|d| f64::from(d.cnt)).collect();
    let r = correlation(&temp, &cnt).unwrap();

    assert_eq!(analysis.fit.slope.signum(), r.signum());
    for d in &analysis.derived {
        let expected = analysis.fit.intercept + analysis.fit.slope * d.temp;
        assert!((d.predicted_cnt - expected).abs() < 1e-9);
    }
}

#[test]
fn test_temperature_quartiles_partition_days() {
    let (daily, hourly) = load();
    let analysis = analyze(&daily, &hourly).unwrap();

    let labels: Vec<&str> = analysis.by_temperature.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, QUARTILE_LABELS.to_vec());

    let counts: Vec<usize> = analysis.by_temperature.iter().map(|b| b.count).collect();
    assert_eq!(counts.iter().sum::<usize>(), daily.len());
    assert!(counts.iter().all(|c| (7..=8).contains(c)), "{counts:?}");

    for label in QUARTILE_LABELS {
        let n = analysis
            .derived
            .iter()
            .filter(|d| d.temp_category == label)
            .count();
        assert!((7..=8).contains(&n));
    }
}

#[test]
fn test_full_pipeline_writes_dashboard() {
    let (daily, hourly) = load();
    let analysis = analyze(&daily, &hourly).unwrap();
    let charts = render_charts(&analysis).unwrap();
    assert_eq!(charts.len(), 7);

    let html = build_dashboard(&analysis, &charts, &daily, &hourly, 5).unwrap();
    for tab in Tab::ALL {
        assert!(html.contains(&format!("id=\"panel-{}\"", tab.slug())));
    }
    for chart in &charts {
        assert!(html.contains(&format!("<figure id=\"{}\">", chart.name)));
    }
    assert!(html.contains("Heavy Rain + Ice Pallets"));

    let dir = temp_dir("bike_dashboard_it_render");
    let path = write_dashboard(&dir, &html, &charts).unwrap();
    assert!(path.exists());
    assert_eq!(fs::read_dir(dir.join(CHARTS_DIR)).unwrap().count(), 7);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_export_writes_csv_and_json() {
    let (daily, hourly) = load();
    let analysis = analyze(&daily, &hourly).unwrap();
    let dir = temp_dir("bike_dashboard_it_export");

    write_derived_csv(&dir.join(DERIVED_CSV_FILE), &analysis.derived).unwrap();
    write_summary_json(&dir.join(SUMMARY_JSON_FILE), &analysis).unwrap();

    let csv = fs::read_to_string(dir.join(DERIVED_CSV_FILE)).unwrap();
    assert_eq!(csv.lines().count(), daily.len() + 1);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join(SUMMARY_JSON_FILE)).unwrap()).unwrap();
    assert!(json["fit"]["slope"].as_f64().unwrap() > 0.0);
    assert_eq!(json["fit"]["observations"], 30);
    assert!(json.get("derived").is_none());
    assert_eq!(json["by_season_mean"].as_array().unwrap().len(), 4);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_export_creates_missing_out_dir() {
    let (daily, hourly) = load();
    let analysis = analyze(&daily, &hourly).unwrap();
    let dir = temp_dir("bike_dashboard_it_export_nested");
    let out = dir.join("a").join("b");

    write_export(&out, &analysis).unwrap();
    assert!(out.join(DERIVED_CSV_FILE).exists());
    assert!(out.join(SUMMARY_JSON_FILE).exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_export_reports_unusable_out_dir() {
    let (daily, hourly) = load();
    let analysis = analyze(&daily, &hourly).unwrap();
    let dir = temp_dir("bike_dashboard_it_export_blocked");
    let blocker = dir.join("out");
    fs::write(&blocker, "not a directory").unwrap();

    let err = write_export(&blocker.join("nested"), &analysis).unwrap_err();
    assert!(format!("{err:#}").contains("failed to create"), "{err:#}");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_nan_temperature_is_an_error() {
    let (mut daily, hourly) = load();
    daily[10].temp = f64::NAN;

    assert!(analyze(&daily, &hourly).is_err());
}
