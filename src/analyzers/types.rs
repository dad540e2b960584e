//! Data types produced by the analysis pipeline.

use chrono::NaiveDate;
use serde::Serialize;

/// Mean rental counts for every row sharing one grouping key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean<K> {
    pub key: K,
    pub rows: usize,
    pub casual: f64,
    pub registered: f64,
    pub total: f64,
}

/// Box-plot summary of one group of observations.
///
/// Whiskers reach the most extreme observations within 1.5 × IQR of the
/// box; everything beyond is listed in `outliers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub label: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// `describe()`-style statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

/// Overview of a loaded dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub columns: Vec<ColumnSummary>,
}

/// Daily values computed by the pipeline, one per input day.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedDay {
    pub date: NaiveDate,
    pub temp: f64,
    pub temp_celsius: f64,
    pub cnt: u32,
    pub cnt_moving_avg: Option<f64>,
    pub predicted_cnt: f64,
    pub temp_category: String,
}

/// Topic tabs of the dashboard, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    MonthsAndSeason,
    TimeOfDay,
    Temperature,
    Weather,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::MonthsAndSeason,
        Tab::TimeOfDay,
        Tab::Temperature,
        Tab::Weather,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::MonthsAndSeason => "Months & Season",
            Tab::TimeOfDay => "Time of the Day",
            Tab::Temperature => "Temperature",
            Tab::Weather => "Weather",
        }
    }

    /// Stable identifier used for HTML ids.
    pub fn slug(self) -> &'static str {
        match self {
            Tab::MonthsAndSeason => "months-season",
            Tab::TimeOfDay => "time-of-day",
            Tab::Temperature => "temperature",
            Tab::Weather => "weather",
        }
    }
}

/// One finding shown under a dashboard tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub tab: Tab,
    pub text: String,
}
