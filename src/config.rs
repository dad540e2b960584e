//! Runtime configuration from the environment (and `.env`), overridable
//! from the command line.

use std::path::PathBuf;

use crate::report::DEFAULT_PREVIEW_ROWS;

pub const DEFAULT_DAY_CSV: &str = "data/day.csv";
pub const DEFAULT_HOUR_CSV: &str = "data/hour.csv";
pub const DEFAULT_OUT_DIR: &str = "dashboard";
pub const DEFAULT_LOG_FILE: &str = "logs/bike_dashboard.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub day_csv: PathBuf,
    pub hour_csv: PathBuf,
    pub out_dir: PathBuf,
    pub log_file: PathBuf,
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            day_csv: DEFAULT_DAY_CSV.into(),
            hour_csv: DEFAULT_HOUR_CSV.into(),
            out_dir: DEFAULT_OUT_DIR.into(),
            log_file: DEFAULT_LOG_FILE.into(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl Config {
    /// Reads `BIKE_DAY_CSV`, `BIKE_HOUR_CSV`, `DASHBOARD_OUT_DIR` and
    /// `LOG_FILE_PATH`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let path = |key: &str, default: PathBuf| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(default)
        };

        Self {
            day_csv: path("BIKE_DAY_CSV", defaults.day_csv),
            hour_csv: path("BIKE_HOUR_CSV", defaults.hour_csv),
            out_dir: path("DASHBOARD_OUT_DIR", defaults.out_dir),
            log_file: path("LOG_FILE_PATH", defaults.log_file),
            preview_rows: defaults.preview_rows,
        }
    }

    /// Applies command-line flags on top of the environment.
    pub fn with_overrides(
        mut self,
        day: Option<PathBuf>,
        hour: Option<PathBuf>,
        out: Option<PathBuf>,
        preview_rows: Option<usize>,
    ) -> Self {
        if let Some(day) = day {
            self.day_csv = day;
        }
        if let Some(hour) = hour {
            self.hour_csv = hour;
        }
        if let Some(out) = out {
            self.out_dir = out;
        }
        if let Some(rows) = preview_rows {
            self.preview_rows = rows;
        }
        self
    }
}
