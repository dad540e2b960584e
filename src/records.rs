//! Row types for the daily and hourly bike-rental datasets.
//!
//! Field names follow the column headers of the public `day.csv` and
//! `hour.csv` files so rows deserialize straight from the CSV reader.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Multiplier that turns the normalized `temp` column back into °C.
pub const TEMP_CELSIUS_SCALE: f64 = 41.0;

/// One row per calendar day.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DailyRecord {
    pub instant: u32,
    pub dteday: NaiveDate,
    pub season: u8,
    pub yr: u8,
    pub mnth: u8,
    pub holiday: u8,
    pub weekday: u8,
    pub workingday: u8,
    pub weathersit: u8,
    pub temp: f64,
    pub atemp: f64,
    pub hum: f64,
    pub windspeed: f64,
    pub casual: u32,
    pub registered: u32,
    pub cnt: u32,
}

/// One row per hour of a day.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HourlyRecord {
    pub instant: u32,
    pub dteday: NaiveDate,
    pub season: u8,
    pub yr: u8,
    pub mnth: u8,
    pub hr: u8,
    pub holiday: u8,
    pub weekday: u8,
    pub workingday: u8,
    pub weathersit: u8,
    pub temp: f64,
    pub atemp: f64,
    pub hum: f64,
    pub windspeed: f64,
    pub casual: u32,
    pub registered: u32,
    pub cnt: u32,
}

/// Rental counts shared by both datasets.
///
/// `total` is taken from the `cnt` column as-is; it is assumed (never
/// checked) to equal `casual + registered`.
pub trait RentalCounts {
    fn casual(&self) -> u32;
    fn registered(&self) -> u32;
    fn total(&self) -> u32;
}

impl RentalCounts for DailyRecord {
    fn casual(&self) -> u32 {
        self.casual
    }

    fn registered(&self) -> u32 {
        self.registered
    }

    fn total(&self) -> u32 {
        self.cnt
    }
}

impl RentalCounts for HourlyRecord {
    fn casual(&self) -> u32 {
        self.casual
    }

    fn registered(&self) -> u32 {
        self.registered
    }

    fn total(&self) -> u32 {
        self.cnt
    }
}

impl DailyRecord {
    pub fn temp_celsius(&self) -> f64 {
        self.temp * TEMP_CELSIUS_SCALE
    }
}

/// Display name for a `season` code.
pub fn season_label(code: u8) -> String {
    match code {
        1 => "Spring".into(),
        2 => "Summer".into(),
        3 => "Fall".into(),
        4 => "Winter".into(),
        other => format!("Unknown ({other})"),
    }
}

/// Short display name for a `weathersit` code.
pub fn weather_label(code: u8) -> String {
    match code {
        1 => "Clear".into(),
        2 => "Mist".into(),
        3 => "Light rain/snow".into(),
        4 => "Heavy rain/snow".into(),
        other => format!("Unknown ({other})"),
    }
}

/// Full description of a `weathersit` code as published with the dataset.
pub fn weather_description(code: u8) -> &'static str {
    match code {
        1 => "Clear, Few clouds, Partly cloudy",
        2 => "Mist + Cloudy, Mist + Broken clouds, Mist + Few clouds, Mist",
        3 => "Light Snow, Light Rain + Thunderstorm + Scattered clouds, Light Rain + Scattered clouds",
        4 => "Heavy Rain + Ice Pallets + Thunderstorm + Mist, Snow + Fog",
        _ => "Unknown weather condition",
    }
}

/// English month abbreviation for a 1-based month number.
pub fn month_label(month: u8) -> String {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    match month {
        1..=12 => NAMES[usize::from(month - 1)].into(),
        other => format!("Unknown ({other})"),
    }
}
