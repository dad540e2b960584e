//! Rental aggregation, temperature regression and dashboard insights.
//!
//! This module turns the loaded daily and hourly rows into group means,
//! the moving-average trend, box-plot summaries, an OLS fit of rentals on
//! temperature, and short findings for each dashboard tab.

pub mod aggregate;
pub mod analyzer;
pub mod insights;
pub mod quartile;
pub mod regression;
pub mod types;
pub mod utility;
