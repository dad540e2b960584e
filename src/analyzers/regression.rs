//! Simple linear regression (one predictor, with intercept).
//!
//! Fits `y = intercept + slope * x` by ordinary least squares using the
//! closed-form solution of the normal equations.

use serde::Serialize;
use thiserror::Error;

use crate::analyzers::utility::mean;

/// Errors that can occur while fitting the regression
#[derive(Error, Debug, PartialEq)]
pub enum RegressionError {
    #[error("need at least 2 observations, got {0}")]
    TooFewObservations(usize),

    #[error("length mismatch: {x} predictor values, {y} responses")]
    LengthMismatch { x: usize, y: usize },

    /// All predictor values are equal, so X'X is singular.
    #[error("predictor has zero variance")]
    ZeroVariance,

    #[error("observation {0} is not a finite number")]
    NonFinite(usize),
}

/// Fitted OLS line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
    pub observations: usize,
}

impl LinearFit {
    /// Fits the model to paired observations.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, RegressionError> {
        if x.len() != y.len() {
            return Err(RegressionError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        if x.len() < 2 {
            return Err(RegressionError::TooFewObservations(x.len()));
        }
        if let Some(i) = x
            .iter()
            .zip(y)
            .position(|(xi, yi)| !xi.is_finite() || !yi.is_finite())
        {
            return Err(RegressionError::NonFinite(i));
        }

        let x_mean = mean(x);
        let y_mean = mean(y);

        let sxx: f64 = x.iter().map(|xi| (xi - x_mean).powi(2)).sum();
        if sxx == 0.0 {
            return Err(RegressionError::ZeroVariance);
        }
        let sxy: f64 = x
            .iter()
            .zip(y)
            .map(|(xi, yi)| (xi - x_mean) * (yi - y_mean))
            .sum();

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let ss_tot: f64 = y.iter().map(|yi| (yi - y_mean).powi(2)).sum();
        let ss_res: f64 = x
            .iter()
            .zip(y)
            .map(|(xi, yi)| (yi - (intercept + slope * xi)).powi(2))
            .sum();
        // a constant response is fitted exactly
        let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

        Ok(Self {
            intercept,
            slope,
            r_squared,
            observations: x.len(),
        })
    }

    /// Predicted response at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Predicted response for every element of `x`.
    pub fn predict_all(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|xi| self.predict(*xi)).collect()
    }
}
