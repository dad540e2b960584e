//! Equal-frequency binning of daily temperature.

use thiserror::Error;

use crate::analyzers::utility::{quantile_sorted, sorted};

/// Labels of the four temperature bins, coldest first.
pub const QUARTILE_LABELS: [&str; 4] = ["Low", "Medium", "High", "Very High"];

#[derive(Error, Debug, PartialEq)]
pub enum QuartileError {
    #[error("cannot compute quartiles of an empty column")]
    Empty,

    #[error("value {0} is not a finite number")]
    NonFinite(usize),

    #[error("quartile edges are not unique: {0:?}")]
    DuplicateEdges([f64; 5]),
}

/// Quartile bin edges of a column: the 0/25/50/75/100 % quantiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuartileBins {
    pub edges: [f64; 5],
}

impl QuartileBins {
    /// Computes the bin edges.
    ///
    /// # Errors
    ///
    /// Fails on empty input, on NaN or infinite values, or when two edges
    /// coincide, since bins would then overlap.
    pub fn fit(values: &[f64]) -> Result<Self, QuartileError> {
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(QuartileError::NonFinite(i));
        }
        let data = sorted(values);
        let mut edges = [0.0; 5];
        for (i, edge) in edges.iter_mut().enumerate() {
            *edge = quantile_sorted(&data, i as f64 / 4.0).ok_or(QuartileError::Empty)?;
        }

        if edges.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(QuartileError::DuplicateEdges(edges));
        }

        Ok(Self { edges })
    }

    /// Bin index (0–3) of `value`.
    ///
    /// Bins are right-closed, `(e[i], e[i+1]]`, with the lowest edge
    /// belonging to bin 0. Values outside the fitted range have no bin.
    pub fn index(&self, value: f64) -> Option<usize> {
        let e = &self.edges;
        if value < e[0] || value > e[4] {
            return None;
        }
        (0..4).find(|&i| value <= e[i + 1])
    }

    /// Label of the bin `value` falls into.
    pub fn label(&self, value: f64) -> Option<&'static str> {
        self.index(value).map(|i| QUARTILE_LABELS[i])
    }
}
