use crate::analyzers::types::{BoxSummary, ColumnSummary, GroupMean};
use crate::analyzers::utility::{mean, quantile_sorted, sample_stddev, sorted};
use crate::records::RentalCounts;
use std::collections::BTreeMap;

/// Window used for the daily rentals trend line.
pub const TREND_WINDOW: usize = 7;

/// Centered rolling mean over `window` samples.
///
/// Positions without a full window on both sides are `None`. For an even
/// window the extra sample is taken from the left, so the window covers
/// `i - window/2 ..= i + window/2 - 1`.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    if window == 0 {
        return vec![None; n];
    }

    let right = (window - 1) / 2;
    let left = window - 1 - right;

    (0..n)
        .map(|i| {
            if i < left || i + right >= n {
                return None;
            }
            Some(mean(&values[i - left..=i + right]))
        })
        .collect()
}

/// Groups `rows` by `key` and averages casual, registered and total counts.
///
/// Returns one entry per distinct key, ordered by key.
pub fn group_means<R, K, F>(rows: &[R], key: F) -> Vec<GroupMean<K>>
where
    R: RentalCounts,
    K: Ord + Clone,
    F: Fn(&R) -> K,
{
    // (rows, casual, registered, total)
    let mut sums: BTreeMap<K, (usize, u64, u64, u64)> = BTreeMap::new();

    for row in rows {
        let entry = sums.entry(key(row)).or_insert((0, 0, 0, 0));
        entry.0 += 1;
        entry.1 += u64::from(row.casual());
        entry.2 += u64::from(row.registered());
        entry.3 += u64::from(row.total());
    }

    sums.into_iter()
        .map(|(key, (count, casual, registered, total))| {
            let n = count as f64;
            GroupMean {
                key,
                rows: count,
                casual: casual as f64 / n,
                registered: registered as f64 / n,
                total: total as f64 / n,
            }
        })
        .collect()
}

/// Collects `value` per key, preserving key order. Used to feed box plots.
pub fn group_values<R, K, F, V>(rows: &[R], key: F, value: V) -> BTreeMap<K, Vec<f64>>
where
    K: Ord,
    F: Fn(&R) -> K,
    V: Fn(&R) -> f64,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(value(row));
    }
    groups
}

/// Box-plot statistics for one group. `None` for an empty group.
pub fn box_summary(label: &str, values: &[f64]) -> Option<BoxSummary> {
    let data = sorted(values);
    let q1 = quantile_sorted(&data, 0.25)?;
    let median = quantile_sorted(&data, 0.5)?;
    let q3 = quantile_sorted(&data, 0.75)?;

    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let inside: Vec<f64> = data
        .iter()
        .copied()
        .filter(|v| *v >= low_fence && *v <= high_fence)
        .collect();
    let outliers: Vec<f64> = data
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some(BoxSummary {
        label: label.to_string(),
        count: data.len(),
        min: data[0],
        q1,
        median,
        q3,
        max: data[data.len() - 1],
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers,
    })
}

/// Count, mean, sample std, min, quartiles and max of a column.
pub fn column_summary(column: &str, values: &[f64]) -> ColumnSummary {
    let data = sorted(values);
    let m = mean(&data);
    let q = |p: f64| quantile_sorted(&data, p).unwrap_or(0.0);

    ColumnSummary {
        column: column.to_string(),
        count: data.len(),
        mean: m,
        std: sample_stddev(&data, m),
        min: q(0.0),
        p25: q(0.25),
        p50: q(0.5),
        p75: q(0.75),
        max: q(1.0),
    }
}
