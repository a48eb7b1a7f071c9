//! Statistics Calculator Module
//! Five-number summaries (min, quartiles, max) over grouped observations.

use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::HashMap;

/// Five-number summary of one group, plus count and mean for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Interquartile range, `q3 - q1`
    pub iqr: f64,
}

/// Summary for one category, in the order the category first appeared.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub group: String,
    /// `None` when the group had no finite observations.
    pub quartiles: Option<Quartiles>,
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Summarize a sample. Non-finite values are ignored; an empty sample
    /// yields `None`.
    pub fn summarize(values: &[f64]) -> Option<Quartiles> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = Self::quantile_sorted(&sorted, 0.25)?;
        let q3 = Self::quantile_sorted(&sorted, 0.75)?;
        Some(Quartiles {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median: Self::quantile_sorted(&sorted, 0.5)?,
            q3,
            max: sorted[sorted.len() - 1],
            mean: sorted.iter().mean(),
            iqr: q3 - q1,
        })
    }

    /// Quantile of an ascending slice using linear interpolation between
    /// closest ranks (NumPy "linear" / R-7).
    pub fn quantile_sorted(sorted_values: &[f64], p: f64) -> Option<f64> {
        let n = sorted_values.len();
        if n == 0 || p.is_nan() {
            return None;
        }
        if p <= 0.0 || n < 2 {
            return Some(sorted_values[0]);
        }
        if p >= 1.0 {
            return Some(sorted_values[n - 1]);
        }

        let rank = p * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let frac = rank - lower as f64;
        let low = sorted_values[lower];
        let high = sorted_values[(lower + 1).min(n - 1)];

        Some(low + (high - low) * frac)
    }

    /// Group records by `key` (first-appearance order) and summarize the
    /// `value` of each group in parallel.
    pub fn rollup<T, K, V>(records: &[T], key: K, value: V) -> Vec<GroupSummary>
    where
        K: Fn(&T) -> &str,
        V: Fn(&T) -> f64,
    {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(String, Vec<f64>)> = Vec::new();

        for record in records {
            let name = key(record);
            let slot = *index.entry(name).or_insert_with(|| {
                groups.push((name.to_string(), Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(value(record));
        }

        // par_iter keeps the input order on collect
        groups
            .par_iter()
            .map(|(group, values)| GroupSummary {
                group: group.clone(),
                quartiles: Self::summarize(values),
            })
            .collect()
    }

    /// Largest finite value, used as the upper bound of a `[0, max]` domain.
    pub fn finite_max<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }
}
