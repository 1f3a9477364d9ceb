//! Descriptive statistics for score columns.
//!
//! Quantiles use the R-7 linear-interpolation rule (the default in R and
//! NumPy), so the reported medians and quartiles line up with the numbers the
//! original analysis environment produces.

use serde::Serialize;
use std::collections::BTreeMap;

/// Five-number-style summary of one score column or group.
///
/// `sd` is `None` for a single observation: dispersion is undefined there,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub n: usize,
    pub mean: f64,
    pub sd: Option<f64>,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarize a slice of values. Returns `None` for empty or non-finite input.
pub fn summarize(values: &[f64]) -> Option<SummaryStats> {
    if values.is_empty() || !values.iter().all(|v| v.is_finite()) {
        return None;
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;

    let sd = if n < 2 {
        None
    } else {
        let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        Some((ss / (n - 1) as f64).sqrt())
    };

    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());

    Some(SummaryStats {
        n,
        mean,
        sd,
        median: quantile_sorted(&sorted, 0.5)?,
        q1: quantile_sorted(&sorted, 0.25)?,
        q3: quantile_sorted(&sorted, 0.75)?,
        min: sorted[0],
        max: sorted[n - 1],
    })
}

/// `p`-th quantile of pre-sorted data, R-7 rule.
///
/// For sorted `x[0..n]` and `p ∈ [0, 1]`: `h = (n − 1)·p`, `j = ⌊h⌋`,
/// `g = h − j`, result `(1 − g)·x[j] + g·x[j+1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();

    if j + 1 >= n {
        Some(sorted[n - 1])
    } else {
        Some((1.0 - g) * sorted[j] + g * sorted[j + 1])
    }
}

/// Per-group summaries over a deterministic grouping. Empty groups are skipped.
pub fn summarize_groups<K>(groups: &BTreeMap<K, Vec<f64>>) -> BTreeMap<K, SummaryStats>
where
    K: Ord + Clone,
{
    groups
        .iter()
        .filter_map(|(k, v)| summarize(v).map(|s| (k.clone(), s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn summary_known_values() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let s = summarize(&v).unwrap();
        assert_eq!(s.n, 8);
        assert_relative_eq!(s.mean, 5.0, epsilon = 1e-12);
        assert_relative_eq!(s.sd.unwrap(), 4.571428571428571_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(s.median, 4.5, epsilon = 1e-12);
        assert_relative_eq!(s.q1, 4.0, epsilon = 1e-12);
        assert_relative_eq!(s.q3, 5.5, epsilon = 1e-12);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
    }

    #[test]
    fn single_observation_has_no_sd() {
        let s = summarize(&[42.0]).unwrap();
        assert_eq!(s.n, 1);
        assert_eq!(s.sd, None);
        assert_eq!(s.median, 42.0);
        assert_eq!(s.min, 42.0);
        assert_eq!(s.max, 42.0);
    }

    #[test]
    fn empty_and_nan_input() {
        assert_eq!(summarize(&[]), None);
        assert_eq!(summarize(&[1.0, f64::NAN]), None);
    }

    #[test]
    fn quantile_interpolation() {
        // h = (4-1)*0.25 = 0.75, j=0, g=0.75 -> 0.25*1.0 + 0.75*2.0
        let q = quantile_sorted(&[1.0, 2.0, 3.0, 4.0], 0.25).unwrap();
        assert_relative_eq!(q, 1.75, epsilon = 1e-12);

        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile_sorted(&data, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&data, 0.5), Some(3.0));
        assert_eq!(quantile_sorted(&data, 1.0), Some(5.0));
    }

    #[test]
    fn grouped_summaries_skip_empty_groups() {
        let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        groups.insert("a", vec![1.0, 2.0, 3.0]);
        groups.insert("b", vec![]);
        groups.insert("c", vec![5.0]);

        let summaries = summarize_groups(&groups);
        assert_eq!(summaries.len(), 2);
        assert_relative_eq!(summaries["a"].mean, 2.0, epsilon = 1e-12);
        assert_eq!(summaries["c"].sd, None);
    }
}
