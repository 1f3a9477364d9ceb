//! Parametric companion to the rank tests.
//!
//! The analysis runs the paired t-test on log1p-transformed labeling indices,
//! where the distributional assumptions are closer to being met than on the
//! raw percentages.

use crate::testing::TestResult;
use num_traits::Float;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Paired t-test on the per-pair differences, two-sided.
///
/// The effect size is Cohen's d for paired data (mean difference over the
/// standard deviation of the differences). Constant differences give an
/// undefined result rather than an error.
pub fn paired_t_test<T>(x: &[T], y: &[T]) -> anyhow::Result<TestResult<T>>
where
    T: Float,
{
    if x.len() != y.len() {
        return Err(anyhow::anyhow!(
            "Paired samples must have equal length ({} vs {})",
            x.len(),
            y.len()
        ));
    }

    let n = x.len();
    if n < 2 {
        return Ok(TestResult::undefined());
    }

    let diffs: Vec<f64> = x
        .iter()
        .zip(y.iter())
        .map(|(&a, &b)| a.to_f64().unwrap() - b.to_f64().unwrap())
        .collect();

    let nf = n as f64;
    let mean_d = diffs.iter().sum::<f64>() / nf;
    let var_d = diffs.iter().map(|d| (d - mean_d).powi(2)).sum::<f64>() / (nf - 1.0);
    if var_d <= 0.0 {
        return Ok(TestResult::undefined());
    }

    let sd_d = var_d.sqrt();
    let t_stat = mean_d / (sd_d / nf.sqrt());
    let df = nf - 1.0;

    let p_value = match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => (2.0 * (1.0 - t_dist.cdf(t_stat.abs()))).min(1.0),
        Err(_) => 1.0,
    };

    Ok(TestResult::with_effect_size(
        T::from(t_stat).unwrap(),
        T::from(p_value).unwrap(),
        T::from(mean_d / sd_d).unwrap(),
    )
    .with_degrees_of_freedom(T::from(df).unwrap())
    .with_metadata("mean_difference", T::from(mean_d).unwrap()))
}
