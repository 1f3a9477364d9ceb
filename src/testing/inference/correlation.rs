use crate::testing::TestResult;
use crate::testing::utils::rank_with_ties;
use num_traits::Float;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Pearson product-moment correlation with a two-sided t-approximation p-value.
///
/// Returns an undefined result for fewer than 3 pairs or when either input is
/// constant.
pub fn pearson<T>(x: &[T], y: &[T]) -> anyhow::Result<TestResult<T>>
where
    T: Float,
{
    if x.len() != y.len() {
        return Err(anyhow::anyhow!(
            "Correlation inputs must have equal length ({} vs {})",
            x.len(),
            y.len()
        ));
    }

    let n = x.len();
    if n < 3 {
        return Ok(TestResult::undefined());
    }

    let nf = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_yy = 0.0;
    let mut sum_xy = 0.0;
    for (&a, &b) in x.iter().zip(y.iter()) {
        let a = a.to_f64().unwrap();
        let b = b.to_f64().unwrap();
        sum_x += a;
        sum_y += b;
        sum_xx += a * a;
        sum_yy += b * b;
        sum_xy += a * b;
    }

    let cov = sum_xy - sum_x * sum_y / nf;
    let var_x = sum_xx - sum_x * sum_x / nf;
    let var_y = sum_yy - sum_y * sum_y / nf;
    if var_x <= 0.0 || var_y <= 0.0 {
        return Ok(TestResult::undefined());
    }

    let r = (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0);
    let df = nf - 2.0;
    let p_value = correlation_p_value(r, df);

    Ok(TestResult::new(T::from(r).unwrap(), T::from(p_value).unwrap())
        .with_degrees_of_freedom(T::from(df).unwrap()))
}

/// Spearman rank correlation: Pearson on mid-ranks.
pub fn spearman<T>(x: &[T], y: &[T]) -> anyhow::Result<TestResult<T>>
where
    T: Float,
{
    if x.len() != y.len() {
        return Err(anyhow::anyhow!(
            "Correlation inputs must have equal length ({} vs {})",
            x.len(),
            y.len()
        ));
    }

    let (rank_x, _) = rank_with_ties(x);
    let (rank_y, _) = rank_with_ties(y);
    pearson(&rank_x, &rank_y)
}

fn correlation_p_value(r: f64, df: f64) -> f64 {
    if df <= 0.0 {
        return 1.0;
    }
    let denom = 1.0 - r * r;
    if denom <= f64::EPSILON {
        // |r| == 1: the t statistic diverges
        return 0.0;
    }
    let t = r * (df / denom).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => (2.0 * (1.0 - t_dist.cdf(t.abs()))).min(1.0),
        Err(_) => 1.0,
    }
}
