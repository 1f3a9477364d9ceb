use crate::testing::utils::rank_with_ties;
use crate::testing::{Alternative, TestResult};
use num_traits::Float;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

/// Wilcoxon signed-rank test for paired samples.
///
/// Zero differences are dropped before ranking; the statistic is the sum of
/// ranks of the positive differences. The p-value uses the normal
/// approximation with tie and continuity corrections.
pub fn wilcoxon_signed_rank<T>(
    x: &[T],
    y: &[T],
    alternative: Alternative,
) -> anyhow::Result<TestResult<T>>
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

    let diffs: Vec<T> = x
        .iter()
        .zip(y.iter())
        .map(|(&a, &b)| a - b)
        .filter(|d| !d.is_zero())
        .collect();

    let zeros_dropped = x.len() - diffs.len();
    let n = diffs.len();
    if n == 0 {
        return Ok(TestResult::undefined());
    }

    let abs_diffs: Vec<T> = diffs.iter().map(|d| d.abs()).collect();
    let (ranks, tie_term) = rank_with_ties(&abs_diffs);

    let mut w_plus = 0.0;
    for (d, r) in diffs.iter().zip(ranks.iter()) {
        if *d > T::zero() {
            w_plus += r.to_f64().unwrap();
        }
    }

    let nf = n as f64;
    let mean_w = nf * (nf + 1.0) / 4.0;
    let var_w = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - tie_term / 48.0;
    if var_w <= 0.0 {
        return Ok(TestResult::undefined());
    }

    let sd = var_w.sqrt();
    let d = w_plus - mean_w;
    let normal = Normal::new(0.0, 1.0).unwrap();

    let (z, p_value) = match alternative {
        Alternative::TwoSided => {
            let z = (d - 0.5 * zero_aware_sign(d)) / sd;
            (z, (2.0 * (1.0 - normal.cdf(z.abs()))).min(1.0))
        }
        Alternative::Less => {
            let z = (d + 0.5) / sd;
            (z, normal.cdf(z))
        }
        Alternative::Greater => {
            let z = (d - 0.5) / sd;
            (z, 1.0 - normal.cdf(z))
        }
    };

    let effect_size = z / nf.sqrt();

    Ok(TestResult::with_effect_size(
        T::from(w_plus).unwrap(),
        T::from(p_value).unwrap(),
        T::from(effect_size).unwrap(),
    )
    .with_metadata("z_score", T::from(z).unwrap())
    .with_metadata("n_used", T::from(nf).unwrap())
    .with_metadata("zeros_dropped", T::from(zeros_dropped).unwrap()))
}

/// Mann-Whitney U (Wilcoxon rank-sum) test for two independent samples.
pub fn mann_whitney<T>(x: &[T], y: &[T], alternative: Alternative) -> TestResult<T>
where
    T: Float,
{
    let nx = x.len();
    let ny = y.len();

    if nx == 0 || ny == 0 {
        return TestResult::undefined();
    }

    let mut combined: Vec<T> = Vec::with_capacity(nx + ny);
    combined.extend_from_slice(x);
    combined.extend_from_slice(y);

    let (ranks, tie_term) = rank_with_ties(&combined);

    let mut rank_sum_x = 0.0;
    for r in &ranks[..nx] {
        rank_sum_x += r.to_f64().unwrap();
    }

    let nx_f = nx as f64;
    let ny_f = ny as f64;
    let n = nx_f + ny_f;

    let u_x = rank_sum_x - nx_f * (nx_f + 1.0) / 2.0;
    let u_y = nx_f * ny_f - u_x;

    let mean_u = nx_f * ny_f / 2.0;
    let var_u = nx_f * ny_f / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if var_u <= 0.0 {
        return TestResult::undefined();
    }
    let sd = var_u.sqrt();

    let normal = Normal::new(0.0, 1.0).unwrap();
    let (u, z, p_value) = match alternative {
        Alternative::TwoSided => {
            let u = f64::min(u_x, u_y);
            let d = u - mean_u;
            let z = (d - 0.5 * zero_aware_sign(d)) / sd;
            (u, z, (2.0 * (1.0 - normal.cdf(z.abs()))).min(1.0))
        }
        Alternative::Less => {
            let z = (u_x - mean_u + 0.5) / sd;
            (u_x, z, normal.cdf(z))
        }
        Alternative::Greater => {
            let z = (u_x - mean_u - 0.5) / sd;
            (u_x, z, 1.0 - normal.cdf(z))
        }
    };

    let effect_size = z / n.sqrt();

    TestResult::with_effect_size(
        T::from(u).unwrap(),
        T::from(p_value).unwrap(),
        T::from(effect_size).unwrap(),
    )
    .with_metadata("z_score", T::from(z).unwrap())
    .with_metadata("mean_u", T::from(mean_u).unwrap())
    .with_metadata("var_u", T::from(var_u).unwrap())
    .with_metadata("nx", T::from(nx).unwrap())
    .with_metadata("ny", T::from(ny).unwrap())
}

// f64::signum treats 0.0 as positive; the continuity correction must vanish
// when the statistic sits exactly on its null mean.
fn zero_aware_sign(d: f64) -> f64 {
    if d > 0.0 {
        1.0
    } else if d < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Kruskal-Wallis H test across two or more independent groups.
///
/// Empty groups are ignored. The H statistic is tie-corrected and compared
/// against the chi-squared distribution with k − 1 degrees of freedom.
pub fn kruskal_wallis<T>(groups: &[Vec<T>]) -> TestResult<T>
where
    T: Float,
{
    let occupied: Vec<&Vec<T>> = groups.iter().filter(|g| !g.is_empty()).collect();
    let k = occupied.len();
    let n_total: usize = occupied.iter().map(|g| g.len()).sum();
    if k < 2 || n_total < 3 {
        return TestResult::undefined();
    }

    let mut pooled: Vec<T> = Vec::with_capacity(n_total);
    for g in &occupied {
        pooled.extend_from_slice(g);
    }
    let (ranks, tie_term) = rank_with_ties(&pooled);

    let n = n_total as f64;
    let mut h = 0.0;
    let mut offset = 0;
    for g in &occupied {
        let mut rank_sum = 0.0;
        for r in &ranks[offset..offset + g.len()] {
            rank_sum += r.to_f64().unwrap();
        }
        h += rank_sum * rank_sum / g.len() as f64;
        offset += g.len();
    }
    h = 12.0 / (n * (n + 1.0)) * h - 3.0 * (n + 1.0);

    // Tie correction; zero when every observation is identical
    let correction = 1.0 - tie_term / (n * n * n - n);
    if correction <= 0.0 {
        return TestResult::undefined();
    }
    h /= correction;

    let df = (k - 1) as f64;
    let p_value = match ChiSquared::new(df) {
        Ok(chi) => 1.0 - chi.cdf(h),
        Err(_) => 1.0,
    };

    TestResult::new(T::from(h).unwrap(), T::from(p_value).unwrap())
        .with_degrees_of_freedom(T::from(df).unwrap())
        .with_metadata("n_total", T::from(n_total).unwrap())
        .with_metadata("n_groups", T::from(k).unwrap())
}
