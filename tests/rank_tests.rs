use approx::assert_relative_eq;

use tma_statistics::testing::Alternative;
use tma_statistics::testing::inference::correlation::{pearson, spearman};
use tma_statistics::testing::inference::nonparametric::{
    kruskal_wallis, mann_whitney, wilcoxon_signed_rank,
};
use tma_statistics::testing::inference::parametric::paired_t_test;

#[test]
fn kruskal_wallis_matches_hand_computation() {
    // Tie-free table: ranks 1..9, rank sums 6, 15, 24
    // H = 12/(9*10) * (36 + 225 + 576)/3 - 3*10 = 7.2
    let groups = vec![
        vec![1.0, 2.0, 3.0],
        vec![4.0, 5.0, 6.0],
        vec![7.0, 8.0, 9.0],
    ];
    let result = kruskal_wallis(&groups);
    assert_relative_eq!(result.statistic, 7.2, epsilon = 1e-10);
    assert_eq!(result.degrees_of_freedom, Some(2.0));
    // Chi-squared survival with 2 df is exp(-H/2)
    assert_relative_eq!(result.p_value, (-3.6_f64).exp(), epsilon = 1e-8);
}

#[test]
fn kruskal_wallis_degenerate_inputs() {
    assert!(kruskal_wallis(&[vec![1.0, 2.0]]).is_undefined());
    assert!(kruskal_wallis(&[vec![5.0, 5.0], vec![5.0, 5.0]]).is_undefined());
    // Empty groups are ignored, not counted
    assert!(kruskal_wallis(&[vec![1.0, 2.0, 3.0], vec![]]).is_undefined());
}

#[test]
fn mann_whitney_complete_separation() {
    let x: Vec<f64> = (1..=10).map(f64::from).collect();
    let y: Vec<f64> = (11..=20).map(f64::from).collect();
    let result = mann_whitney(&x, &y, Alternative::TwoSided);
    assert_eq!(result.statistic, 0.0);
    assert!(result.p_value < 0.001);
}

#[test]
fn mann_whitney_identical_samples() {
    let x = [1.0, 2.0, 3.0, 4.0, 5.0];
    let result = mann_whitney(&x, &x, Alternative::TwoSided);
    // U sits exactly on its null mean
    assert_relative_eq!(result.statistic, 12.5, epsilon = 1e-10);
    assert_relative_eq!(result.p_value, 1.0, epsilon = 1e-10);
}

#[test]
fn mann_whitney_empty_group_is_undefined() {
    let result = mann_whitney(&[1.0, 2.0], &[], Alternative::TwoSided);
    assert!(result.is_undefined());
    assert_eq!(result.p_value, 1.0);
}

#[test]
fn wilcoxon_signed_rank_known_statistic() {
    // Differences: 15 -7 5 20 0 -9 17 -12 5 -10; the zero is dropped,
    // positive ranks are 7, 1.5, 9, 8, 1.5 -> V = 27
    let x = [125.0, 115.0, 130.0, 140.0, 140.0, 115.0, 140.0, 125.0, 140.0, 135.0];
    let y = [110.0, 122.0, 125.0, 120.0, 140.0, 124.0, 123.0, 137.0, 135.0, 145.0];
    let result = wilcoxon_signed_rank(&x, &y, Alternative::TwoSided).unwrap();
    assert_relative_eq!(result.statistic, 27.0, epsilon = 1e-10);
    assert!(result.p_value > 0.5 && result.p_value < 0.8);
    assert_eq!(result.metadata["zeros_dropped"], 1.0);
    assert_eq!(result.metadata["n_used"], 9.0);
}

#[test]
fn wilcoxon_signed_rank_consistent_shift() {
    let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let y: Vec<f64> = x.iter().map(|v| v + 1.0).collect();
    let result = wilcoxon_signed_rank(&x, &y, Alternative::TwoSided).unwrap();
    assert_eq!(result.statistic, 0.0);
    assert!(result.p_value < 0.05);
}

#[test]
fn wilcoxon_signed_rank_identical_pairs_undefined() {
    let x = [3.0, 5.0, 7.0];
    let result = wilcoxon_signed_rank(&x, &x, Alternative::TwoSided).unwrap();
    assert!(result.is_undefined());
    assert_eq!(result.p_value, 1.0);
}

#[test]
fn wilcoxon_signed_rank_rejects_length_mismatch() {
    assert!(wilcoxon_signed_rank(&[1.0, 2.0], &[1.0], Alternative::TwoSided).is_err());
}

#[test]
fn spearman_perfect_monotone() {
    let x = [1.0, 2.0, 3.0, 4.0, 5.0];
    let y = [1.0, 4.0, 9.0, 16.0, 25.0];
    let up = spearman(&x, &y).unwrap();
    assert_relative_eq!(up.statistic, 1.0, epsilon = 1e-12);
    assert_eq!(up.p_value, 0.0);

    let reversed: Vec<f64> = y.iter().rev().copied().collect();
    let down = spearman(&x, &reversed).unwrap();
    assert_relative_eq!(down.statistic, -1.0, epsilon = 1e-12);
}

#[test]
fn spearman_too_few_pairs_is_undefined() {
    let result = spearman(&[1.0, 2.0], &[2.0, 1.0]).unwrap();
    assert!(result.is_undefined());
}

#[test]
fn pearson_linear_relationship() {
    let x = [1.0, 2.0, 3.0, 4.0];
    let y = [2.0, 4.0, 6.0, 8.0];
    let result = pearson(&x, &y).unwrap();
    assert_relative_eq!(result.statistic, 1.0, epsilon = 1e-12);
    assert_eq!(result.degrees_of_freedom, Some(2.0));
}

#[test]
fn pearson_constant_input_is_undefined() {
    let result = pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).unwrap();
    assert!(result.is_undefined());
}

#[test]
fn paired_t_matches_hand_computation() {
    // Differences 1, 2, 3: mean 2, sd 1, t = 2 / (1/sqrt(3))
    let x = [2.0, 4.0, 6.0];
    let y = [1.0, 2.0, 3.0];
    let result = paired_t_test(&x, &y).unwrap();
    assert_relative_eq!(result.statistic, 2.0 * 3.0_f64.sqrt(), epsilon = 1e-10);
    assert_eq!(result.degrees_of_freedom, Some(2.0));
    // For 2 df the survival function is (1 - t/sqrt(t^2+2))/2
    let t = 2.0 * 3.0_f64.sqrt();
    let expected_p = 1.0 - t / (t * t + 2.0).sqrt();
    assert_relative_eq!(result.p_value, expected_p, epsilon = 1e-8);
}

#[test]
fn paired_t_constant_differences_undefined() {
    let x = [2.0, 3.0, 4.0];
    let y = [1.0, 2.0, 3.0];
    let result = paired_t_test(&x, &y).unwrap();
    assert!(result.is_undefined());
}

#[test]
fn rank_tests_are_deterministic() {
    let x = [12.0, 7.0, 33.0, 5.0, 5.0, 18.0, 0.0, 25.0];
    let y = [10.0, 9.0, 30.0, 5.0, 8.0, 15.0, 2.0, 28.0];

    let a = wilcoxon_signed_rank(&x, &y, Alternative::TwoSided).unwrap();
    let b = wilcoxon_signed_rank(&x, &y, Alternative::TwoSided).unwrap();
    assert_eq!(a.statistic, b.statistic);
    assert_eq!(a.p_value, b.p_value);

    let a = spearman(&x, &y).unwrap();
    let b = spearman(&x, &y).unwrap();
    assert_eq!(a.statistic, b.statistic);
    assert_eq!(a.p_value, b.p_value);
}
