//! Hypothesis tests used by the scoring-method comparison.
//!
//! The rank-based tests live in [`nonparametric`], the paired t-test in
//! [`parametric`], and the correlation measures in [`correlation`]. All
//! p-values come from the asymptotic approximations (normal, chi-squared,
//! Student's t) via `statrs`.

pub mod correlation;

pub mod nonparametric;

pub mod parametric;
