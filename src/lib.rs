//! # tma-statistics
//!
//! Reproducible statistical analysis for a tissue-microarray (TMA) study of
//! p53 expression, comparing a visually estimated labeling index against a
//! digitally measured one on the same 156 spots.
//!
//! The crate loads the fixed-schema spot table, derives per-case and grouped
//! views, and runs a fixed battery of descriptive statistics and hypothesis
//! tests (Wilcoxon signed-rank, Mann-Whitney, Kruskal-Wallis, Spearman and
//! Pearson correlation, paired t on log1p scores). Results are emitted as a
//! plain-text summary plus optional TSV and JSON artifacts.
//!
//! ## Module Organization
//!
//! - **[`dataset`]**: the spot table, validated loading, derived views
//! - **[`descriptive`]**: summary statistics with R-7 quantiles
//! - **[`testing`]**: hypothesis tests and multiple-testing correction
//! - **[`report`]**: the analysis battery and result emission
//! - **[`cli`]**: command-line interface of the report binary

pub mod cli;
pub mod dataset;
pub mod descriptive;
pub mod report;
pub mod testing;
