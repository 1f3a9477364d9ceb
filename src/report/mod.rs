//! The analysis battery and its result model.
//!
//! [`run_analysis`] executes the fixed battery over a loaded spot table and
//! returns an [`AnalysisReport`], a serializable tree of every number the
//! report emits. The emitters in [`summary`], [`tsv`] and [`json`] only
//! format; all computation happens here.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::dataset::views::{CaseSummary, ScoreMethod, log1p};
use crate::dataset::{Dataset, Grade, Subtype};
use crate::descriptive::{SummaryStats, summarize};
use crate::testing::correction::benjamini_hochberg_correction;
use crate::testing::inference::correlation::{pearson, spearman};
use crate::testing::inference::nonparametric::{
    kruskal_wallis, mann_whitney, wilcoxon_signed_rank,
};
use crate::testing::inference::parametric::paired_t_test;
use crate::testing::{Alternative, TestResult};

pub mod json;
pub mod summary;
pub mod tsv;

/// Flattened test outcome for emission. All fields are `None` when the test
/// was undefined on its input (too few observations, constant values).
#[derive(Debug, Clone, Serialize)]
pub struct TestSummary {
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
    pub effect_size: Option<f64>,
    pub degrees_of_freedom: Option<f64>,
}

impl From<TestResult<f64>> for TestSummary {
    fn from(result: TestResult<f64>) -> Self {
        if result.is_undefined() {
            return TestSummary {
                statistic: None,
                p_value: None,
                effect_size: None,
                degrees_of_freedom: None,
            };
        }
        TestSummary {
            statistic: Some(result.statistic),
            p_value: Some(result.p_value),
            effect_size: result.effect_size,
            degrees_of_freedom: result.degrees_of_freedom,
        }
    }
}

/// A value computed once per scoring method.
#[derive(Debug, Clone, Serialize)]
pub struct MethodPair<T> {
    pub visual: T,
    pub digital: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupCount {
    pub label: String,
    pub cases: usize,
    pub spots: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetMeta {
    pub rows: usize,
    pub columns: usize,
    pub cases: usize,
    pub missing_grade_rows: usize,
    pub cases_without_grade: usize,
    pub subtypes: Vec<GroupCount>,
    pub grades: Vec<GroupCount>,
}

/// Descriptive statistics of one grouping level, both methods side by side.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub label: String,
    pub visual: SummaryStats,
    pub digital: SummaryStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodComparison {
    /// Mean of the per-spot differences, digital minus visual.
    pub mean_difference: f64,
    /// Median of the per-spot differences.
    pub median_difference: f64,
    pub wilcoxon_signed_rank: TestSummary,
    /// Paired t-test on log1p-transformed scores.
    pub paired_t_log1p: TestSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubtypeCorrelation {
    pub label: String,
    pub n_spots: usize,
    pub rho: Option<f64>,
    pub p_value: Option<f64>,
    /// Benjamini-Hochberg adjusted over the subtype family.
    pub p_adjusted: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationSection {
    /// Spearman on the raw spot scores.
    pub spearman: TestSummary,
    /// Pearson on the log1p-transformed spot scores.
    pub pearson_log1p: TestSummary,
    pub spearman_by_subtype: Vec<SubtypeCorrelation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupTests {
    /// Kruskal-Wallis across subtypes, spot-level scores.
    pub subtype_kruskal_wallis: MethodPair<TestSummary>,
    /// Kruskal-Wallis across derived case grades, per-case mean scores.
    pub grade_kruskal_wallis: MethodPair<TestSummary>,
    /// Mann-Whitney of grade 1-2 vs grade 3 cases, per-case mean scores.
    pub grade_low_vs_high: MethodPair<TestSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub tool_version: String,
    pub meta: DatasetMeta,
    pub overall: MethodPair<SummaryStats>,
    pub by_subtype: Vec<GroupSummary>,
    pub by_grade: Vec<GroupSummary>,
    pub method_comparison: MethodComparison,
    pub correlations: CorrelationSection,
    pub group_tests: GroupTests,
    /// Human-readable notes on data excluded from individual analyses.
    pub exclusions: Vec<String>,
}

/// Run the full battery over a loaded spot table.
pub fn run_analysis(dataset: &Dataset) -> Result<AnalysisReport> {
    let visual = dataset.scores(ScoreMethod::Visual);
    let digital = dataset.scores(ScoreMethod::Digital);
    let mut exclusions = Vec::new();

    info!(rows = dataset.n_rows(), "computing descriptive statistics");
    let meta = build_meta(dataset, &mut exclusions);

    let overall = MethodPair {
        visual: summarize(&visual).context("summary of visual scores")?,
        digital: summarize(&digital).context("summary of digital scores")?,
    };
    let by_subtype = grouped_summaries(
        &dataset.by_subtype(ScoreMethod::Visual),
        &dataset.by_subtype(ScoreMethod::Digital),
        |subtype| subtype.label().to_string(),
    )?;
    let by_grade = grouped_summaries(
        &dataset.by_grade(ScoreMethod::Visual),
        &dataset.by_grade(ScoreMethod::Digital),
        |grade| grade.to_string(),
    )?;

    info!("comparing scoring methods");
    let method_comparison = compare_methods(&visual, &digital)?;

    info!("computing correlations");
    let correlations = build_correlations(dataset, &visual, &digital, &mut exclusions)?;

    info!("running group comparisons");
    let group_tests = build_group_tests(dataset)?;

    Ok(AnalysisReport {
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        meta,
        overall,
        by_subtype,
        by_grade,
        method_comparison,
        correlations,
        group_tests,
        exclusions,
    })
}

fn build_meta(dataset: &Dataset, exclusions: &mut Vec<String>) -> DatasetMeta {
    let case_grades = dataset.case_grades();
    let cases_without_grade = case_grades.values().filter(|g| g.is_none()).count();
    let missing_grade_rows = dataset.missing_grade_rows();

    let mut subtype_cases: BTreeMap<Subtype, usize> = BTreeMap::new();
    let mut grade_cases: BTreeMap<Grade, usize> = BTreeMap::new();
    for case in dataset.case_means() {
        *subtype_cases.entry(case.subtype).or_default() += 1;
        if let Some(grade) = case.grade {
            *grade_cases.entry(grade).or_default() += 1;
        }
    }

    let subtype_spots = dataset.by_subtype(ScoreMethod::Visual);
    let grade_spots = dataset.by_grade(ScoreMethod::Visual);

    let subtypes = subtype_cases
        .iter()
        .map(|(subtype, &cases)| GroupCount {
            label: subtype.label().to_string(),
            cases,
            spots: subtype_spots.get(subtype).map_or(0, Vec::len),
        })
        .collect();
    let grades = grade_cases
        .iter()
        .map(|(grade, &cases)| GroupCount {
            label: grade.to_string(),
            cases,
            spots: grade_spots.get(grade).map_or(0, Vec::len),
        })
        .collect();

    if missing_grade_rows > 0 {
        exclusions.push(format!(
            "{} spots without grade excluded from grade-level summaries",
            missing_grade_rows
        ));
    }
    if cases_without_grade > 0 {
        exclusions.push(format!(
            "{} cases without any graded spot excluded from case-level grade tests",
            cases_without_grade
        ));
    }

    DatasetMeta {
        rows: dataset.n_rows(),
        columns: Dataset::n_columns(),
        cases: dataset.n_cases(),
        missing_grade_rows,
        cases_without_grade,
        subtypes,
        grades,
    }
}

fn grouped_summaries<K: Ord>(
    visual_groups: &BTreeMap<K, Vec<f64>>,
    digital_groups: &BTreeMap<K, Vec<f64>>,
    label: impl Fn(&K) -> String,
) -> Result<Vec<GroupSummary>> {
    visual_groups
        .iter()
        .map(|(key, visual_values)| {
            let digital_values = digital_groups
                .get(key)
                .context("method groupings disagree on group keys")?;
            Ok(GroupSummary {
                label: label(key),
                visual: summarize(visual_values).context("group summary (visual)")?,
                digital: summarize(digital_values).context("group summary (digital)")?,
            })
        })
        .collect()
}

fn compare_methods(visual: &[f64], digital: &[f64]) -> Result<MethodComparison> {
    let diffs: Vec<f64> = digital
        .iter()
        .zip(visual.iter())
        .map(|(d, v)| d - v)
        .collect();
    let diff_summary = summarize(&diffs).context("summary of paired differences")?;

    let wilcoxon = wilcoxon_signed_rank(digital, visual, Alternative::TwoSided)?;
    let paired_t = paired_t_test(&log1p(digital), &log1p(visual))?;

    Ok(MethodComparison {
        mean_difference: diff_summary.mean,
        median_difference: diff_summary.median,
        wilcoxon_signed_rank: wilcoxon.into(),
        paired_t_log1p: paired_t.into(),
    })
}

fn build_correlations(
    dataset: &Dataset,
    visual: &[f64],
    digital: &[f64],
    exclusions: &mut Vec<String>,
) -> Result<CorrelationSection> {
    let overall = spearman(visual, digital)?;
    let transformed = pearson(&log1p(visual), &log1p(digital))?;

    let visual_groups = dataset.by_subtype(ScoreMethod::Visual);
    let digital_groups = dataset.by_subtype(ScoreMethod::Digital);

    let mut by_subtype = Vec::new();
    for (subtype, visual_values) in &visual_groups {
        let digital_values = digital_groups
            .get(subtype)
            .context("method groupings disagree on subtype keys")?;
        let n_spots = visual_values.len();

        if n_spots < 3 {
            exclusions.push(format!(
                "subtype {}: {} spots, too few for a correlation",
                subtype, n_spots
            ));
            by_subtype.push(SubtypeCorrelation {
                label: subtype.label().to_string(),
                n_spots,
                rho: None,
                p_value: None,
                p_adjusted: None,
            });
            continue;
        }

        let result = spearman(visual_values, digital_values)?;
        let (rho, p_value) = if result.is_undefined() {
            exclusions.push(format!(
                "subtype {}: constant scores, correlation undefined",
                subtype
            ));
            (None, None)
        } else {
            (Some(result.statistic), Some(result.p_value))
        };
        by_subtype.push(SubtypeCorrelation {
            label: subtype.label().to_string(),
            n_spots,
            rho,
            p_value,
            p_adjusted: None,
        });
    }

    // BH adjustment over the subtypes that produced a p-value
    let defined: Vec<usize> = by_subtype
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.p_value.map(|_| i))
        .collect();
    if !defined.is_empty() {
        let p_values: Vec<f64> = defined
            .iter()
            .map(|&i| by_subtype[i].p_value.unwrap_or(1.0))
            .collect();
        let adjusted = benjamini_hochberg_correction(&p_values)?;
        for (k, &i) in defined.iter().enumerate() {
            by_subtype[i].p_adjusted = Some(adjusted[k]);
        }
    }

    Ok(CorrelationSection {
        spearman: overall.into(),
        pearson_log1p: transformed.into(),
        spearman_by_subtype: by_subtype,
    })
}

fn build_group_tests(dataset: &Dataset) -> Result<GroupTests> {
    let subtype_kw = MethodPair {
        visual: kruskal_wallis(&group_values(&dataset.by_subtype(ScoreMethod::Visual))).into(),
        digital: kruskal_wallis(&group_values(&dataset.by_subtype(ScoreMethod::Digital))).into(),
    };

    let cases = dataset.case_means();
    let grade_kw = MethodPair {
        visual: kruskal_wallis(&case_grade_groups(&cases, |c| c.visual_mean)).into(),
        digital: kruskal_wallis(&case_grade_groups(&cases, |c| c.digital_mean)).into(),
    };

    let low_high = MethodPair {
        visual: grade_low_vs_high(&cases, |c| c.visual_mean).into(),
        digital: grade_low_vs_high(&cases, |c| c.digital_mean).into(),
    };

    Ok(GroupTests {
        subtype_kruskal_wallis: subtype_kw,
        grade_kruskal_wallis: grade_kw,
        grade_low_vs_high: low_high,
    })
}

fn group_values<K: Ord>(groups: &BTreeMap<K, Vec<f64>>) -> Vec<Vec<f64>> {
    groups.values().cloned().collect()
}

fn case_grade_groups(cases: &[CaseSummary], score: impl Fn(&CaseSummary) -> f64) -> Vec<Vec<f64>> {
    let mut groups: BTreeMap<Grade, Vec<f64>> = BTreeMap::new();
    for case in cases {
        if let Some(grade) = case.grade {
            groups.entry(grade).or_default().push(score(case));
        }
    }
    groups.into_values().collect()
}

fn grade_low_vs_high(
    cases: &[CaseSummary],
    score: impl Fn(&CaseSummary) -> f64,
) -> TestResult<f64> {
    let mut low = Vec::new();
    let mut high = Vec::new();
    for case in cases {
        match case.grade {
            Some(Grade::G1) | Some(Grade::G2) => low.push(score(case)),
            Some(Grade::G3) => high.push(score(case)),
            None => {}
        }
    }
    mann_whitney(&low, &high, Alternative::TwoSided)
}
