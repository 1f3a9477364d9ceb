//! Derived views of the spot table.
//!
//! None of these mutate the base table; each call recomputes its view. Group
//! orderings are deterministic (`BTreeMap`) so repeated runs emit identical
//! output.

use serde::Serialize;
use std::collections::BTreeMap;

use super::{Dataset, Grade, SpotRecord, Subtype};

/// Which of the two scoring methods to read from a spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMethod {
    Visual,
    Digital,
}

impl ScoreMethod {
    pub const BOTH: [ScoreMethod; 2] = [ScoreMethod::Visual, ScoreMethod::Digital];

    pub fn label(&self) -> &'static str {
        match self {
            ScoreMethod::Visual => "visual",
            ScoreMethod::Digital => "digital",
        }
    }

    pub fn score_of(&self, record: &SpotRecord) -> f64 {
        match self {
            ScoreMethod::Visual => record.visual_score,
            ScoreMethod::Digital => record.digital_score,
        }
    }
}

/// Per-case aggregate: mean scores over the case's spots and the derived
/// case grade (maximum grade observed on any spot of the case).
#[derive(Debug, Clone, Serialize)]
pub struct CaseSummary {
    pub case_id: String,
    pub subtype: Subtype,
    pub grade: Option<Grade>,
    pub n_spots: usize,
    pub visual_mean: f64,
    pub digital_mean: f64,
}

impl Dataset {
    /// Spot-level score column for one method, in row order.
    pub fn scores(&self, method: ScoreMethod) -> Vec<f64> {
        self.records().iter().map(|r| method.score_of(r)).collect()
    }

    /// Derived per-case grade: the maximum grade observed across the case's
    /// rows, `None` when every row of the case has a missing grade.
    pub fn case_grades(&self) -> BTreeMap<String, Option<Grade>> {
        let mut grades: BTreeMap<String, Option<Grade>> = BTreeMap::new();
        for record in self.records() {
            let entry = grades.entry(record.case_id.clone()).or_insert(None);
            *entry = match (*entry, record.grade) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
        }
        grades
    }

    /// Per-case mean scores, ordered by case identifier.
    pub fn case_means(&self) -> Vec<CaseSummary> {
        let grades = self.case_grades();
        let mut by_case: BTreeMap<&str, Vec<&SpotRecord>> = BTreeMap::new();
        for record in self.records() {
            by_case.entry(record.case_id.as_str()).or_default().push(record);
        }

        by_case
            .into_iter()
            .map(|(case_id, rows)| {
                let n = rows.len() as f64;
                CaseSummary {
                    case_id: case_id.to_string(),
                    subtype: rows[0].subtype,
                    grade: grades.get(case_id).copied().flatten(),
                    n_spots: rows.len(),
                    visual_mean: rows.iter().map(|r| r.visual_score).sum::<f64>() / n,
                    digital_mean: rows.iter().map(|r| r.digital_score).sum::<f64>() / n,
                }
            })
            .collect()
    }

    /// Spot-level scores grouped by histologic subtype.
    pub fn by_subtype(&self, method: ScoreMethod) -> BTreeMap<Subtype, Vec<f64>> {
        let mut groups: BTreeMap<Subtype, Vec<f64>> = BTreeMap::new();
        for record in self.records() {
            groups
                .entry(record.subtype)
                .or_default()
                .push(method.score_of(record));
        }
        groups
    }

    /// Spot-level scores grouped by the row's own grade; rows with a missing
    /// grade are excluded.
    pub fn by_grade(&self, method: ScoreMethod) -> BTreeMap<Grade, Vec<f64>> {
        let mut groups: BTreeMap<Grade, Vec<f64>> = BTreeMap::new();
        for record in self.records() {
            if let Some(grade) = record.grade {
                groups.entry(grade).or_default().push(method.score_of(record));
            }
        }
        groups
    }

    /// Rows with a missing grade.
    pub fn missing_grade_rows(&self) -> usize {
        self.records().iter().filter(|r| r.grade.is_none()).count()
    }
}

/// Natural `ln(1 + x)` of a score column. Monotonic, maps 0 to 0.
pub fn log1p(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| v.ln_1p()).collect()
}
