//! The TMA spot table: schema, validated loading, derived views.
//!
//! One row per tissue-microarray spot. The table is loaded once and never
//! mutated; everything downstream works on derived views (see [`views`]).

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::info;

pub mod views;

/// Histologic subtype of the carcinoma a spot was sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subtype {
    Serous,
    Mucinous,
    Endometrioid,
    ClearCell,
    Undifferentiated,
}

impl Subtype {
    pub const ALL: [Subtype; 5] = [
        Subtype::Serous,
        Subtype::Mucinous,
        Subtype::Endometrioid,
        Subtype::ClearCell,
        Subtype::Undifferentiated,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Subtype::Serous => "serous",
            Subtype::Mucinous => "mucinous",
            Subtype::Endometrioid => "endometrioid",
            Subtype::ClearCell => "clear_cell",
            Subtype::Undifferentiated => "undifferentiated",
        }
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Histologic grade, ordered 1 < 2 < 3. Missing on some rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    G1,
    G2,
    G3,
}

impl Grade {
    pub fn as_u8(&self) -> u8 {
        match self {
            Grade::G1 => 1,
            Grade::G2 => 2,
            Grade::G3 => 3,
        }
    }
}

impl TryFrom<u8> for Grade {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Grade::G1),
            2 => Ok(Grade::G2),
            3 => Ok(Grade::G3),
            other => Err(anyhow::anyhow!("grade must be 1, 2 or 3, got {}", other)),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

fn deserialize_opt_grade<'de, D>(deserializer: D) -> std::result::Result<Option<Grade>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<u8> = Option::deserialize(deserializer)?;
    raw.map(Grade::try_from)
        .transpose()
        .map_err(serde::de::Error::custom)
}

/// One spot measurement: both scores are p53 labeling indices in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotRecord {
    pub case_id: String,
    pub spot: u32,
    pub subtype: Subtype,
    #[serde(deserialize_with = "deserialize_opt_grade")]
    pub grade: Option<Grade>,
    pub visual_score: f64,
    pub digital_score: f64,
}

/// Expected CSV header, in order.
pub const EXPECTED_HEADER: [&str; 6] = [
    "case_id",
    "spot",
    "subtype",
    "grade",
    "visual_score",
    "digital_score",
];

/// The loaded spot table. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<SpotRecord>,
}

impl Dataset {
    /// Load and validate a spot table from a CSV file.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("failed to read header of {}", path.display()))?
            .clone();
        let header_fields: Vec<&str> = headers.iter().collect();
        if header_fields != EXPECTED_HEADER {
            bail!(
                "unexpected columns in {}: got [{}], expected [{}]",
                path.display(),
                header_fields.join(", "),
                EXPECTED_HEADER.join(", ")
            );
        }

        let mut records = Vec::new();
        for (i, row) in reader.deserialize::<SpotRecord>().enumerate() {
            // Row 1 is the header
            let record = row.with_context(|| format!("{}: row {}", path.display(), i + 2))?;
            records.push(record);
        }

        let dataset = Self::from_records(records)?;
        info!(
            rows = dataset.n_rows(),
            cases = dataset.n_cases(),
            "spot table loaded"
        );
        Ok(dataset)
    }

    /// Build a dataset from in-memory records, applying the same validation
    /// as [`Dataset::load`].
    pub fn from_records(records: Vec<SpotRecord>) -> Result<Self> {
        if records.is_empty() {
            bail!("spot table is empty");
        }

        let mut seen = HashSet::new();
        for record in &records {
            for (name, score) in [
                ("visual_score", record.visual_score),
                ("digital_score", record.digital_score),
            ] {
                if !score.is_finite() || !(0.0..=100.0).contains(&score) {
                    bail!(
                        "case {} spot {}: {} = {} is outside [0, 100]",
                        record.case_id,
                        record.spot,
                        name,
                        score
                    );
                }
            }
            if !seen.insert((record.case_id.clone(), record.spot)) {
                bail!(
                    "duplicate spot: case {} spot {}",
                    record.case_id,
                    record.spot
                );
            }
        }

        Ok(Dataset { records })
    }

    pub fn records(&self) -> &[SpotRecord] {
        &self.records
    }

    pub fn n_rows(&self) -> usize {
        self.records.len()
    }

    /// Number of columns in the fixed schema.
    pub fn n_columns() -> usize {
        EXPECTED_HEADER.len()
    }

    pub fn n_cases(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.case_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}
