use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// One scored competency dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionDefinition {
    pub id: String,
    pub label: String,
    pub weight: f64, // (0, 1]
    pub description: String,
}

#[derive(Debug, Error)]
pub enum CriteriaError {
    #[error("criteria table is empty")]
    Empty,

    #[error("duplicate criterion id '{0}'")]
    DuplicateId(String),

    #[error("criterion '{id}' has weight {weight}, expected a value in (0, 1]")]
    WeightOutOfRange { id: String, weight: f64 },

    #[error("criterion weights sum to {0}, expected 1.0")]
    WeightSum(f64),

    #[error("failed to read criteria file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse criteria file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable, validated set of criteria. Built once at startup and shared
/// read-only between the scorer and the router.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CriteriaTable(Vec<CriterionDefinition>);

impl CriteriaTable {
    pub fn new(criteria: Vec<CriterionDefinition>) -> Result<Self, CriteriaError> {
        if criteria.is_empty() {
            return Err(CriteriaError::Empty);
        }

        let mut seen = HashSet::new();
        for c in &criteria {
            if !seen.insert(c.id.as_str()) {
                return Err(CriteriaError::DuplicateId(c.id.clone()));
            }
            if !(c.weight > 0.0 && c.weight <= 1.0) {
                return Err(CriteriaError::WeightOutOfRange {
                    id: c.id.clone(),
                    weight: c.weight,
                });
            }
        }

        let sum: f64 = criteria.iter().map(|c| c.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CriteriaError::WeightSum(sum));
        }

        Ok(Self(criteria))
    }

    /// Loads a JSON array of criterion definitions.
    pub fn from_json_file(path: &Path) -> Result<Self, CriteriaError> {
        let raw = std::fs::read_to_string(path)?;
        let criteria: Vec<CriterionDefinition> = serde_json::from_str(&raw)?;
        Self::new(criteria)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CriterionDefinition> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|c| c.id == id)
    }
}

impl Default for CriteriaTable {
    /// The six interview competencies.
    fn default() -> Self {
        let row = |id: &str, label: &str, weight: f64, description: &str| CriterionDefinition {
            id: id.to_string(),
            label: label.to_string(),
            weight,
            description: description.to_string(),
        };

        Self(vec![
            row("language", "Language", 0.10, "Clarity & Fluency"),
            row("communication", "Communication Skill", 0.25, "Expression & Confidence"),
            row("business", "Business Setup Knowledge", 0.20, "Regulations & Market"),
            row("attitude", "Attitude", 0.10, "Positivity & Adaptability"),
            row("professionalism", "Professionalism", 0.15, "Behavior & Respect"),
            row("logic", "Logical Thinking", 0.20, "Reasoning & Strategy"),
        ])
    }
}
