//! Candidate pool files
//!
//! A pool is JSON produced by the search stage:
//!
//! ```json
//! {
//!   "rows": 4,
//!   "labels": ["outlook", "windy"],
//!   "candidates": [
//!     {"tree": "and($outlook !$windy)", "score": -1.0, "bscore": [0, -1, 0, 0]}
//!   ]
//! }
//! ```

use combo_core::parse_combo;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::candidate::ScoredCandidate;
use crate::errors::{EnsembleError, Result};

/// One candidate as written by the search stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolEntry {
    /// Canonical combo text; may use labels
    pub tree: String,
    pub score: f64,
    pub bscore: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Scored candidate pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatePool {
    /// Number of data rows every behavioral score covers
    pub rows: usize,
    #[serde(default)]
    pub labels: Vec<String>,
    pub candidates: Vec<PoolEntry>,
}

impl CandidatePool {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse every tree and check every score vector against `rows`.
    pub fn candidates(&self) -> Result<Vec<ScoredCandidate>> {
        self.candidates
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                if entry.bscore.len() != self.rows {
                    return Err(EnsembleError::WeightLength {
                        expected: self.rows,
                        found: entry.bscore.len(),
                    });
                }
                let tree = parse_combo(&entry.tree, &self.labels)?;
                let cand = ScoredCandidate::new(tree, entry.score, entry.bscore.clone());
                match entry.weight {
                    None => Ok(cand),
                    Some(w) if w.is_finite() && w > 0.0 => Ok(cand.with_weight(w)),
                    Some(w) => Err(EnsembleError::InvalidParameters(format!(
                        "candidate {} has non-positive weight {}",
                        i + 1,
                        w
                    ))),
                }
            })
            .collect()
    }
}
