//! Weighted scoring collaborator
//!
//! The ensemble engine never computes behavioral scores itself. It drives a
//! [`WeightedScorer`], which owns the per-row weights and turns candidates
//! into weighted errors. [`BehaviorTable`] is the in-memory implementation
//! over precomputed behavioral scores.

use crate::candidate::{is_correct, BehavioralScore, ScoredCandidate};
use crate::errors::{EnsembleError, Result};

/// Row-weighted scoring interface consumed by the ensemble engine.
pub trait WeightedScorer {
    /// Number of data rows
    fn size(&self) -> usize;

    /// Weighted error of `candidate` under the current row weights.
    /// Implementations must return a value in `[0, 1)` for usable candidates.
    fn error_of(&self, candidate: &ScoredCandidate) -> Result<f64>;

    /// Behavioral score of a set of candidates voting as one predictor.
    /// Row weights play no part.
    fn evaluate_set(&self, members: &[ScoredCandidate]) -> Result<BehavioralScore>;

    /// Make all row weights equal
    fn reset_weights(&mut self);

    /// Apply one reweighting factor per row
    fn update_weights(&mut self, factors: &[f64]) -> Result<()>;
}

/// Scorer over the behavioral scores carried by the candidates themselves.
///
/// Row weights always sum to the row count. A row counts as an error when
/// its score is not above `-0.5`. A set of candidates is scored by its
/// weighted vote: each member adds `+weight` on rows it gets right and
/// `-weight` on rows it gets wrong, and the set is right where the total is
/// positive.
#[derive(Debug, Clone)]
pub struct BehaviorTable {
    weights: Vec<f64>,
}

impl BehaviorTable {
    pub fn new(rows: usize) -> Result<Self> {
        if rows == 0 {
            return Err(EnsembleError::InvalidParameters(
                "scorer needs at least one row".to_string(),
            ));
        }
        Ok(Self {
            weights: vec![1.0; rows],
        })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn check_len(&self, found: usize) -> Result<()> {
        if found != self.weights.len() {
            return Err(EnsembleError::WeightLength {
                expected: self.weights.len(),
                found,
            });
        }
        Ok(())
    }
}

impl WeightedScorer for BehaviorTable {
    fn size(&self) -> usize {
        self.weights.len()
    }

    fn error_of(&self, candidate: &ScoredCandidate) -> Result<f64> {
        let bs = candidate.bscore();
        self.check_len(bs.len())?;

        let total: f64 = self.weights.iter().sum();
        let wrong: f64 = self
            .weights
            .iter()
            .zip(bs)
            .filter(|&(_, &s)| !is_correct(s))
            .map(|(w, _)| w)
            .sum();
        Ok(wrong / total)
    }

    fn evaluate_set(&self, members: &[ScoredCandidate]) -> Result<BehavioralScore> {
        // An empty set makes no predictions.
        if members.is_empty() {
            return Ok(vec![0.0; self.weights.len()]);
        }

        let mut votes = vec![0.0; self.weights.len()];
        for member in members {
            self.check_len(member.bscore().len())?;
            for (vote, &s) in votes.iter_mut().zip(member.bscore()) {
                *vote += if is_correct(s) {
                    member.weight()
                } else {
                    -member.weight()
                };
            }
        }
        Ok(votes
            .into_iter()
            .map(|v| if 0.0 < v { 0.0 } else { -1.0 })
            .collect())
    }

    fn reset_weights(&mut self) {
        self.weights.iter_mut().for_each(|w| *w = 1.0);
    }

    fn update_weights(&mut self, factors: &[f64]) -> Result<()> {
        self.check_len(factors.len())?;

        let mut norm = 0.0;
        for (w, f) in self.weights.iter_mut().zip(factors) {
            *w *= f;
            norm += *w;
        }
        if norm > 0.0 {
            let scale = self.weights.len() as f64 / norm;
            self.weights.iter_mut().for_each(|w| *w *= scale);
        }
        Ok(())
    }
}
