//! Scored candidate programs

use combo_core::ComboTree;

/// Per-row correctness signal of one program. A value `>= 0` marks a row the
/// program gets right (or selects correctly); negative values mark mistakes.
pub type BehavioralScore = Vec<f64>;

/// Default weight of a candidate that has not been through boosting
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A program tree together with its scores and ensemble weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    tree: ComboTree,
    score: f64,
    bscore: BehavioralScore,
    weight: f64,
}

impl ScoredCandidate {
    pub fn new(tree: ComboTree, score: f64, bscore: BehavioralScore) -> Self {
        Self {
            tree,
            score,
            bscore,
            weight: DEFAULT_WEIGHT,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn tree(&self) -> &ComboTree {
        &self.tree
    }

    /// Scalar score; higher is better
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn bscore(&self) -> &[f64] {
        &self.bscore
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }
}

/// Boolean-scorer convention: a correct row scores `0.0`, a wrong one `-1.0`.
pub fn is_correct(val: f64) -> bool {
    -0.5 < val
}
