//! Boosted ensembles of combo trees
//!
//! Candidates are promoted one at a time from a scored pool. After each
//! promotion the scorer's row weights are adjusted so the next selection
//! focuses on the rows the ensemble still gets wrong. Iterations are strictly
//! sequential: every choice depends on the previous reweighting.
//!
//! Two strategies are available:
//! - AdaBoost: best-first promotion with `alpha = ln((1-err)/err) / 2`
//! - Experts: in-order admission of trees that select rows precisely

use combo_core::{Builtin, ComboTree};
use tracing::{debug, info, warn};

use crate::candidate::{is_correct, ScoredCandidate};
use crate::errors::{EnsembleError, Result};
use crate::params::EnsembleParams;
use crate::scorer::WeightedScorer;

/// An ensemble under construction, together with the scorer driving it.
#[derive(Debug)]
pub struct Ensemble<S: WeightedScorer> {
    params: EnsembleParams,
    scorer: S,
    members: Vec<ScoredCandidate>,
    /// Rounding allowance for boundary comparisons on error values
    tolerance: f64,
    // Inexact-expert voting threshold state
    bias: f64,
    row_bias: Vec<f64>,
}

/// Index of the first candidate with the highest scalar score
fn best_candidate(cands: &[ScoredCandidate]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, cand) in cands.iter().enumerate() {
        match best {
            Some(b) if !(cand.score() > cands[b].score()) => {}
            _ => best = Some(i),
        }
    }
    best
}

fn alpha_for(err: f64) -> f64 {
    0.5 * ((1.0 - err) / err).ln()
}

impl<S: WeightedScorer> Ensemble<S> {
    /// Create an empty ensemble.
    ///
    /// With boosting enabled this resets the scorer's row weights; otherwise
    /// the scorer is left untouched and the ensemble stays inert.
    pub fn new(scorer: S, params: EnsembleParams) -> Result<Self> {
        params.validate()?;

        let mut ensemble = Self {
            params,
            scorer,
            members: Vec::new(),
            tolerance: 0.0,
            bias: 0.0,
            row_bias: Vec::new(),
        };
        if !ensemble.params.do_boosting {
            return Ok(ensemble);
        }

        ensemble.scorer.reset_weights();

        // Expected accumulated rounding error when totalling one score per
        // row; it grows like the square root of the row count.
        let rows = ensemble.scorer.size();
        ensemble.tolerance = 2.0 * f64::EPSILON * (rows as f64).sqrt();

        if ensemble.params.inexact_experts() {
            ensemble.row_bias = vec![0.0; rows];
            warn!("Experts: inexact expert bias accounting is experimental");
        }

        info!("Boosting: number to promote: {}", ensemble.params.num_to_promote);
        if ensemble.params.experts {
            info!("Boosting: exact experts: {}", ensemble.params.exact_experts);
            info!("Boosting: expalpha: {}", ensemble.params.expalpha);
        }
        Ok(ensemble)
    }

    /// Promote candidates from `cands` with the configured strategy.
    pub fn add_candidates(&mut self, cands: &mut Vec<ScoredCandidate>) -> Result<()> {
        if !self.params.do_boosting {
            debug!("Boosting disabled, {} candidates ignored", cands.len());
            return Ok(());
        }
        if self.params.experts {
            return self.add_expert(cands);
        }
        self.add_adaboost(cands)
    }

    /// Classic AdaBoost. Promoted candidates are removed from `cands`.
    pub fn add_adaboost(&mut self, cands: &mut Vec<ScoredCandidate>) -> Result<()> {
        let mut promoted = 0;

        while promoted < self.params.num_to_promote {
            // The least error is the highest score.
            let Some(best_idx) = best_candidate(cands) else {
                break;
            };
            let best = &cands[best_idx];
            info!("Boosting: candidate score={}", best.score());

            let err = self.scorer.error_of(best)?;
            if !(0.0..1.0).contains(&err) {
                return Err(EnsembleError::ErrorOutOfRange { err });
            }

            // A perfect classifier makes all previous boosting superfluous.
            if err < self.tolerance {
                info!("Boosting: perfect score found: {}", best.tree());
                let perfect = best.clone().with_weight(1.0);
                self.members.clear();
                self.members.push(perfect);
                self.scorer.reset_weights();
                return Ok(());
            }

            // Half gives a weight of zero; anything worse is negative.
            if 0.5 <= err {
                info!("Boosting: no improvement, ensemble not expanded");
                break;
            }

            let alpha = alpha_for(err);
            let expalpha = alpha.exp();
            let rcpalpha = 1.0 / expalpha;
            info!(
                "Boosting: add to ensemble {} with err={} alpha={} exp(alpha)={}",
                best.tree(),
                err,
                alpha,
                expalpha
            );

            let factors: Vec<f64> = best
                .bscore()
                .iter()
                .map(|&s| if is_correct(s) { rcpalpha } else { expalpha })
                .collect();

            let best = cands.remove(best_idx);
            self.insert(best.with_weight(alpha));
            self.scorer.update_weights(&factors)?;

            promoted += 1;
        }
        Ok(())
    }

    /// Admit trees that select rows expertly, in pool order.
    ///
    /// Exact mode accepts only trees whose error is within tolerance of
    /// zero. Inexact mode accepts anything better than chance and raises a
    /// voting threshold to neutralise wrongly selected rows. The pool is not
    /// modified.
    pub fn add_expert(&mut self, cands: &[ScoredCandidate]) -> Result<()> {
        let mut promoted = 0;

        for (num, cand) in cands.iter().enumerate() {
            let num = num + 1;
            let err = self.scorer.error_of(cand)?;
            if !(0.0 <= err + self.tolerance && err - self.tolerance <= 1.0) {
                return Err(EnsembleError::ErrorOutOfRange { err });
            }

            if self.params.exact_experts {
                if self.tolerance < err {
                    debug!(
                        "Exact expert {} not good enough, err={} score={}",
                        num,
                        err,
                        cand.score()
                    );
                    continue;
                }

                info!("Exact expert {} add to ensemble: {}", num, cand.tree());
                self.insert(cand.clone());

                let expalpha = self.params.expalpha;
                let rcpalpha = 1.0 / expalpha;

                // Rows correctly selected by the expert score strictly
                // positive; they become less important.
                let factors: Vec<f64> = cand
                    .bscore()
                    .iter()
                    .map(|&s| if 0.0 < s { rcpalpha } else { expalpha })
                    .collect();
                self.scorer.update_weights(&factors)?;
            } else {
                if 0.5 <= err {
                    debug!("Expert: terrible precision, ensemble not expanded: {}", err);
                    continue;
                }

                // Perfect experts are admitted, with a finite weight.
                let err = err.max(self.tolerance);
                let alpha = alpha_for(err);
                let expalpha = alpha.exp();
                let rcpalpha = 1.0 / expalpha;
                info!(
                    "Expert: add to ensemble; err={} alpha={} exp(alpha)={} {}",
                    err,
                    alpha,
                    expalpha,
                    cand.tree()
                );

                self.insert(cand.clone().with_weight(alpha));
                self.accumulate_bias(alpha, cand.bscore());
                info!("Experts: bias is now: {}", self.bias);

                let factors: Vec<f64> = cand
                    .bscore()
                    .iter()
                    .map(|&s| if 0.0 < s { rcpalpha } else { expalpha })
                    .collect();
                self.scorer.update_weights(&factors)?;
            }

            promoted += 1;
            if self.params.num_to_promote <= promoted {
                break;
            }
        }
        Ok(())
    }

    /// Raise the per-row bias where the new expert wrongly selected a row.
    ///
    /// Scores are assumed to lie in `[-0.5, 0.5]`: zero for an unselected
    /// row, positive for a correct selection, negative for a wrong one.
    fn accumulate_bias(&mut self, alpha: f64, bs: &[f64]) {
        for (row, &s) in self.row_bias.iter_mut().zip(bs) {
            if s >= 0.0 {
                continue;
            }
            *row += -2.0 * alpha * s;
            if self.bias < *row {
                self.bias = *row;
            }
        }
    }

    /// Add a member unless an identical tree is already present.
    fn insert(&mut self, cand: ScoredCandidate) -> bool {
        if self.members.iter().any(|m| m.tree() == cand.tree()) {
            debug!("Ensemble already holds {}", cand.tree());
            return false;
        }
        self.members.push(cand);
        true
    }

    /// The ensemble as a single program tree, or `None` when empty.
    pub fn weighted_tree(&self) -> Option<ComboTree> {
        match self.members.as_slice() {
            [] => None,
            [only] => Some(only.tree().clone()),
            members if !self.params.experts => Some(adaboost_tree(members)),
            members if self.params.exact_experts => Some(exact_tree(members)),
            members => Some(expert_tree(members, -self.bias * self.params.bias_scale)),
        }
    }

    /// Score of the ensemble used as a single predictor, independent of the
    /// boosting row weights: the sum of the scorer's set evaluation.
    pub fn flat_score(&self) -> Result<f64> {
        let bs = self.scorer.evaluate_set(&self.members)?;
        Ok(bs.iter().sum())
    }

    pub fn members(&self) -> &[ScoredCandidate] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Current inexact-expert threshold before scaling
    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn params(&self) -> &EnsembleParams {
        &self.params
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn into_scorer(self) -> S {
        self.scorer
    }
}

/// `0<(+(*(w_i +(-0.5 impulse(tree_i))) ...))`: each member votes `+w/2`
/// when true and `-w/2` when false.
fn adaboost_tree(members: &[ScoredCandidate]) -> ComboTree {
    let mut head = ComboTree::leaf(Builtin::GreaterThanZero);
    let plus = head.append_child(Builtin::Plus);

    for member in members {
        let times = plus.append_child(Builtin::Times);
        times.append_child(member.weight());

        let minus = times.append_child(Builtin::Plus);
        minus.append_child(-0.5_f64);
        minus.append_child(Builtin::Impulse).graft(member.tree());
    }
    head
}

/// `or(tree_1 tree_2 ...)`: true when any member is.
fn exact_tree(members: &[ScoredCandidate]) -> ComboTree {
    let mut head = ComboTree::leaf(Builtin::LogicalOr);
    for member in members {
        head.graft(member.tree());
    }
    head
}

/// `0<(+(threshold *(w_i impulse(tree_i)) ...))`: the weighted count of
/// firing members must beat the bias.
fn expert_tree(members: &[ScoredCandidate], threshold: f64) -> ComboTree {
    let mut head = ComboTree::leaf(Builtin::GreaterThanZero);
    let plus = head.append_child(Builtin::Plus);
    plus.append_child(threshold);

    for member in members {
        let times = plus.append_child(Builtin::Times);
        times.append_child(member.weight());
        times.append_child(Builtin::Impulse).graft(member.tree());
    }
    head
}
