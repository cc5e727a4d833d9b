// ============================================================
// Layer 3 — Accuracy Tally
// ============================================================
// Counts correct predictions against the total number of
// images seen. Plain Rust, no tensors: the evaluator reduces
// each batch to a (correct, total) pair and folds it in here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyTally {
    pub correct: usize,
    pub total:   usize,
}

impl AccuracyTally {
    /// Fold in the counts of one evaluated batch
    pub fn add_batch(&mut self, correct: usize, total: usize) {
        self.correct += correct;
        self.total   += total;
    }

    /// Fraction correct, 0.0 when nothing was evaluated
    pub fn accuracy(&self) -> f64 {
        if self.total > 0 {
            self.correct as f64 / self.total as f64
        } else {
            0.0
        }
    }
}
