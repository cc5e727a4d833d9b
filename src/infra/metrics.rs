// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:           the epoch number (1, 2, 3, ...)
//   - train_loss:      mean MSE over the batches that were applied
//   - applied_batches: batches that produced a gradient step
//   - skipped_batches: batches dropped by the shape guard
//   - valid_accuracy:  accuracy on the hold-out split (empty if none)
//
// Output file: checkpoints/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,applied_batches,skipped_batches,valid_accuracy
//   1,0.021930,6000,0,
//   2,0.011845,6000,0,

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

const CSV_HEADER: &str = "epoch,train_loss,applied_batches,skipped_batches,valid_accuracy";

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// NaN when every batch of the epoch was skipped
    pub train_loss: f64,

    pub applied_batches: usize,
    pub skipped_batches: usize,

    /// Range: [0.0, 1.0]; None without a validation split
    pub valid_accuracy: Option<f64>,
}

impl EpochMetrics {
    pub fn new(
        epoch:           usize,
        train_loss:      f64,
        applied_batches: usize,
        skipped_batches: usize,
        valid_accuracy:  Option<f64>,
    ) -> Self {
        Self { epoch, train_loss, applied_batches, skipped_batches, valid_accuracy }
    }

    fn csv_row(&self) -> String {
        let valid = self
            .valid_accuracy
            .map(|acc| format!("{acc:.6}"))
            .unwrap_or_default();
        format!(
            "{},{:.6},{},{},{}",
            self.epoch, self.train_loss, self.applied_batches, self.skipped_batches, valid,
        )
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger for one training run.
    /// Any metrics.csv left by an earlier run is replaced, so the rows
    /// always match the train_config.json saved next to them.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "{CSV_HEADER}")?;
        tracing::debug!("Started metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{}", m.csv_row())?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, skipped={}",
            m.epoch,
            m.train_loss,
            m.skipped_batches,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
