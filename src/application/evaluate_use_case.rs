// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Rebuilds a trained network from the checkpoint directory and
// scores it on the test split:
//
//   Step 1: Load train_config.json     (Layer 6 - infra)
//   Step 2: Rebuild the model shape    (Layer 5 - ml)
//   Step 3: Load the latest weights    (Layer 6 - infra)
//   Step 4: Evaluate on the test split (Layer 5 - ml)

use anyhow::Result;
use burn::prelude::*;

use crate::data::{batcher::digit_loader, dataset::DigitSource};
use crate::domain::accuracy::AccuracyTally;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{evaluator::evaluate, model::DigitMlpConfig};

pub struct EvaluateUseCase<S: DigitSource> {
    checkpoint_dir: String,
    source:         S,
}

impl<S: DigitSource> EvaluateUseCase<S> {
    pub fn new(checkpoint_dir: impl Into<String>, source: S) -> Self {
        Self { checkpoint_dir: checkpoint_dir.into(), source }
    }

    /// Runs in inference mode: `B` is a plain backend, no autodiff.
    pub fn execute<B: Backend>(&self, device: B::Device) -> Result<AccuracyTally> {
        let ckpt = CheckpointManager::open(&self.checkpoint_dir)?;
        let cfg  = ckpt.load_config()?;
        cfg.validate()?;

        let model = DigitMlpConfig::from_shape(&cfg.shape).init::<B>(&device)?;
        let model = ckpt.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint: widths {}", cfg.shape);

        let test_loader = digit_loader::<B>(
            self.source.test()?,
            cfg.batch_size,
            cfg.normalizer()?,
            cfg.seed,
            device,
        );
        Ok(evaluate(&model, &*test_loader))
    }
}
