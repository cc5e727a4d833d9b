// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Validate the configuration
//   Step 2: Load train/test splits      (Layer 4 - data)
//   Step 3: Optional validation split   (Layer 4 - data)
//   Step 4: Save config                 (Layer 6 - infra)
//   Step 5: Build the network           (Layer 5 - ml)
//   Step 6: Run training loop           (Layer 5 - ml)
//   Step 7: Evaluate on the test split  (Layer 5 - ml)

use anyhow::{ensure, Result};
use burn::{
    data::dataset::Dataset,
    module::AutodiffModule,
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};

use crate::data::{
    batcher::digit_loader,
    dataset::{DigitSource, IMAGE_PIXELS, NUM_CLASSES},
    normalizer::Normalizer,
};
use crate::domain::{accuracy::AccuracyTally, network_shape::NetworkShape};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::{evaluator::evaluate, model::DigitMlpConfig, trainer::run_training};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved next to the checkpoints and
// reloaded by `evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub checkpoint_dir: String,
    pub shape:          NetworkShape,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub learning_rate:  f64,
    pub norm_mean:      f32,
    pub norm_std:       f32,
    pub valid_fraction: f64,
    pub seed:           u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir: "checkpoints".to_string(),
            shape:          NetworkShape::default(),
            batch_size:     10,
            epochs:         5,
            learning_rate:  3.0,
            norm_mean:      0.5,
            norm_std:       0.5,
            valid_fraction: 0.0,
            seed:           42,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.batch_size > 0, "batch size must be positive");
        ensure!(
            self.learning_rate.is_finite() && self.learning_rate > 0.0,
            "learning rate must be positive, got {}",
            self.learning_rate
        );
        ensure!(
            (0.0..1.0).contains(&self.valid_fraction),
            "validation fraction must be in [0, 1), got {}",
            self.valid_fraction
        );
        ensure!(
            self.shape.input_width() == IMAGE_PIXELS,
            "input width must be {IMAGE_PIXELS} (28x28 pixels), got {}",
            self.shape.input_width()
        );
        self.normalizer()?;

        if self.shape.output_width() < NUM_CLASSES {
            tracing::warn!(
                "Output width {} is below the {} digit classes; every batch will be skipped",
                self.shape.output_width(),
                NUM_CLASSES,
            );
        }
        Ok(())
    }

    pub fn normalizer(&self) -> Result<Normalizer> {
        Normalizer::new(self.norm_mean, self.norm_std)
    }
}

/// What a training run produced
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub epochs: Vec<EpochMetrics>,
    pub test:   AccuracyTally,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase<S: DigitSource> {
    config: TrainConfig,
    source: S,
}

impl<S: DigitSource> TrainUseCase<S> {
    pub fn new(config: TrainConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Execute the full pipeline on backend `B`, end to end
    pub fn execute<B: AutodiffBackend>(&self, device: B::Device) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: Validate ──────────────────────────────────────────────────
        cfg.validate()?;
        B::seed(cfg.seed);

        // ── Step 2: Load the MNIST splits ─────────────────────────────────────
        let train_dataset = self.source.train()?;
        let test_dataset  = self.source.test()?;

        // ── Step 3: Carve out a validation split if requested ─────────────────
        let (train_dataset, valid_dataset) = if cfg.valid_fraction > 0.0 {
            let (train, valid) = train_dataset.split_validation(cfg.valid_fraction, cfg.seed);
            (train, Some(valid))
        } else {
            (train_dataset, None)
        };

        tracing::info!(
            "Data ready: {} train, {} validation, {} test images",
            train_dataset.len(),
            valid_dataset.as_ref().map_or(0, |d| d.len()),
            test_dataset.len(),
        );

        // ── Step 4: Save config for `evaluate` ────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt_manager.save_config(cfg)?;
        let metrics_logger = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 5: Build the network ─────────────────────────────────────────
        let model = DigitMlpConfig::from_shape(&cfg.shape).init::<B>(&device)?;
        tracing::info!("Model ready: widths {}", cfg.shape);
        tracing::debug!("Layer stack: {:?}", model.layers()?);

        // ── Step 6: Train, checkpointing and logging every epoch ──────────────
        let (model, epochs) = run_training(
            cfg,
            model,
            train_dataset,
            valid_dataset,
            &device,
            |model, metrics| {
                ckpt_manager.save_model(model, metrics.epoch)?;
                metrics_logger.log(metrics)
            },
        )?;

        // ── Step 7: Evaluate in inference mode ────────────────────────────────
        let test_loader = digit_loader::<B::InnerBackend>(
            test_dataset,
            cfg.batch_size,
            cfg.normalizer()?,
            cfg.seed,
            device,
        );
        let test = evaluate(&model.valid(), &*test_loader);

        tracing::info!(
            "Training complete! Test accuracy {:.2}% ({} / {})",
            test.accuracy() * 100.0,
            test.correct,
            test.total,
        );
        tracing::info!("Epoch metrics written to '{}'", metrics_logger.csv_path().display());

        Ok(TrainReport { epochs, test })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::dataset::{DigitDataset, MnistItem, IMAGE_HEIGHT, IMAGE_WIDTH};
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    /// Small in-memory stand-in for MNIST: dark zeros, bright ones
    pub(crate) struct SyntheticSource {
        pub train: usize,
        pub test:  usize,
    }

    fn items(count: usize) -> Vec<MnistItem> {
        (0..count)
            .map(|i| {
                let label = (i % 2) as u8;
                let pixel = 255.0 * label as f32;
                MnistItem { image: [[pixel; IMAGE_WIDTH]; IMAGE_HEIGHT], label }
            })
            .collect()
    }

    impl DigitSource for SyntheticSource {
        fn train(&self) -> Result<DigitDataset> {
            Ok(DigitDataset::InMemory(items(self.train)))
        }

        fn test(&self) -> Result<DigitDataset> {
            Ok(DigitDataset::InMemory(items(self.test)))
        }
    }

    pub(crate) fn scratch_dir(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("mnist-mlp-{name}-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        dir.to_string_lossy().into_owned()
    }

    #[test]
    fn test_default_config_matches_reference_run() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.shape.widths(), &[784, 30, 10]);
        assert_eq!(cfg.batch_size, 10);
        assert_eq!(cfg.epochs, 5);
        assert_eq!(cfg.learning_rate, 3.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            TrainConfig { batch_size: 0, ..TrainConfig::default() },
            TrainConfig { learning_rate: 0.0, ..TrainConfig::default() },
            TrainConfig { valid_fraction: 1.0, ..TrainConfig::default() },
            TrainConfig { norm_std: 0.0, ..TrainConfig::default() },
            TrainConfig {
                shape: NetworkShape::new(vec![100, 10]).unwrap(),
                ..TrainConfig::default()
            },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "accepted {cfg:?}");
        }
    }

    #[test]
    fn test_execute_end_to_end() {
        let dir = scratch_dir("train-e2e");
        let cfg = TrainConfig {
            checkpoint_dir: dir.clone(),
            shape:          NetworkShape::new(vec![784, 8, 10]).unwrap(),
            epochs:         2,
            valid_fraction: 0.2,
            ..TrainConfig::default()
        };

        let use_case = TrainUseCase::new(cfg, SyntheticSource { train: 30, test: 12 });
        let report   = use_case.execute::<TestBackend>(Default::default()).unwrap();

        assert_eq!(report.epochs.len(), 2);
        assert_eq!(report.test.total, 12);
        assert!(report.epochs.iter().all(|m| m.valid_accuracy.is_some()));

        let root = std::path::Path::new(&dir);
        assert!(root.join("train_config.json").exists());
        assert!(root.join("latest_epoch.json").exists());
        assert!(root.join("metrics.csv").exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
