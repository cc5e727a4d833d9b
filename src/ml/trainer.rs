// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Plain mini-batch SGD on mean-squared error:
//
//   for each epoch:
//     for each shuffled batch:
//       output  = model(images)            softmax rows
//       targets = one_hot(labels)
//       skip the batch if output/target shapes differ
//       loss    = mean((output - targets)²)
//       θ       = θ - lr * ∂loss/∂θ
//
// Training runs on an AutodiffBackend. Validation (when a
// split exists) runs on model.valid(), the inner backend,
// so no autodiff graph is recorded.
//
// Reference: Burn Book §5 (Custom Training Loop)

use anyhow::{ensure, Result};
use burn::{
    module::AutodiffModule,
    nn::loss::{MseLoss, Reduction},
    optim::{GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::digit_loader, dataset::DigitDataset};
use crate::infra::metrics::EpochMetrics;
use crate::ml::{evaluator::evaluate, model::DigitMlp};

/// Train `model` for `cfg.epochs` epochs.
///
/// `on_epoch` sees the model and metrics after every epoch; an error
/// from it aborts training. Returns the fitted model and the metrics
/// of every epoch.
pub fn run_training<B, F>(
    cfg:           &TrainConfig,
    mut model:     DigitMlp<B>,
    train_dataset: DigitDataset,
    valid_dataset: Option<DigitDataset>,
    device:        &B::Device,
    mut on_epoch:  F,
) -> Result<(DigitMlp<B>, Vec<EpochMetrics>)>
where
    B: AutodiffBackend,
    F: FnMut(&DigitMlp<B>, &EpochMetrics) -> Result<()>,
{
    ensure!(cfg.batch_size > 0, "batch size must be positive");

    let normalizer  = cfg.normalizer()?;
    let num_classes = cfg.shape.output_width();

    let mut optim = SgdConfig::new().init();
    let loss_fn   = MseLoss::new();

    let train_loader = digit_loader::<B>(
        train_dataset,
        cfg.batch_size,
        normalizer,
        cfg.seed,
        device.clone(),
    );

    // Validation loader lives on the inner backend: no autodiff overhead
    let valid_loader = valid_dataset.map(|dataset| {
        digit_loader::<B::InnerBackend>(
            dataset,
            cfg.batch_size,
            normalizer,
            cfg.seed,
            device.clone(),
        )
    });

    let mut history = Vec::with_capacity(cfg.epochs);

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut applied  = 0usize;
        let mut skipped  = 0usize;

        for batch in train_loader.iter() {
            let targets = batch.one_hot_targets(num_classes);
            let output  = model.forward(batch.images);

            if output.dims() != targets.dims() {
                tracing::debug!(
                    "Skipping batch: output {:?} vs targets {:?}",
                    output.dims(),
                    targets.dims(),
                );
                skipped += 1;
                continue;
            }

            let loss = loss_fn.forward(output, targets, Reduction::Mean);
            loss_sum += loss.clone().into_scalar().elem::<f64>();
            applied  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.learning_rate, model, grads);
        }

        let train_loss = if applied > 0 {
            loss_sum / applied as f64
        } else {
            f64::NAN
        };

        let valid_accuracy = valid_loader
            .as_ref()
            .map(|loader| evaluate(&model.valid(), &**loader).accuracy());

        let metrics = EpochMetrics::new(epoch, train_loss, applied, skipped, valid_accuracy);

        match valid_accuracy {
            Some(acc) => tracing::info!(
                "Epoch {:>3}/{} | train_loss={:.6} | valid_acc={:.2}% | skipped={}",
                epoch, cfg.epochs, train_loss, acc * 100.0, skipped,
            ),
            None => tracing::info!(
                "Epoch {:>3}/{} | train_loss={:.6} | skipped={}",
                epoch, cfg.epochs, train_loss, skipped,
            ),
        }

        on_epoch(&model, &metrics)?;
        history.push(metrics);
    }

    Ok((model, history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{MnistItem, IMAGE_HEIGHT, IMAGE_WIDTH};
    use crate::domain::network_shape::NetworkShape;
    use crate::ml::model::DigitMlpConfig;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    /// Two trivially separable classes: dark images are 0, bright ones are 1
    fn toy_items(count: usize) -> Vec<MnistItem> {
        (0..count)
            .map(|i| {
                let label = (i % 2) as u8;
                let pixel = if label == 0 { 0.0 } else { 255.0 };
                MnistItem { image: [[pixel; IMAGE_WIDTH]; IMAGE_HEIGHT], label }
            })
            .collect()
    }

    fn toy_config(epochs: usize) -> TrainConfig {
        TrainConfig {
            shape: NetworkShape::new(vec![784, 16, 10]).unwrap(),
            epochs,
            batch_size: 10,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_loss_decreases_on_toy_dataset() {
        let device = Default::default();
        TestBackend::seed(7);

        let cfg   = toy_config(10);
        let model = DigitMlpConfig::from_shape(&cfg.shape)
            .init::<TestBackend>(&device)
            .unwrap();

        let (_, history) = run_training(
            &cfg,
            model,
            DigitDataset::InMemory(toy_items(40)),
            None,
            &device,
            |_, _| Ok(()),
        )
        .unwrap();

        assert_eq!(history.len(), 10);
        let first = history.first().unwrap().train_loss;
        let last  = history.last().unwrap().train_loss;
        assert!(last < first, "loss did not decrease: {first} -> {last}");
        assert!(history.iter().all(|m| m.skipped_batches == 0));
        assert!(history.iter().all(|m| m.applied_batches == 4));
    }

    #[test]
    fn test_mismatched_batches_are_skipped() {
        let device = Default::default();
        let cfg    = toy_config(1);
        let model  = DigitMlpConfig::from_shape(&cfg.shape)
            .init::<TestBackend>(&device)
            .unwrap();

        // Label 12 widens the one-hot rows to 13 columns against 10 outputs
        let items: Vec<MnistItem> = (0..10)
            .map(|_| MnistItem { image: [[0.0; IMAGE_WIDTH]; IMAGE_HEIGHT], label: 12 })
            .collect();

        let (_, history) = run_training(
            &cfg,
            model,
            DigitDataset::InMemory(items),
            None,
            &device,
            |_, _| Ok(()),
        )
        .unwrap();

        assert_eq!(history[0].applied_batches, 0);
        assert_eq!(history[0].skipped_batches, 1);
        assert!(history[0].train_loss.is_nan());
    }

    #[test]
    fn test_validation_accuracy_and_callback() {
        let device = Default::default();
        let cfg    = toy_config(2);
        let model  = DigitMlpConfig::from_shape(&cfg.shape)
            .init::<TestBackend>(&device)
            .unwrap();

        let mut seen = Vec::new();
        let (_, history) = run_training(
            &cfg,
            model,
            DigitDataset::InMemory(toy_items(20)),
            Some(DigitDataset::InMemory(toy_items(6))),
            &device,
            |_, m| {
                seen.push(m.epoch);
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(seen, vec![1, 2]);
        for m in &history {
            let acc = m.valid_accuracy.unwrap();
            assert!((0.0..=1.0).contains(&acc));
        }
    }

    #[test]
    fn test_callback_error_aborts() {
        let device = Default::default();
        let cfg    = toy_config(3);
        let model  = DigitMlpConfig::from_shape(&cfg.shape)
            .init::<TestBackend>(&device)
            .unwrap();

        let result = run_training(
            &cfg,
            model,
            DigitDataset::InMemory(toy_items(10)),
            None,
            &device,
            |_, _| anyhow::bail!("disk full"),
        );
        assert!(result.is_err());
    }
}
