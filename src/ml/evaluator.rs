// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Scores a model on a labelled set. Call it with a model on a
// plain (non-autodiff) backend, e.g. the result of model.valid().
//
// argmax(1) returns shape [batch, 1], so it is flattened to
// [batch] before comparing with the labels.

use burn::{data::dataloader::DataLoader, prelude::*};

use crate::data::batcher::DigitBatch;
use crate::domain::accuracy::AccuracyTally;
use crate::ml::model::DigitMlp;

pub fn evaluate<B: Backend>(
    model:  &DigitMlp<B>,
    loader: &dyn DataLoader<DigitBatch<B>>,
) -> AccuracyTally {
    let mut tally = AccuracyTally::default();

    for batch in loader.iter() {
        let total   = batch.len();
        let output  = model.forward(batch.images);
        let correct = count_correct(output, batch.labels);
        tally.add_batch(correct, total);
    }

    tracing::debug!("Evaluated {} images, {} correct", tally.total, tally.correct);
    tally
}

/// Rows of `output` whose arg-max equals the label
pub fn count_correct<B: Backend>(output: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> usize {
    let predicted = output.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predicted
        .equal(labels)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    correct as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        batcher::digit_loader,
        dataset::{DigitDataset, MnistItem, IMAGE_HEIGHT, IMAGE_WIDTH},
        normalizer::Normalizer,
    };
    use crate::ml::model::DigitMlpConfig;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_count_correct_hand_computed() {
        let device = Default::default();
        // arg-max per row: 1, 0, 1, 2
        let output = Tensor::<TestBackend, 2>::from_floats(
            [
                [0.1, 0.8, 0.1],
                [0.6, 0.3, 0.1],
                [0.2, 0.5, 0.3],
                [0.1, 0.1, 0.8],
            ],
            &device,
        );
        let labels = Tensor::<TestBackend, 1, Int>::from_ints([1, 0, 0, 1], &device);

        let correct = count_correct(output, labels);
        assert_eq!(correct, 2);

        let mut tally = AccuracyTally::default();
        tally.add_batch(correct, 4);
        assert!((tally.accuracy() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_counts_every_image() {
        let device = Default::default();
        let model: DigitMlp<TestBackend> =
            DigitMlpConfig::new(vec![784, 8, 10]).init(&device).unwrap();

        let items: Vec<MnistItem> = (0..23)
            .map(|i| MnistItem {
                image: [[(i * 10) as f32; IMAGE_WIDTH]; IMAGE_HEIGHT],
                label: (i % 10) as u8,
            })
            .collect();
        let loader = digit_loader::<TestBackend>(
            DigitDataset::InMemory(items),
            5,
            Normalizer::default(),
            3,
            device,
        );

        let tally = evaluate(&model, &*loader);
        assert_eq!(tally.total, 23);
        assert!(tally.correct <= 23);
        assert!((0.0..=1.0).contains(&tally.accuracy()));
    }
}
