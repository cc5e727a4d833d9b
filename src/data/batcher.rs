// ============================================================
// Layer 4 — Digit Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<MnistItem>
// into tensors:
//
//   Input:  N items, each a 28x28 image and a label
//   Output: DigitBatch with
//             images [N, 784]  (normalised, row-major)
//             labels [N]
//
// Each image is flattened into one long Vec, then reshaped:
//   [i1_p1, ..., i1_p784, i2_p1, ..., iN_p784] → [N, 784]
//
// Reference: Burn Book §4 (Batcher)

use std::sync::Arc;

use burn::{
    data::dataloader::{batcher::Batcher, DataLoader, DataLoaderBuilder},
    prelude::*,
};

use crate::data::{
    dataset::{DigitDataset, MnistItem, IMAGE_PIXELS},
    encoding::one_hot,
    normalizer::Normalizer,
};

// ─── DigitBatch ───────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct DigitBatch<B: Backend> {
    /// Normalised pixels, shape [batch_size, 784]
    pub images: Tensor<B, 2>,

    /// True classes, shape [batch_size]
    pub labels: Tensor<B, 1, Int>,

    /// The same classes on the host, used to build one-hot targets
    pub label_values: Vec<u8>,
}

impl<B: Backend> DigitBatch<B> {
    pub fn len(&self) -> usize {
        self.label_values.len()
    }

    /// One-hot targets of shape [batch_size, width].
    ///
    /// `width` is `num_classes` unless a label lies outside it.
    pub fn one_hot_targets(&self, num_classes: usize) -> Tensor<B, 2> {
        let (encoded, width) = one_hot(&self.label_values, num_classes);
        Tensor::<B, 1>::from_floats(encoded.as_slice(), &self.images.device())
            .reshape([self.len(), width])
    }
}

// ─── DigitBatcher ─────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct DigitBatcher<B: Backend> {
    device:     B::Device,
    normalizer: Normalizer,
}

impl<B: Backend> DigitBatcher<B> {
    pub fn new(device: B::Device, normalizer: Normalizer) -> Self {
        Self { device, normalizer }
    }
}

impl<B: Backend> Batcher<MnistItem, DigitBatch<B>> for DigitBatcher<B> {
    fn batch(&self, items: Vec<MnistItem>) -> DigitBatch<B> {
        let batch_size = items.len();

        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|item| self.normalizer.flatten(&item.image))
            .collect();

        let label_values: Vec<u8> = items.iter().map(|item| item.label).collect();
        let label_ints:   Vec<i32> = label_values.iter().map(|&l| l as i32).collect();

        let images = Tensor::<B, 1>::from_floats(pixels.as_slice(), &self.device)
            .reshape([batch_size, IMAGE_PIXELS]);
        let labels = Tensor::<B, 1, Int>::from_ints(label_ints.as_slice(), &self.device);

        DigitBatch { images, labels, label_values }
    }
}

/// Build a shuffling DataLoader over `dataset`.
pub fn digit_loader<B: Backend>(
    dataset:    DigitDataset,
    batch_size: usize,
    normalizer: Normalizer,
    seed:       u64,
    device:     B::Device,
) -> Arc<dyn DataLoader<DigitBatch<B>>> {
    DataLoaderBuilder::new(DigitBatcher::<B>::new(device, normalizer))
        .batch_size(batch_size)
        .shuffle(seed)
        .num_workers(1)
        .build(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{IMAGE_HEIGHT, IMAGE_WIDTH};
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn item(pixel: f32, label: u8) -> MnistItem {
        MnistItem { image: [[pixel; IMAGE_WIDTH]; IMAGE_HEIGHT], label }
    }

    #[test]
    fn test_batch_shapes_and_normalisation() {
        let batcher = DigitBatcher::<TestBackend>::new(Default::default(), Normalizer::default());
        let batch   = batcher.batch(vec![item(0.0, 4), item(255.0, 9), item(0.0, 1)]);

        assert_eq!(batch.images.dims(), [3, IMAGE_PIXELS]);
        assert_eq!(batch.labels.dims(), [3]);
        assert_eq!(batch.label_values, vec![4, 9, 1]);

        let pixels = batch.images.into_data().to_vec::<f32>().unwrap();
        assert_eq!(pixels[0], -1.0);
        assert_eq!(pixels[IMAGE_PIXELS], 1.0);
    }

    #[test]
    fn test_one_hot_targets() {
        let batcher = DigitBatcher::<TestBackend>::new(Default::default(), Normalizer::default());
        let batch   = batcher.batch(vec![item(0.0, 2), item(0.0, 0)]);

        let targets = batch.one_hot_targets(10);
        assert_eq!(targets.dims(), [2, 10]);
        let values = targets.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values[2], 1.0);
        assert_eq!(values[10], 1.0);
        assert_eq!(values.iter().sum::<f32>(), 2.0);
    }

    #[test]
    fn test_loader_covers_dataset() {
        let items: Vec<MnistItem> = (0..25).map(|i| item(0.0, (i % 10) as u8)).collect();
        let loader = digit_loader::<TestBackend>(
            DigitDataset::InMemory(items),
            10,
            Normalizer::default(),
            42,
            Default::default(),
        );

        let sizes: Vec<usize> = loader.iter().map(|b| b.len()).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 25);
        assert_eq!(sizes.len(), 3);
    }
}
