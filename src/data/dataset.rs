// ============================================================
// Layer 4 — Digit Datasets and Sources
// ============================================================
// MNIST itself is downloaded, cached and decoded by burn's
// vision dataset. This module only decides WHERE the train
// and test splits come from:
//
//   MnistSource      → burn's MnistDataset (downloads on first use)
//   DigitDataset     → one type the DataLoader can consume,
//                      backed either by MNIST or by items in memory
//
// Reference: Burn Book §4 (Datasets)

use anyhow::Result;
use burn::data::dataset::{vision::MnistDataset, Dataset};

pub use burn::data::dataset::vision::MnistItem;

use crate::data::splitter::split_train_val;

pub const IMAGE_WIDTH:  usize = 28;
pub const IMAGE_HEIGHT: usize = 28;
/// Length of a flattened image row
pub const IMAGE_PIXELS: usize = IMAGE_WIDTH * IMAGE_HEIGHT;
/// Digits 0 through 9
pub const NUM_CLASSES:  usize = 10;

// ─── DigitSource ──────────────────────────────────────────────────────────────
/// Anything that can provide the train and test splits.
///
/// Implementations:
///   - MnistSource → the real MNIST files
///   - in-memory sources in the unit tests
pub trait DigitSource {
    fn train(&self) -> Result<DigitDataset>;
    fn test(&self)  -> Result<DigitDataset>;
}

/// The real MNIST dataset, cached by burn under the user's cache directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct MnistSource;

impl DigitSource for MnistSource {
    fn train(&self) -> Result<DigitDataset> {
        tracing::info!("Loading MNIST training split");
        Ok(DigitDataset::Mnist(MnistDataset::train()))
    }

    fn test(&self) -> Result<DigitDataset> {
        tracing::info!("Loading MNIST test split");
        Ok(DigitDataset::Mnist(MnistDataset::test()))
    }
}

// ─── DigitDataset ─────────────────────────────────────────────────────────────
pub enum DigitDataset {
    Mnist(MnistDataset),
    InMemory(Vec<MnistItem>),
}

impl DigitDataset {
    /// Copy every item into memory
    pub fn into_items(self) -> Vec<MnistItem> {
        match self {
            Self::InMemory(items) => items,
            Self::Mnist(dataset) => dataset.iter().collect(),
        }
    }

    /// Hold out `valid_fraction` of the items for validation.
    ///
    /// Returns (train, valid). The split is shuffled with `seed`.
    pub fn split_validation(self, valid_fraction: f64, seed: u64) -> (Self, Self) {
        let (train, valid) = split_train_val(self.into_items(), 1.0 - valid_fraction, seed);
        (Self::InMemory(train), Self::InMemory(valid))
    }
}

impl Dataset<MnistItem> for DigitDataset {
    fn get(&self, index: usize) -> Option<MnistItem> {
        match self {
            Self::Mnist(dataset)  => dataset.get(index),
            Self::InMemory(items) => items.get(index).cloned(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Mnist(dataset)  => dataset.len(),
            Self::InMemory(items) => items.len(),
        }
    }
}
