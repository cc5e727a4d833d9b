// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the MNIST files to tensor batches.
//
//   MnistSource       → burn downloads and decodes MNIST
//       │
//       ▼
//   DigitDataset      → implements Burn's Dataset trait
//       │                (optionally split into train/valid)
//       ▼
//   DigitBatcher      → normalises pixels, stacks a batch
//       │
//       ▼
//   DataLoader        → shuffled mini-batches for training
//                       and evaluation
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// MNIST source, in-memory datasets and image constants
pub mod dataset;

/// (x / 255 - mean) / std pixel normalisation
pub mod normalizer;

/// Label → one-hot target rows
pub mod encoding;

/// Implements Burn's Batcher trait and builds DataLoaders
pub mod batcher;

/// Seeded shuffle and train/validation split
pub mod splitter;
