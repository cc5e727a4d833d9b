// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Model, training loop and evaluation, all on burn tensors.
//
//   model.rs     — DigitMlp: Linear + Sigmoid per hidden layer,
//                  Linear + Softmax at the output
//
//   trainer.rs   — Mini-batch SGD on MSE against one-hot labels,
//                  with the output/target shape guard
//
//   evaluator.rs — Arg-max predictions and accuracy
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Layered feed-forward classifier and its config
pub mod model;

/// Training loop
pub mod trainer;

/// Accuracy over a DataLoader
pub mod evaluator;

use burn::backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, NdArray, Wgpu};

/// CPU backend
pub type CpuBackend = NdArray;
pub type CpuDevice  = NdArrayDevice;

/// GPU backend
pub type GpuBackend = Wgpu;
pub type GpuDevice  = WgpuDevice;
