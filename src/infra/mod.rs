// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that touch the filesystem:
//
//   checkpoint.rs — Saving and loading model weights with
//                   Burn's CompactRecorder, plus the
//                   TrainConfig as JSON so `evaluate` can
//                   rebuild the model.
//
//   metrics.rs    — Writes epoch-level metrics (loss,
//                   skipped batches, validation accuracy)
//                   to a CSV file.
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
