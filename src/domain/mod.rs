// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs describing the core concepts of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs and enums
//
// Reference: Rust Book §5 (Structs), §6 (Enums)

// Layer widths and the Linear/activation stack they expand to
pub mod network_shape;

// Correct / total counts for classification accuracy
pub mod accuracy;
