// ============================================================
// Layer 4 — One-Hot Target Encoding
// ============================================================
// Turns class labels into rows of 0.0 with a single 1.0:
//
//   labels [2, 0], num_classes 3  →  [0,0,1, 1,0,0]
//
// The row width is `num_classes`, widened to `max(label) + 1`
// when a label falls outside the expected classes. The caller
// compares the resulting width against the network output and
// skips the batch when they differ.

/// Encode `labels` as a flat row-major one-hot matrix.
///
/// Returns the encoded values and the row width.
pub fn one_hot(labels: &[u8], num_classes: usize) -> (Vec<f32>, usize) {
    let width = labels
        .iter()
        .map(|&label| label as usize + 1)
        .max()
        .unwrap_or(0)
        .max(num_classes);

    let mut encoded = vec![0.0f32; labels.len() * width];
    for (row, &label) in labels.iter().enumerate() {
        encoded[row * width + label as usize] = 1.0;
    }

    (encoded, width)
}
