// ============================================================
// Layer 3 — Network Shape Domain Type
// ============================================================
// Describes a fully-connected network as an ordered list of
// layer widths:
//
//   [input, hidden_1, ..., hidden_k, output]
//
// Every consecutive pair of widths is one transition:
//   - hidden transitions: Linear → Sigmoid
//   - final transition:   Linear → Softmax
//
// Example: [784, 30, 10] expands to
//   Linear(784 → 30), Sigmoid, Linear(30 → 10), Softmax
//
// Reference: Rust Book §5 (Structs), §9 (Error Handling)

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Nonlinearity applied after a linear projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Sigmoid,
    Softmax,
}

/// One step of the sequential computation graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Linear { d_input: usize, d_output: usize },
    Activation(Activation),
}

/// Validated list of layer widths.
///
/// Always holds at least two widths (input and output), all positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct NetworkShape {
    widths: Vec<usize>,
}

impl NetworkShape {
    pub fn new(widths: Vec<usize>) -> Result<Self> {
        ensure!(
            widths.len() >= 2,
            "a network needs an input and an output width, got {widths:?}"
        );
        ensure!(
            widths.iter().all(|&w| w > 0),
            "layer widths must be positive, got {widths:?}"
        );
        Ok(Self { widths })
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn input_width(&self) -> usize {
        self.widths[0]
    }

    pub fn output_width(&self) -> usize {
        self.widths[self.widths.len() - 1]
    }

    /// (d_input, d_output) for every linear projection, in order
    pub fn transitions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.widths.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Expand the widths into the alternating Linear / activation stack.
    pub fn layers(&self) -> Vec<LayerKind> {
        let last = self.widths.len() - 2;

        self.transitions()
            .enumerate()
            .flat_map(|(i, (d_input, d_output))| {
                let activation = if i == last {
                    Activation::Softmax
                } else {
                    Activation::Sigmoid
                };
                [
                    LayerKind::Linear { d_input, d_output },
                    LayerKind::Activation(activation),
                ]
            })
            .collect()
    }
}

impl Default for NetworkShape {
    fn default() -> Self {
        Self { widths: vec![784, 30, 10] }
    }
}

impl TryFrom<Vec<usize>> for NetworkShape {
    type Error = anyhow::Error;

    fn try_from(widths: Vec<usize>) -> Result<Self> {
        Self::new(widths)
    }
}

impl From<NetworkShape> for Vec<usize> {
    fn from(shape: NetworkShape) -> Self {
        shape.widths
    }
}

/// Parses "784,30,10" (spaces around commas are ignored)
impl FromStr for NetworkShape {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let widths = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<usize>()
                    .map_err(|e| anyhow::anyhow!("invalid layer width '{part}': {e}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(widths)
    }
}

impl fmt::Display for NetworkShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.widths.iter().map(|w| w.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}
