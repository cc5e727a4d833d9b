// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `evaluate`
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::train_use_case::TrainConfig;
use crate::domain::network_shape::NetworkShape;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the network on MNIST, then report test accuracy
    Train(TrainArgs),

    /// Score the latest checkpoint on the MNIST test split
    Evaluate(EvaluateArgs),
}

/// Where the tensors live
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// CPU via ndarray
    #[default]
    Ndarray,
    /// GPU via wgpu
    Wgpu,
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory to save checkpoints, config and metrics.csv
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Layer widths: input, hidden..., output
    #[arg(long, default_value = "784,30,10")]
    pub layers: NetworkShape,

    /// Images per mini-batch
    #[arg(long, default_value_t = 10)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// SGD step size
    #[arg(long, default_value_t = 3.0)]
    pub lr: f64,

    /// Pixel mean subtracted after scaling to [0, 1]
    #[arg(long, default_value_t = 0.5)]
    pub norm_mean: f32,

    /// Pixel standard deviation divided out after scaling to [0, 1]
    #[arg(long, default_value_t = 0.5)]
    pub norm_std: f32,

    /// Fraction of the training split held out for per-epoch validation
    #[arg(long, default_value_t = 0.0)]
    pub valid_fraction: f64,

    /// Seed for weight init, shuffling and the validation split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, value_enum, default_value_t = BackendKind::Ndarray)]
    pub backend: BackendKind,
}

/// The application layer never sees clap types.
impl From<&TrainArgs> for TrainConfig {
    fn from(a: &TrainArgs) -> Self {
        TrainConfig {
            checkpoint_dir: a.checkpoint_dir.clone(),
            shape:          a.layers.clone(),
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            learning_rate:  a.lr,
            norm_mean:      a.norm_mean,
            norm_std:       a.norm_std,
            valid_fraction: a.valid_fraction,
            seed:           a.seed,
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[arg(long, value_enum, default_value_t = BackendKind::Ndarray)]
    pub backend: BackendKind,
}
