// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with clap.
// All work is delegated to Layer 2 (application); this layer
// picks the backend and prints the results.
//
// Two commands are supported:
//   1. `train`    — trains on MNIST and reports test accuracy
//   2. `evaluate` — reloads a checkpoint and reports test accuracy

pub mod commands;

use anyhow::Result;
use burn::backend::Autodiff;
use clap::Parser;
use commands::{BackendKind, Commands, EvaluateArgs, TrainArgs};

use crate::data::dataset::MnistSource;
use crate::domain::accuracy::AccuracyTally;
use crate::ml::{CpuBackend, CpuDevice, GpuBackend, GpuDevice};

#[derive(Parser, Debug)]
#[command(
    name = "mnist-mlp",
    version,
    about = "Train a feed-forward network on MNIST digits and report test accuracy."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    let use_case = TrainUseCase::new((&args).into(), MnistSource);
    tracing::info!(
        "Training widths {} on {:?} for {} epochs",
        use_case.config().shape,
        args.backend,
        use_case.config().epochs,
    );

    let report = match args.backend {
        BackendKind::Ndarray => {
            use_case.execute::<Autodiff<CpuBackend>>(CpuDevice::default())?
        }
        BackendKind::Wgpu => use_case.execute::<Autodiff<GpuBackend>>(GpuDevice::default())?,
    };

    if let Some(last) = report.epochs.last() {
        tracing::info!(
            "Final epoch {}: train_loss={:.6}, {} batches skipped",
            last.epoch,
            last.train_loss,
            last.skipped_batches,
        );
    }

    print_accuracy(&report.test);
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let use_case = EvaluateUseCase::new(args.checkpoint_dir, MnistSource);
    let tally = match args.backend {
        BackendKind::Ndarray => use_case.execute::<CpuBackend>(CpuDevice::default())?,
        BackendKind::Wgpu    => use_case.execute::<GpuBackend>(GpuDevice::default())?,
    };

    print_accuracy(&tally);
    Ok(())
}

fn print_accuracy(tally: &AccuracyTally) {
    println!("Number Of Images Tested = {}", tally.total);
    println!("\nModel Accuracy = {}", tally.accuracy());
}
