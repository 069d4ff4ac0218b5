// ============================================================
// Layer 1 — CLI Commands
// ============================================================
// Two subcommands:
//
//   train   — run the full pipeline on a labelled CSV and write
//             checkpoint + metrics + attention report
//   report  — regenerate the attention report from the latest
//             checkpoint without retraining
//
// Every hyperparameter has the same default the config struct
// carries, so `train --train-csv data.csv` alone is a valid run.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::application::report_use_case::ReportUseCase;
use crate::application::train_use_case::{TrainConfig, TrainUseCase};
use crate::ml::device::DevicePlacement;

#[derive(Parser, Debug)]
#[command(
    name = "attn-classifier",
    about = "Train and inspect an attention-based text classifier",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train the classifier and write the attention report
    Train(TrainArgs),
    /// Regenerate the attention report from the latest checkpoint
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Training CSV, one `text,label` row per example, no header
    #[arg(long, default_value = "data/train.csv")]
    train_csv: String,

    /// Evaluation CSV; omit to hold out a fraction of the
    /// training data instead
    #[arg(long)]
    eval_csv: Option<String>,

    /// Pretrained word vectors in `token v1 .. vN` text format
    #[arg(long)]
    vectors: Option<String>,

    /// Directory for model weights, config, vocabulary, metrics
    #[arg(long, default_value = "checkpoints")]
    checkpoint_dir: String,

    /// Output path for the attention report
    #[arg(long, default_value = "results/attn.tsv")]
    report: String,

    /// Word embedding dimension
    #[arg(long, default_value_t = 300)]
    emb_dim: usize,

    /// Encoder hidden dimension (per direction)
    #[arg(long, default_value_t = 32)]
    h_dim: usize,

    /// Hidden width of the attention scorer
    #[arg(long, default_value_t = 32)]
    attn_dim: usize,

    /// Number of output classes
    #[arg(long, default_value_t = 2)]
    classes: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    lr: f64,

    #[arg(long, default_value_t = 3)]
    epochs: usize,

    #[arg(long, default_value_t = 2)]
    batch_size: usize,

    /// Emit a progress line every this many batches
    #[arg(long, default_value_t = 1)]
    log_interval: usize,

    /// Fraction kept for training when --eval-csv is omitted
    #[arg(long, default_value_t = 0.8)]
    train_fraction: f64,

    /// Seed for weight init, shuffling and the hold-out split
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Accelerator device index; omit to run on the host CPU
    #[arg(long)]
    accelerator: Option<usize>,
}

impl From<TrainArgs> for TrainConfig {
    fn from(args: TrainArgs) -> Self {
        Self {
            train_csv: args.train_csv,
            eval_csv: args.eval_csv,
            vectors_path: args.vectors,
            checkpoint_dir: args.checkpoint_dir,
            report_path: args.report,
            emb_dim: args.emb_dim,
            h_dim: args.h_dim,
            attn_dim: args.attn_dim,
            n_classes: args.classes,
            lr: args.lr,
            epochs: args.epochs,
            batch_size: args.batch_size,
            log_interval: args.log_interval,
            train_fraction: args.train_fraction,
            seed: args.seed,
            device: match args.accelerator {
                Some(id) => DevicePlacement::Accelerator(id),
                None => DevicePlacement::Host,
            },
        }
    }
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Directory holding the checkpoint to report from
    #[arg(long, default_value = "checkpoints")]
    checkpoint_dir: String,

    /// Evaluation CSV; defaults to the one recorded at train time
    #[arg(long)]
    eval_csv: Option<String>,

    /// Output path; defaults to the one recorded at train time
    #[arg(long)]
    report: Option<String>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Train(args) => TrainUseCase::new(args.into()).execute(),
            Command::Report(args) => {
                ReportUseCase::new(args.checkpoint_dir, args.eval_csv, args.report).execute()
            }
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_train_args_map_to_config() {
        let cli = Cli::try_parse_from([
            "attn-classifier",
            "train",
            "--train-csv",
            "reviews.csv",
            "--epochs",
            "5",
            "--accelerator",
            "1",
        ])
        .unwrap();

        let Command::Train(args) = cli.command else {
            panic!("expected the train subcommand");
        };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.train_csv, "reviews.csv");
        assert_eq!(cfg.epochs, 5);
        assert_eq!(cfg.device, DevicePlacement::Accelerator(1));
        // Untouched knobs keep their defaults
        assert_eq!(cfg.emb_dim, 300);
        assert_eq!(cfg.batch_size, 2);
    }

    #[test]
    fn test_report_defaults() {
        let cli = Cli::try_parse_from(["attn-classifier", "report"]).unwrap();
        let Command::Report(args) = cli.command else {
            panic!("expected the report subcommand");
        };
        assert_eq!(args.checkpoint_dir, "checkpoints");
        assert!(args.eval_csv.is_none());
        assert!(args.report.is_none());
    }
}
