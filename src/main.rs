#![allow(dead_code)]

// ============================================================
// attn-classifier — attention-based text classification
// ============================================================
// Layered layout:
//   cli          → argument parsing, subcommand dispatch
//   application  → train / report use cases
//   domain       → core types, errors, source trait
//   data         → CSV loading, vocabulary, batching
//   ml           → encoder, attention, classifier, trainer
//   infra        → checkpoints, metrics, vocab store, report

mod application;
mod cli;
mod data;
mod domain;
mod infra;
mod ml;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("attn_classifier=info")),
        )
        .init();

    cli::Cli::parse().run()
}
