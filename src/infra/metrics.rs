// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one CSV row per epoch so learning curves can be
// plotted after the run:
//
//   epoch,train_loss,train_acc,eval_acc
//   1,0.693100,0.500000,0.500000
//   2,0.412800,0.812500,0.750000
//
// Output file: <checkpoint_dir>/metrics.csv

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

/// One row of metrics for a single training epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,

    /// Average NLL loss over the epoch's training batches
    pub train_loss: f64,

    /// Fraction of training examples predicted correctly
    pub train_acc: f64,

    /// Fraction of evaluation examples predicted correctly
    pub eval_acc: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, train_acc: f64, eval_acc: f64) -> Self {
        Self { epoch, train_loss, train_acc, eval_acc }
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a logger under `dir`, writing the CSV header only
    /// when the file is new so runs can append to one log.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,train_acc,eval_acc")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.train_acc, m.eval_acc,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_written_once_and_rows_append() {
        let dir = std::env::temp_dir().join("attn_classifier_metrics_test");
        let _ = fs::remove_dir_all(&dir);
        let dir_str = dir.to_string_lossy().to_string();

        let logger = MetricsLogger::new(dir_str.clone()).unwrap();
        logger.log(&EpochMetrics::new(1, 0.7, 0.5, 0.5)).unwrap();

        // A second logger over the same directory must not
        // rewrite the header
        let logger2 = MetricsLogger::new(dir_str).unwrap();
        logger2.log(&EpochMetrics::new(2, 0.4, 0.8, 0.7)).unwrap();

        let contents = fs::read_to_string(logger2.csv_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "epoch,train_loss,train_acc,eval_acc");
        assert!(lines[1].starts_with("1,"));
        assert!(lines[2].starts_with("2,"));
    }
}
