// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every fatal condition the pipeline can hit, grouped the way
// callers need to diagnose them:
//
//   Config       — wrong before any computation starts
//                  (accelerator unavailable, dimension mismatch,
//                  empty dataset)
//   Shape        — first offending batch during training
//   NonFiniteLoss — the loss left the reals; continuing would
//                  train on a corrupted gradient
//
// None of these are retried. Per-batch errors interrupt the run
// immediately instead of skipping the batch, since skipping
// would silently change dataset coverage.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid configuration, detected before the training loop
    #[error("configuration error: {0}")]
    Config(String),

    /// A batch whose tensors disagree with each other
    #[error("shape error at epoch {epoch}, batch {batch}: {message}")]
    Shape {
        epoch: usize,
        batch: usize,
        message: String,
    },

    /// Loss became NaN or infinite during training
    #[error("non-finite loss ({value}) at epoch {epoch}, batch {batch}")]
    NonFiniteLoss {
        epoch: usize,
        batch: usize,
        value: f64,
    },
}

impl PipelineError {
    /// Shorthand for a configuration error with a formatted message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
