// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports tensor types except through the
// batcher's output structs.
//
// What's in this layer:
//
//   encoder.rs    — embedding lookup + bidirectional LSTM with
//                   length-aware masking; forward and backward
//                   outputs folded by element-wise addition
//
//   attention.rs  — two-layer scorer (h_dim → attn_dim → 1)
//                   with a per-example softmax over tokens
//
//   classifier.rs — attention-weighted context vector and
//                   log-softmax class scores
//
//   model.rs      — composition root: the three components
//                   above wired by explicit forward calls,
//                   plus the NLL loss
//
//   device.rs     — Host / Accelerator placement and the
//                   backend type aliases
//
//   trainer.rs    — the epoch loop: forward, loss, backward,
//                   Adam step, progress logging, evaluation,
//                   metrics and the final checkpoint

/// Bidirectional recurrent encoder over embedded token ids
pub mod encoder;

/// Per-token attention scorer
pub mod attention;

/// Context-vector classifier head
pub mod classifier;

/// Composition of encoder + attention + classifier
pub mod model;

/// Device placement and backend selection
pub mod device;

/// Training and evaluation loops
pub mod trainer;

/// Whether a forward pass runs with training-time behaviour
/// (stochastic regularisation active) or evaluation behaviour.
/// An explicit argument rather than component state, so a call
/// site cannot forget to toggle a mode flag before a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Train,
    Eval,
}
