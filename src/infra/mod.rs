// ============================================================
// Layer 6 — Infrastructure
// ============================================================
// Everything that touches the filesystem:
//
//   checkpoint.rs  — model weights (CompactRecorder) and the
//                    run configuration, plus the latest-epoch
//                    pointer the report command follows
//
//   vocab_store.rs — the id ↔ token mapping (vocab.json), so
//                    the report command can decode token ids
//                    without re-reading the corpus
//
//   metrics.rs     — per-epoch CSV rows for learning curves
//
//   report.rs      — the attention report: weight → colour
//                    spans and the TSV record file

/// Saves and restores model checkpoints and the train config
pub mod checkpoint;

/// Per-epoch metrics CSV
pub mod metrics;

/// Persisted vocabulary
pub mod vocab_store;

/// Colour-annotated attention report
pub mod report;
