// ============================================================
// Layer 1 — Command-Line Interface
// ============================================================

pub mod commands;

pub use commands::Cli;
