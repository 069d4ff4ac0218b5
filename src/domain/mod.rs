// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define the core
// concepts of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or tensor code
//   - Only plain Rust structs, enums, and traits
//
// Keeping this layer pure means it is testable without a
// backend and readable without framework noise.

// A labelled text record as ingested from the dataset
pub mod example;

// The pipeline error taxonomy (configuration / shape / numerical)
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
