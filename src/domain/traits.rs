// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// implementations can be swapped without touching the code
// that uses them:
//   - CsvRecordSource implements RecordSource
//   - a future JsonlRecordSource could implement it too
//   - the application layer only ever sees RecordSource

use anyhow::Result;

use crate::domain::example::LabeledText;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can produce labelled text records.
///
/// Implementations:
///   - CsvRecordSource → reads `text,label` rows from a CSV file
pub trait RecordSource {
    /// Load all available records from this source.
    fn load_all(&self) -> Result<Vec<LabeledText>>;
}
