// ============================================================
// Layer 4 — CSV Record Loader
// ============================================================
// Loads labelled text from a headerless CSV file using the
// `csv` crate. Each row is:
//
//   column 0 — the text of the example
//   column 1 — the integer class label
//
// This is the same column order the original corpus used
// (text first, label second). Rows that cannot be parsed are
// logged and skipped rather than failing the whole load;
// an entirely empty dataset is rejected later, before training.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::example::LabeledText;
use crate::domain::traits::RecordSource;

/// Loads `text,label` rows from a single CSV file.
/// Implements the RecordSource trait from the domain layer.
pub struct CsvRecordSource {
    path: PathBuf,
}

impl CsvRecordSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl RecordSource for CsvRecordSource {
    fn load_all(&self) -> Result<Vec<LabeledText>> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Cannot open dataset '{}'", self.path.display()))?;

        let records = parse_records(file)
            .with_context(|| format!("Cannot parse dataset '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} records from '{}'",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// Parse `text,label` rows from any reader.
/// Split out from the file handling so it can be unit tested
/// against in-memory byte slices.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<LabeledText>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(reader);

    let mut records = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Malformed CSV at row {row}"))?;

        let text = record
            .get(0)
            .with_context(|| format!("Missing text column at row {row}"))?;

        let label_field = record
            .get(1)
            .with_context(|| format!("Missing label column at row {row}"))?;

        match label_field.trim().parse::<usize>() {
            Ok(label) => records.push(LabeledText::new(text, label)),
            Err(_) => {
                // Skip rows with non-integer labels rather than aborting
                tracing::warn!("Skipping row {}: label '{}' is not an integer", row, label_field);
            }
        }
    }

    Ok(records)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_text_and_label() {
        let csv = "the movie was great,1\nterrible acting,0\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "the movie was great");
        assert_eq!(records[0].label, 1);
        assert_eq!(records[1].label, 0);
    }

    #[test]
    fn test_quoted_text_with_commas() {
        let csv = "\"good, but slow\",1\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0].text, "good, but slow");
    }

    #[test]
    fn test_skips_non_integer_labels() {
        let csv = "fine,1\nbroken,positive\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_empty_input_gives_no_records() {
        let records = parse_records("".as_bytes()).unwrap();
        assert!(records.is_empty());
    }
}
