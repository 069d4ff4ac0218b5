// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw CSV rows to backend-ready tensor batches.
//
// The pipeline flows in this order:
//
//   train.csv / test.csv
//       │
//       ▼
//   CsvRecordSource   → reads rows, yields LabeledText records
//       │
//       ▼
//   Preprocessor      → lowercases and normalises whitespace
//       │
//       ▼
//   Vocab             → assigns integer ids to tokens
//       │
//       ▼
//   PretrainedVectors → aligns an embedding matrix to the vocab
//       │
//       ▼
//   TextDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   TextBatcher       → pads and stacks samples into tensors
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step, so each step
// is independently testable and replaceable.

/// Reads `text,label` rows from CSV files
pub mod loader;

/// Lowercases and normalises raw text before tokenisation
pub mod preprocessor;

/// Token → integer id mapping with reserved <pad>/<unk> ids
pub mod vocab;

/// Loads pretrained word vectors aligned to the vocabulary
pub mod vectors;

/// Implements Burn's Dataset trait for encoded samples
pub mod dataset;

/// Implements Burn's Batcher trait to create padded tensor batches
pub mod batcher;

/// Shuffles and splits data into train/evaluation sets
pub mod splitter;
