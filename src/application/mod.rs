// ============================================================
// Layer 2 — Application Layer (Use Cases)
// ============================================================
// Orchestrates the data, ML and infra layers into the two
// things a user can actually do:
//
//   train_use_case  — the full pipeline: CSV → vocabulary →
//                     pretrained vectors → training →
//                     checkpoint → attention report
//
//   report_use_case — re-drives the evaluation set through a
//                     saved checkpoint and writes the report
//                     without retraining

pub mod report_use_case;
pub mod train_use_case;
