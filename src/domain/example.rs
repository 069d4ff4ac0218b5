use serde::{Deserialize, Serialize};

/// One labelled text record, exactly as it appears in the input
/// dataset: a free-text field and an integer class label.
/// Tokenisation and id-encoding happen later in the data layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledText {
    /// The raw text of the example
    pub text: String,

    /// Integer class label in `0..n_classes`
    pub label: usize,
}

impl LabeledText {
    pub fn new(text: impl Into<String>, label: usize) -> Self {
        Self { text: text.into(), label }
    }
}
