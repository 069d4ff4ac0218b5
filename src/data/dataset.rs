use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One tokenised, id-encoded example. Sequences are kept at
/// their true length here; padding happens in the batcher,
/// which also derives the length tensor from these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSample {
    pub token_ids: Vec<u32>,
    pub label: usize,
}

impl TextSample {
    /// Number of real (non-pad) tokens in this sample.
    pub fn len(&self) -> usize {
        self.token_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_ids.is_empty()
    }
}

pub struct TextDataset {
    samples: Vec<TextSample>,
}

impl TextDataset {
    pub fn new(samples: Vec<TextSample>) -> Self {
        Self { samples }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl Dataset<TextSample> for TextDataset {
    fn get(&self, index: usize) -> Option<TextSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
