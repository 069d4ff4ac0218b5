// ============================================================
// Layer 4 — Text Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<TextSample>
// into backend-ready tensors.
//
// Unlike pre-padded pipelines, samples arrive here at their
// true lengths. The batcher pads every sequence with <pad> (id
// 0) up to the longest sequence *in this batch* and records the
// true lengths, so the encoder can mask the padded positions.
//
//   Input:  Vec of N TextSamples with lengths l1..lN
//   Output: TextBatch with
//     tokens  [N, max(l)]  Int  — padded id sequences
//     lengths [N]          Int  — true lengths
//     labels  [N]          Int  — class labels

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::TextSample;
use crate::data::vocab::PAD_ID;
use crate::domain::error::PipelineError;

/// A batch of examples ready for the model forward pass.
/// All tensors have batch size as their first dimension.
#[derive(Debug, Clone)]
pub struct TextBatch<B: Backend> {
    /// Token id sequences, padded to the batch width — [batch, seq_len]
    pub tokens: Tensor<B, 2, Int>,

    /// True (non-pad) length of each sequence — [batch]
    pub lengths: Tensor<B, 1, Int>,

    /// Ground-truth class labels — [batch]
    pub labels: Tensor<B, 1, Int>,

    /// True lengths kept host-side as well — the validator and
    /// the attention report both need them without a readback
    pub raw_lengths: Vec<usize>,

    /// Number of examples in the batch
    pub batch_size: usize,

    /// Padded sequence width of this batch
    pub seq_len: usize,
}

impl<B: Backend> TextBatch<B> {
    /// Cheap structural checks, run once per batch before the
    /// forward pass. Catching these here gives the caller an
    /// epoch/batch-indexed error instead of a tensor panic.
    pub fn validate(&self, epoch: usize, batch: usize) -> Result<(), PipelineError> {
        if self.batch_size == 0 {
            return Err(PipelineError::Shape {
                epoch,
                batch,
                message: "empty batch".to_string(),
            });
        }
        if self.raw_lengths.len() != self.batch_size {
            return Err(PipelineError::Shape {
                epoch,
                batch,
                message: format!(
                    "{} lengths supplied for {} sequences",
                    self.raw_lengths.len(),
                    self.batch_size
                ),
            });
        }
        for (i, &len) in self.raw_lengths.iter().enumerate() {
            if len == 0 || len > self.seq_len {
                return Err(PipelineError::Shape {
                    epoch,
                    batch,
                    message: format!(
                        "sequence {i} has true length {len} but the batch width is {}",
                        self.seq_len
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Holds the target device so tensors are created in the right
/// place. Generic over the backend so the same batcher serves
/// both the autodiff training path and plain evaluation.
#[derive(Clone, Debug)]
pub struct TextBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TextBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<TextSample, TextBatch<B>> for TextBatcher<B> {
    fn batch(&self, items: Vec<TextSample>) -> TextBatch<B> {
        let batch_size = items.len();
        let seq_len = items.iter().map(TextSample::len).max().unwrap_or(0);

        // Flatten all sequences into one Vec, padding each row
        // out to the batch width with <pad>.
        let mut tokens_flat: Vec<i32> = Vec::with_capacity(batch_size * seq_len);
        let mut raw_lengths: Vec<usize> = Vec::with_capacity(batch_size);
        let mut labels: Vec<i32> = Vec::with_capacity(batch_size);

        for item in &items {
            tokens_flat.extend(item.token_ids.iter().map(|&id| id as i32));
            tokens_flat.extend(std::iter::repeat(PAD_ID as i32).take(seq_len - item.len()));
            raw_lengths.push(item.len());
            labels.push(item.label as i32);
        }

        let lengths_i32: Vec<i32> = raw_lengths.iter().map(|&l| l as i32).collect();

        let tokens = Tensor::<B, 1, Int>::from_ints(tokens_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);
        let lengths = Tensor::<B, 1, Int>::from_ints(lengths_i32.as_slice(), &self.device);
        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        TextBatch {
            tokens,
            lengths,
            labels,
            raw_lengths,
            batch_size,
            seq_len,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type B = burn::backend::NdArray;

    fn sample(ids: &[u32], label: usize) -> TextSample {
        TextSample { token_ids: ids.to_vec(), label }
    }

    #[test]
    fn test_pads_to_batch_max() {
        let batcher = TextBatcher::<B>::new(Default::default());
        let batch = batcher.batch(vec![sample(&[5, 6, 7], 1), sample(&[8], 0)]);

        assert_eq!(batch.tokens.dims(), [2, 3]);
        let flat: Vec<i64> = batch.tokens.into_data().convert::<i64>().to_vec().unwrap();
        // Second row padded with <pad> (id 0)
        assert_eq!(flat, vec![5, 6, 7, 8, 0, 0]);
    }

    #[test]
    fn test_records_true_lengths_and_labels() {
        let batcher = TextBatcher::<B>::new(Default::default());
        let batch = batcher.batch(vec![sample(&[5, 6, 7], 1), sample(&[8], 0)]);

        let lengths: Vec<i64> = batch.lengths.into_data().convert::<i64>().to_vec().unwrap();
        let labels: Vec<i64> = batch.labels.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(lengths, vec![3, 1]);
        assert_eq!(labels, vec![1, 0]);
    }

    #[test]
    fn test_validate_rejects_empty_batch() {
        let batcher = TextBatcher::<B>::new(Default::default());
        let batch = batcher.batch(Vec::new());
        assert!(batch.validate(1, 0).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_lengths() {
        let batcher = TextBatcher::<B>::new(Default::default());
        let mut batch = batcher.batch(vec![sample(&[5, 6], 1)]);
        assert!(batch.validate(1, 0).is_ok());
        // Claimed length exceeding the batch width must be caught
        batch.raw_lengths[0] = 3;
        assert!(batch.validate(1, 0).is_err());
    }
}
