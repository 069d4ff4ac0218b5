// ============================================================
// Layer 5 — Attention Scorer
// ============================================================
// Scores every token's hidden vector with a small two-layer
// projection (h_dim → attn_dim → 1, ReLU between) and turns
// the raw energies into a probability distribution with a
// softmax computed per example over that example's own token
// dimension — never across the batch.
//
// Scoring and normalisation are deliberately separate steps:
// the "weights sum to 1" invariant holds by construction and
// is testable without the rest of the model.

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::{relu, softmax},
};

/// Energies at padded positions are pushed here before the
/// softmax: far enough down that they underflow to a weight of
/// exactly 0, without the NaN hazards of a literal -inf.
const MASKED_ENERGY: f64 = -1e9;

#[derive(Config, Debug)]
pub struct AttentionConfig {
    pub h_dim: usize,
    /// Width of the intermediate scoring layer
    #[config(default = 32)]
    pub attn_dim: usize,
}

impl AttentionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> AttentionScorer<B> {
        AttentionScorer {
            proj: LinearConfig::new(self.h_dim, self.attn_dim).init(device),
            score: LinearConfig::new(self.attn_dim, 1).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct AttentionScorer<B: Backend> {
    proj: Linear<B>,
    score: Linear<B>,
}

impl<B: Backend> AttentionScorer<B> {
    /// hidden [B, S, H] → attention weights [B, S, 1], each
    /// example's weights summing to 1 over its tokens. With a
    /// mask, padded positions receive zero weight.
    pub fn forward(&self, hidden: Tensor<B, 3>, mask: Option<&Tensor<B, 2>>) -> Tensor<B, 3> {
        let [batch, seq_len, _] = hidden.dims();

        // One scalar energy per token
        let energy = self.score.forward(relu(self.proj.forward(hidden)));
        let mut energy = energy.reshape([batch, seq_len]);

        if let Some(m) = mask {
            energy = energy.mask_fill(m.clone().equal_elem(0.0), MASKED_ENERGY);
        }

        softmax(energy, 1).reshape([batch, seq_len, 1])
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::encoder::length_mask;

    type B = burn::backend::NdArray;

    fn random_hidden(batch: usize, seq_len: usize, h_dim: usize) -> Tensor<B, 3> {
        Tensor::random(
            [batch, seq_len, h_dim],
            burn::tensor::Distribution::Uniform(-1.0, 1.0),
            &Default::default(),
        )
    }

    #[test]
    fn test_shape_two_by_five() {
        // Batch of 2 sequences of length 5, hidden dimension 4
        let scorer = AttentionConfig::new(4).init::<B>(&Default::default());
        let weights = scorer.forward(random_hidden(2, 5, 4), None);
        assert_eq!(weights.dims(), [2, 5, 1]);
    }

    #[test]
    fn test_each_example_sums_to_one() {
        let scorer = AttentionConfig::new(4).init::<B>(&Default::default());
        let weights = scorer.forward(random_hidden(2, 5, 4), None);

        let sums: Vec<f32> = weights.sum_dim(1).into_data().to_vec().unwrap();
        for s in sums {
            assert!((s - 1.0).abs() < 1e-5, "weights summed to {s}");
        }
    }

    #[test]
    fn test_weights_are_probabilities() {
        let scorer = AttentionConfig::new(8).init::<B>(&Default::default());
        let weights = scorer.forward(random_hidden(3, 7, 8), None);

        let values: Vec<f32> = weights.into_data().to_vec().unwrap();
        for w in values {
            assert!((0.0..=1.0).contains(&w));
        }
    }

    #[test]
    fn test_padded_positions_get_zero_weight() {
        let device = Default::default();
        let scorer = AttentionConfig::new(4).init::<B>(&device);

        let lengths = Tensor::<B, 1, Int>::from_ints([2].as_slice(), &device);
        let mask = length_mask(&lengths, 1, 5, &device);
        let weights = scorer.forward(random_hidden(1, 5, 4), Some(&mask));

        let values: Vec<f32> = weights.into_data().to_vec().unwrap();
        assert_eq!(values[2], 0.0);
        assert_eq!(values[3], 0.0);
        assert_eq!(values[4], 0.0);
        assert!((values[0] + values[1] - 1.0).abs() < 1e-5);
    }
}
