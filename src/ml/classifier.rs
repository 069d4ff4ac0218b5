// ============================================================
// Layer 5 — Classifier Head
// ============================================================
// Collapses the per-token hidden vectors into one context
// vector — the attention-weighted sum over the token dimension
// — and projects it to class log-probabilities. The attention
// weights pass through unmodified so the report renderer can
// display them; they play no role in the loss.

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::log_softmax,
};

#[derive(Config, Debug)]
pub struct ClassifierConfig {
    pub h_dim: usize,
    pub n_classes: usize,
}

impl ClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Classifier<B> {
        Classifier {
            output: LinearConfig::new(self.h_dim, self.n_classes).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct Classifier<B: Backend> {
    output: Linear<B>,
}

impl<B: Backend> Classifier<B> {
    /// hidden [B, S, H] + weights [B, S, 1] →
    /// (log-probabilities [B, C], the same weights).
    pub fn forward(
        &self,
        hidden: Tensor<B, 3>,
        attention: Tensor<B, 3>,
    ) -> (Tensor<B, 2>, Tensor<B, 3>) {
        let [batch, seq_len, h_dim] = hidden.dims();

        // Broadcast each token's weight across the hidden
        // dimension, then sum out the token dimension
        let context = (hidden * attention.clone().expand([batch, seq_len, h_dim]))
            .sum_dim(1)
            .reshape([batch, h_dim]);

        let logits = self.output.forward(context);
        (log_softmax(logits, 1), attention)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type B = burn::backend::NdArray;

    #[test]
    fn test_log_probs_exponentiate_to_one() {
        let device = Default::default();
        let head = ClassifierConfig::new(4, 3).init::<B>(&device);

        let hidden = Tensor::<B, 3>::random(
            [2, 5, 4],
            burn::tensor::Distribution::Uniform(-1.0, 1.0),
            &device,
        );
        // Uniform attention over 5 tokens
        let attention = Tensor::<B, 3>::full([2, 5, 1], 0.2, &device);

        let (log_probs, _) = head.forward(hidden, attention);
        assert_eq!(log_probs.dims(), [2, 3]);

        let sums: Vec<f32> = log_probs.exp().sum_dim(1).into_data().to_vec().unwrap();
        for s in sums {
            assert!((s - 1.0).abs() < 1e-5, "class probabilities summed to {s}");
        }
    }

    #[test]
    fn test_attention_passes_through_unchanged() {
        let device = Default::default();
        let head = ClassifierConfig::new(4, 2).init::<B>(&device);

        let hidden = Tensor::<B, 3>::ones([1, 3, 4], &device);
        let attention = Tensor::<B, 1>::from_floats([0.5, 0.25, 0.25].as_slice(), &device)
            .reshape([1, 3, 1]);

        let (_, returned) = head.forward(hidden, attention.clone());
        let a: Vec<f32> = attention.into_data().to_vec().unwrap();
        let b: Vec<f32> = returned.into_data().to_vec().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_context_is_weighted_sum() {
        // With one-hot attention, the context vector must equal
        // the selected token's hidden vector, so the logits for
        // two different one-hot selections of identical rows match.
        let device = Default::default();
        let head = ClassifierConfig::new(2, 2).init::<B>(&device);

        let hidden = Tensor::<B, 1>::from_floats(
            [1.0, 2.0, 9.0, 9.0, 1.0, 2.0].as_slice(),
            &device,
        )
        .reshape([1, 3, 2]);

        let first = Tensor::<B, 1>::from_floats([1.0, 0.0, 0.0].as_slice(), &device)
            .reshape([1, 3, 1]);
        let third = Tensor::<B, 1>::from_floats([0.0, 0.0, 1.0].as_slice(), &device)
            .reshape([1, 3, 1]);

        let (p_first, _) = head.forward(hidden.clone(), first);
        let (p_third, _) = head.forward(hidden, third);

        let a: Vec<f32> = p_first.into_data().to_vec().unwrap();
        let b: Vec<f32> = p_third.into_data().to_vec().unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
    }
}
