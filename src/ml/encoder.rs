// ============================================================
// Layer 5 — Sequence Encoder
// ============================================================
// Embedding lookup followed by a bidirectional LSTM pass. The
// LSTM is written as explicit gate projections and a timestep
// loop rather than a framework RNN so that padding can be
// masked correctly: at a padded position the state update is
// gated out and the previous (h, c) carry through unchanged.
// For the backward direction this matters most — it starts on
// the padding, and without the gate the pad states would leak
// into every real token's hidden vector.
//
// The two directional output sequences are folded by
// element-wise addition (not concatenation), so the output
// width stays h_dim:
//
//   tokens [B, S] ──embed──▶ [B, S, E] ──bilstm──▶ [B, S, H]

use burn::{
    module::Param,
    nn::{Dropout, DropoutConfig, Embedding, EmbeddingConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::{sigmoid, tanh},
};

use crate::data::vectors::EmbeddingMatrix;
use crate::ml::Phase;

#[derive(Config, Debug)]
pub struct EncoderConfig {
    pub vocab_size: usize,
    pub emb_dim: usize,
    pub h_dim: usize,
    /// Dropout on the embedded input, active only in Phase::Train.
    /// The reference architecture uses none, hence the 0 default.
    #[config(default = 0.0)]
    pub dropout: f64,
}

impl EncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> RecurrentEncoder<B> {
        RecurrentEncoder {
            embedding: EmbeddingConfig::new(self.vocab_size, self.emb_dim).init(device),
            forward_cell: LstmCell::new(self.emb_dim, self.h_dim, device),
            backward_cell: LstmCell::new(self.emb_dim, self.h_dim, device),
            dropout: DropoutConfig::new(self.dropout).init(),
            emb_dim: self.emb_dim,
            h_dim: self.h_dim,
        }
    }
}

/// One direction's LSTM parameters: the input projection
/// carries the bias, the recurrent projection does not
/// (one bias per gate is enough).
#[derive(Module, Debug)]
pub struct LstmCell<B: Backend> {
    input: Linear<B>,
    hidden: Linear<B>,
    h_dim: usize,
}

impl<B: Backend> LstmCell<B> {
    fn new(emb_dim: usize, h_dim: usize, device: &B::Device) -> Self {
        Self {
            input: LinearConfig::new(emb_dim, 4 * h_dim).init(device),
            hidden: LinearConfig::new(h_dim, 4 * h_dim).with_bias(false).init(device),
            h_dim,
        }
    }

    /// One timestep: gates from x_t and h_{t-1}, then the
    /// standard LSTM state update. Gate layout in the 4H
    /// projection: input, forget, cell, output.
    fn step(
        &self,
        x_t: Tensor<B, 2>,
        h: Tensor<B, 2>,
        c: Tensor<B, 2>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let gates = self.input.forward(x_t) + self.hidden.forward(h);
        let [batch, _] = gates.dims();
        let hd = self.h_dim;

        let i = sigmoid(gates.clone().slice([0..batch, 0..hd]));
        let f = sigmoid(gates.clone().slice([0..batch, hd..2 * hd]));
        let g = tanh(gates.clone().slice([0..batch, 2 * hd..3 * hd]));
        let o = sigmoid(gates.slice([0..batch, 3 * hd..4 * hd]));

        let c_next = f * c + i * g;
        let h_next = o * tanh(c_next.clone());
        (h_next, c_next)
    }
}

#[derive(Module, Debug)]
pub struct RecurrentEncoder<B: Backend> {
    embedding: Embedding<B>,
    forward_cell: LstmCell<B>,
    backward_cell: LstmCell<B>,
    dropout: Dropout,
    emb_dim: usize,
    h_dim: usize,
}

impl<B: Backend> RecurrentEncoder<B> {
    /// Replace the embedding table with pretrained vectors.
    /// The matrix stays trainable — it is fine-tuned with the
    /// rest of the parameters.
    pub fn with_pretrained(mut self, matrix: &EmbeddingMatrix, device: &B::Device) -> Self {
        let weight = Tensor::<B, 1>::from_floats(matrix.data.as_slice(), device)
            .reshape([matrix.rows, matrix.dim]);
        self.embedding.weight = Param::from_tensor(weight);
        self
    }

    pub fn h_dim(&self) -> usize {
        self.h_dim
    }

    /// Encode a batch of token-id sequences into per-token
    /// hidden vectors of width h_dim.
    ///
    /// `mask` is 1.0 at real positions and 0.0 at padding (see
    /// [`length_mask`]); without it, every position is treated
    /// as real.
    pub fn forward(
        &self,
        tokens: Tensor<B, 2, Int>,
        mask: Option<&Tensor<B, 2>>,
        phase: Phase,
    ) -> Tensor<B, 3> {
        let emb = self.embedding.forward(tokens);
        let emb = match phase {
            Phase::Train => self.dropout.forward(emb),
            Phase::Eval => emb,
        };

        let fwd = self.run_direction(&self.forward_cell, &emb, mask, false);
        let bwd = self.run_direction(&self.backward_cell, &emb, mask, true);
        fwd + bwd
    }

    fn run_direction(
        &self,
        cell: &LstmCell<B>,
        emb: &Tensor<B, 3>,
        mask: Option<&Tensor<B, 2>>,
        reverse: bool,
    ) -> Tensor<B, 3> {
        let [batch, seq_len, _] = emb.dims();
        let device = emb.device();

        let mut h = Tensor::<B, 2>::zeros([batch, self.h_dim], &device);
        let mut c = h.clone();
        let mut outputs =
            vec![Tensor::<B, 3>::zeros([batch, 1, self.h_dim], &device); seq_len];

        let steps: Vec<usize> = if reverse {
            (0..seq_len).rev().collect()
        } else {
            (0..seq_len).collect()
        };

        for t in steps {
            let x_t = emb
                .clone()
                .slice([0..batch, t..t + 1, 0..self.emb_dim])
                .reshape([batch, self.emb_dim]);
            let (h_next, c_next) = cell.step(x_t, h.clone(), c.clone());

            match mask {
                Some(m) => {
                    // keep = 1 at real positions, 0 at padding;
                    // padded positions carry the old state through
                    let keep = m
                        .clone()
                        .slice([0..batch, t..t + 1])
                        .expand([batch, self.h_dim]);
                    let hold = keep.ones_like() - keep.clone();
                    h = keep.clone() * h_next + hold.clone() * h;
                    c = keep * c_next + hold * c;
                }
                None => {
                    h = h_next;
                    c = c_next;
                }
            }

            outputs[t] = h.clone().reshape([batch, 1, self.h_dim]);
        }

        Tensor::cat(outputs, 1)
    }
}

/// Float mask from true lengths: 1.0 where position < length,
/// 0.0 at padding. Shape [batch, seq_len].
pub fn length_mask<B: Backend>(
    lengths: &Tensor<B, 1, Int>,
    batch: usize,
    seq_len: usize,
    device: &B::Device,
) -> Tensor<B, 2> {
    let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, device)
        .unsqueeze::<2>()
        .expand([batch, seq_len]);
    let limits = lengths.clone().unsqueeze_dim::<2>(1).expand([batch, seq_len]);
    positions.lower(limits).float()
}
