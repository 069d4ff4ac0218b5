// ============================================================
// Layer 4 — Pretrained Vector Loader
// ============================================================
// Reads word vectors in the common text format:
//
//   token v1 v2 ... vN        (one line per token)
//
// with an optional "count dim" header line, and aligns them to
// the vocabulary's integer ids into one row-major matrix of
// shape [vocab_len, dim]. The matrix seeds the encoder's
// embedding table, which is then fine-tuned during training.
//
// Vocabulary words missing from the vector file keep a small
// seeded random init; a dimension mismatch with the configured
// embedding size is a configuration error raised before any
// computation starts.

use anyhow::{Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::data::vocab::Vocab;
use crate::domain::error::PipelineError;

/// A dense embedding matrix aligned to vocabulary ids.
/// Row `i` is the vector for the token with id `i`.
#[derive(Debug, Clone)]
pub struct EmbeddingMatrix {
    /// Row-major values, length = rows * dim
    pub data: Vec<f32>,
    pub rows: usize,
    pub dim: usize,
}

impl EmbeddingMatrix {
    /// Fully random matrix, used when no pretrained vectors are given.
    pub fn random(rows: usize, dim: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..rows * dim).map(|_| rng.gen_range(-0.1..0.1)).collect();
        Self { data, rows, dim }
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }
}

/// Load pretrained vectors from `path` aligned to `vocab`.
///
/// `emb_dim` is the embedding width the model was configured
/// with — a file whose vectors have a different width is a
/// fatal configuration error, not something to pad or truncate.
pub fn load_pretrained(
    path: impl AsRef<Path>,
    vocab: &Vocab,
    emb_dim: usize,
    seed: u64,
) -> Result<EmbeddingMatrix> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Cannot open vector file '{}'", path.display()))?;

    let mut matrix = EmbeddingMatrix::random(vocab.len(), emb_dim, seed);
    let mut covered = 0usize;

    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Read error at line {line_no}"))?;
        let mut fields = line.split_whitespace();

        let Some(token) = fields.next() else { continue };
        let values: Vec<f32> = fields.filter_map(|f| f.parse().ok()).collect();

        // "count dim" header line of word2vec-style files
        if line_no == 0 && values.len() == 1 && token.parse::<usize>().is_ok() {
            continue;
        }

        if values.len() != emb_dim {
            return Err(PipelineError::config(format!(
                "pretrained vectors in '{}' have dimension {} but the model \
                 is configured with embedding dimension {}",
                path.display(),
                values.len(),
                emb_dim,
            ))
            .into());
        }

        let id = vocab.lookup(token);
        // Only overwrite rows for tokens actually in the vocabulary;
        // everything else would land on <unk>.
        if id != crate::data::vocab::UNK_ID || token == crate::data::vocab::UNK_TOKEN {
            matrix.data[id * emb_dim..(id + 1) * emb_dim].copy_from_slice(&values);
            covered += 1;
        }
    }

    tracing::info!(
        "Pretrained vectors cover {}/{} vocabulary tokens",
        covered,
        vocab.len()
    );
    Ok(matrix)
}
