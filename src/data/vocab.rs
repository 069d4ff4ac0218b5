// ============================================================
// Layer 4 — Vocabulary
// ============================================================
// Word-level vocabulary: whitespace tokens mapped to dense
// integer ids. Two ids are reserved:
//
//   0 — <pad>  fills sequences up to the batch width
//   1 — <unk>  any token not seen while building
//
// Ids are assigned by descending corpus frequency (ties broken
// alphabetically so builds are deterministic). The reverse
// mapping (`token(id)`) exists for the attention report, which
// needs printable tokens back from id sequences.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const PAD_TOKEN: &str = "<pad>";
pub const UNK_TOKEN: &str = "<unk>";

pub const PAD_ID: usize = 0;
pub const UNK_ID: usize = 1;

/// Split preprocessed text into word tokens.
/// The preprocessor has already lowercased and normalised
/// whitespace, so a plain whitespace split is enough here.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocab {
    itos: Vec<String>,
    #[serde(skip)]
    stoi: HashMap<String, usize>,
}

impl Vocab {
    /// Build a vocabulary from already-tokenised texts.
    pub fn build<'a>(token_streams: impl IntoIterator<Item = &'a [String]>) -> Self {
        let mut freq: HashMap<&str, usize> = HashMap::new();
        for tokens in token_streams {
            for token in tokens {
                *freq.entry(token.as_str()).or_insert(0) += 1;
            }
        }

        // Frequency-descending, then alphabetical, so the id
        // assignment does not depend on hash iteration order.
        let mut words: Vec<(&str, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        let mut itos = vec![PAD_TOKEN.to_string(), UNK_TOKEN.to_string()];
        itos.extend(words.into_iter().map(|(w, _)| w.to_string()));

        Self::from_itos(itos)
    }

    /// Rebuild a vocabulary from its id → token list
    /// (used when reloading a persisted vocabulary).
    pub fn from_itos(itos: Vec<String>) -> Self {
        let stoi = itos
            .iter()
            .enumerate()
            .map(|(id, token)| (token.clone(), id))
            .collect();
        Self { itos, stoi }
    }

    /// Token → id; unknown tokens map to <unk>.
    pub fn lookup(&self, token: &str) -> usize {
        self.stoi.get(token).copied().unwrap_or(UNK_ID)
    }

    /// Id → token; out-of-range ids map to <unk>.
    pub fn token(&self, id: usize) -> &str {
        self.itos.get(id).map(String::as_str).unwrap_or(UNK_TOKEN)
    }

    /// Encode a token stream into an id sequence.
    pub fn encode(&self, tokens: &[String]) -> Vec<u32> {
        tokens.iter().map(|t| self.lookup(t) as u32).collect()
    }

    pub fn len(&self) -> usize {
        self.itos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itos.is_empty()
    }

    pub fn itos(&self) -> &[String] {
        &self.itos
    }
}
