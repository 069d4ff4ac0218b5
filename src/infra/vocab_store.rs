// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Persists the vocabulary next to the checkpoints so the
// report command can decode token ids back into printable
// tokens without re-reading the training corpus. The stoi map
// is not stored — it is rebuilt from the id-ordered token list
// on load.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::vocab::Vocab;

pub struct VocabStore {
    dir: PathBuf,
}

impl VocabStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    pub fn save(&self, vocab: &Vocab) -> Result<()> {
        std::fs::create_dir_all(&self.dir).ok();
        let path = self.dir.join("vocab.json");

        let json = serde_json::to_string(vocab.itos())?;
        std::fs::write(&path, json)
            .with_context(|| format!("Cannot write vocabulary to '{}'", path.display()))?;

        tracing::debug!("Saved vocabulary ({} tokens) to '{}'", vocab.len(), path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<Vocab> {
        let path = self.dir.join("vocab.json");
        let json = std::fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read vocabulary from '{}'. Have you run 'train' first?",
                path.display()
            )
        })?;

        let itos: Vec<String> = serde_json::from_str(&json)?;
        Ok(Vocab::from_itos(itos))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vocab::tokenize;

    #[test]
    fn test_round_trip() {
        let dir = std::env::temp_dir().join("attn_classifier_vocab_store_test");
        let _ = std::fs::remove_dir_all(&dir);
        let store = VocabStore::new(dir.to_string_lossy().to_string());

        let tokens = tokenize("good bad good ugly");
        let vocab = Vocab::build([tokens.as_slice()]);
        store.save(&vocab).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.len(), vocab.len());
        assert_eq!(reloaded.lookup("good"), vocab.lookup("good"));
        assert_eq!(reloaded.token(2), vocab.token(2));
    }
}
