// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Normalises raw text before tokenisation:
//
//   1. Lowercase everything (so "Good" and "good" share an id)
//   2. Map tabs, non-breaking and zero-width spaces to plain space
//   3. Drop remaining control characters
//   4. Collapse runs of spaces into one
//   5. Trim leading/trailing whitespace
//
// Without this, casing variants and invisible characters waste
// vocabulary slots on duplicates the model cannot distinguish.

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Normalise a raw text string for downstream tokenisation.
    pub fn clean(&self, text: &str) -> String {
        let normalised: String = text
            .chars()
            .flat_map(|c| c.to_lowercase())
            .map(|c| match c {
                '\t' | '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            })
            .collect();

        // Collapse consecutive spaces into one
        let mut out = String::with_capacity(normalised.len());
        let mut last_space = false;
        for c in normalised.chars() {
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        out.trim().to_string()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("Good Movie"), "good movie");
    }

    #[test]
    fn test_collapses_multiple_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello   world"), "hello world");
    }

    #[test]
    fn test_trims_edges() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  hello world  "), "hello world");
    }

    #[test]
    fn test_removes_control_chars() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello\x01world"), "hello world");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
    }
}
