// ============================================================
// Layer 6 — Attention Report
// ============================================================
// Renders per-token attention weights as colour-coded HTML
// spans. A weight of 0 renders on a white background, a weight
// of 1 on fully saturated red, everything between on a single
// red hue whose saturation tracks the weight:
//
//   #FF{x}{x}  where  x = round(255 · (1 − weight))
//
// One record per evaluated example, written as a tab-separated
// line:  true-label <TAB> predicted-label <TAB> html
// in evaluation-set order.

use anyhow::{Context, Result};
use std::{fs, io::Write, path::Path};

/// Wrap one token in a span whose background colour encodes
/// its attention weight. Angle brackets are stripped from the
/// token text so special tokens such as `<unk>` cannot inject
/// stray tags into the HTML fragment.
pub fn highlight(token: &str, weight: f32) -> String {
    let fade = (255.0 * (1.0 - weight.clamp(0.0, 1.0))).round() as u8;
    let text: String = token.chars().filter(|&c| c != '<' && c != '>').collect();
    format!(
        "<span style=\"background-color: #{:02X}{:02X}{:02X}\">{}</span>",
        0xFFu8, fade, fade, text,
    )
}

/// Render a whole token sequence with its aligned weights.
/// Tokens keep their original order; weights beyond the token
/// count (or vice versa) are ignored by the zip.
pub fn render_tokens(tokens: &[String], weights: &[f32]) -> String {
    tokens
        .iter()
        .zip(weights.iter())
        .map(|(token, &w)| highlight(token, w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One annotated evaluation example.
#[derive(Debug, Clone)]
pub struct ReportRecord {
    pub label: usize,
    pub predicted: usize,
    pub html: String,
}

impl ReportRecord {
    pub fn new(label: usize, predicted: usize, tokens: &[String], weights: &[f32]) -> Self {
        Self {
            label,
            predicted,
            html: render_tokens(tokens, weights),
        }
    }

    pub fn to_tsv_line(&self) -> String {
        format!("{}\t{}\t{}", self.label, self.predicted, self.html)
    }
}

/// Write all records to `path`, one TSV line per example.
pub fn write_report(path: impl AsRef<Path>, records: &[ReportRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).ok();
        }
    }

    let mut f = fs::File::create(path)
        .with_context(|| format!("Cannot create report file '{}'", path.display()))?;
    for record in records {
        writeln!(f, "{}", record.to_tsv_line())?;
    }

    tracing::info!("Wrote {} report records to '{}'", records.len(), path.display());
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    // Pull the two faded colour channels back out of a span
    fn fade_of(span: &str) -> u8 {
        let hex = span.split('#').nth(1).unwrap();
        u8::from_str_radix(&hex[2..4], 16).unwrap()
    }

    #[test]
    fn test_zero_weight_is_white() {
        let span = highlight("pad", 0.0);
        assert!(span.contains("#FFFFFF"));
    }

    #[test]
    fn test_full_weight_is_saturated() {
        let span = highlight("hot", 1.0);
        assert!(span.contains("#FF0000"));
    }

    #[test]
    fn test_intensity_tracks_weights_monotonically() {
        // Weights 0.0, 1.0, 0.5 → white, most saturated, mid
        let tokens: Vec<String> =
            ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let html = render_tokens(&tokens, &[0.0, 1.0, 0.5]);

        let spans: Vec<&str> = html.split("</span> ").collect();
        assert_eq!(spans.len(), 3);

        let fades: Vec<u8> = spans.iter().map(|s| fade_of(s)).collect();
        assert_eq!(fades[0], 255); // white
        assert_eq!(fades[1], 0); // fully saturated
        assert!(fades[2] > fades[1] && fades[2] < fades[0]); // in between
    }

    #[test]
    fn test_special_tokens_lose_their_brackets() {
        let span = highlight("<unk>", 0.5);
        assert!(span.contains(">unk</span>"));
        assert!(!span.contains("<unk>"));
    }

    #[test]
    fn test_weights_are_clamped() {
        assert!(highlight("x", -0.5).contains("#FFFFFF"));
        assert!(highlight("x", 1.5).contains("#FF0000"));
    }

    #[test]
    fn test_tsv_line_layout() {
        let tokens: Vec<String> = ["good"].iter().map(|s| s.to_string()).collect();
        let record = ReportRecord::new(1, 0, &tokens, &[1.0]);
        let line = record.to_tsv_line();

        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields[0], "1");
        assert_eq!(fields[1], "0");
        assert!(fields[2].starts_with("<span"));
    }

    #[test]
    fn test_report_file_has_one_line_per_record() {
        let dir = std::env::temp_dir().join("attn_classifier_report_test");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("attn.tsv");

        let tokens: Vec<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        let records = vec![
            ReportRecord::new(0, 0, &tokens, &[0.6, 0.4]),
            ReportRecord::new(1, 0, &tokens, &[0.1, 0.9]),
        ];
        write_report(&path, &records).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
