// ============================================================
// Layer 4 — Train/Evaluation Splitter
// ============================================================
// Shuffles samples and splits them into a training set and a
// held-out evaluation set. Used only when the caller does not
// supply a separate evaluation CSV.
//
// The shuffle is seeded (Fisher-Yates via rand's SliceRandom)
// so that a fixed seed reproduces the exact same split — the
// whole run is required to be deterministic under a fixed seed.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, eval).
///
/// `train_fraction` is the proportion kept for training,
/// e.g. 0.8 keeps 80% for training and holds out 20%.
pub fn split_train_eval<T>(
    mut samples: Vec<T>,
    train_fraction: f64,
    seed: u64,
) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;
    let split_at = split_at.min(total);

    // split_off(n) removes [n..] and returns it
    let eval = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} evaluation",
        samples.len(),
        eval.len(),
    );

    (samples, eval)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, eval) = split_train_eval(items, 0.8, 0);
        assert_eq!(train.len(), 80);
        assert_eq!(eval.len(), 20);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..50).collect();
        let (train, eval) = split_train_eval(items, 0.7, 0);
        assert_eq!(train.len() + eval.len(), 50);
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = split_train_eval((0..40).collect::<Vec<_>>(), 0.5, 9);
        let b = split_train_eval((0..40).collect::<Vec<_>>(), 0.5, 9);
        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, eval) = split_train_eval(items, 0.8, 0);
        assert!(train.is_empty());
        assert!(eval.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        let items: Vec<usize> = (0..10).collect();
        let (train, eval) = split_train_eval(items, 1.0, 0);
        assert_eq!(train.len(), 10);
        assert!(eval.is_empty());
    }
}
