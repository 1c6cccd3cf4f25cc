// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Shuffles the corpus with a fixed seed and cuts it in two:
//   - training set:   drives the optimiser
//   - evaluation set: held out for loss / accuracy
//
// The seed makes the split reproducible, so `evaluate` run
// after `train` sees exactly the pairs training never saw.
//
// Default: 33% held out, seed 42.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, test).
///
/// `test_fraction` is clamped to [0, 1] and the test size is
/// rounded to the nearest whole item.
pub fn split_train_test<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total     = samples.len();
    let fraction  = test_fraction.clamp(0.0, 1.0);
    let test_size = ((total as f64) * fraction).round() as usize;
    let split_at  = total - test_size.min(total);

    // split_off(n) leaves [0..n) in `samples` and returns [n..total)
    let test = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} evaluation",
        samples.len(),
        test.len(),
    );

    (samples, test)
}
