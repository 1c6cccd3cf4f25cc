// ============================================================
// Layer 4 — Batch Iterators
// ============================================================
// Two ways to walk a dataset in shuffled mini-batches, both
// yielding the same Seq2SeqBatch shape:
//
//   RepeatingBatches  — training. Reshuffles every time the
//                       dataset is exhausted and never ends.
//                       The training driver decides how many
//                       steps to take.
//
//   SinglePassBatches — evaluation. Shuffles once, visits every
//                       example exactly once, then stops.
//
// The final batch of a pass may be smaller than batch_size.
// Shuffling only permutes WHICH examples share a batch; the
// time-step order inside each sequence is untouched.

use burn::data::{dataloader::batcher::Batcher, dataset::Dataset};
use burn::prelude::*;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::data::batcher::{Seq2SeqBatch, Seq2SeqBatcher};
use crate::data::dataset::Seq2SeqSample;
use crate::domain::error::ChatbotError;

/// Common capability of both iterator variants.
pub trait BatchStream<B: Backend>: Iterator<Item = Seq2SeqBatch<B>> {
    /// True when the stream cycles forever
    fn is_repeating(&self) -> bool;

    /// Number of batches needed to cover the dataset once
    fn batches_per_pass(&self) -> usize;
}

// ─── Shared shuffled cursor ───────────────────────────────────────────────────
struct ShuffledCursor {
    order:      Vec<usize>,
    position:   usize,
    batch_size: usize,
    rng:        StdRng,
}

impl ShuffledCursor {
    fn new(len: usize, batch_size: usize, seed: u64) -> Result<Self, ChatbotError> {
        if batch_size == 0 {
            return Err(ChatbotError::InvalidBatchSize(batch_size));
        }
        let mut cursor = Self {
            order: (0..len).collect(),
            position: 0,
            batch_size,
            rng: StdRng::seed_from_u64(seed),
        };
        cursor.order.shuffle(&mut cursor.rng);
        Ok(cursor)
    }

    fn exhausted(&self) -> bool {
        self.position >= self.order.len()
    }

    fn restart(&mut self) {
        self.order.shuffle(&mut self.rng);
        self.position = 0;
    }

    /// Next slice of example indices, empty once exhausted
    fn advance(&mut self) -> &[usize] {
        let start = self.position;
        let end   = (start + self.batch_size).min(self.order.len());
        self.position = end;
        &self.order[start..end]
    }

    fn batches_per_pass(&self) -> usize {
        self.order.len().div_ceil(self.batch_size)
    }
}

fn collect_items<D: Dataset<Seq2SeqSample>>(dataset: &D, indices: &[usize]) -> Vec<Seq2SeqSample> {
    indices.iter().filter_map(|&i| dataset.get(i)).collect()
}

// ─── RepeatingBatches ─────────────────────────────────────────────────────────
pub struct RepeatingBatches<B: Backend, D> {
    dataset: D,
    batcher: Seq2SeqBatcher<B>,
    cursor:  ShuffledCursor,
    pass:    usize,
}

impl<B: Backend, D: Dataset<Seq2SeqSample>> RepeatingBatches<B, D> {
    pub fn new(
        dataset:    D,
        batcher:    Seq2SeqBatcher<B>,
        batch_size: usize,
        seed:       u64,
    ) -> Result<Self, ChatbotError> {
        let cursor = ShuffledCursor::new(dataset.len(), batch_size, seed)?;
        Ok(Self { dataset, batcher, cursor, pass: 0 })
    }

    /// Completed passes over the dataset so far
    pub fn pass(&self) -> usize {
        self.pass
    }
}

impl<B: Backend, D: Dataset<Seq2SeqSample>> Iterator for RepeatingBatches<B, D> {
    type Item = Seq2SeqBatch<B>;

    fn next(&mut self) -> Option<Self::Item> {
        // An empty dataset would otherwise spin forever
        if self.dataset.len() == 0 {
            return None;
        }
        if self.cursor.exhausted() {
            self.cursor.restart();
            self.pass += 1;
            tracing::debug!("Training data reshuffled (pass {})", self.pass);
        }
        let items = collect_items(&self.dataset, self.cursor.advance());
        Some(self.batcher.batch(items))
    }
}

impl<B: Backend, D: Dataset<Seq2SeqSample>> BatchStream<B> for RepeatingBatches<B, D> {
    fn is_repeating(&self) -> bool {
        true
    }

    fn batches_per_pass(&self) -> usize {
        self.cursor.batches_per_pass()
    }
}

// ─── SinglePassBatches ────────────────────────────────────────────────────────
pub struct SinglePassBatches<B: Backend, D> {
    dataset: D,
    batcher: Seq2SeqBatcher<B>,
    cursor:  ShuffledCursor,
}

impl<B: Backend, D: Dataset<Seq2SeqSample>> SinglePassBatches<B, D> {
    pub fn new(
        dataset:    D,
        batcher:    Seq2SeqBatcher<B>,
        batch_size: usize,
        seed:       u64,
    ) -> Result<Self, ChatbotError> {
        let cursor = ShuffledCursor::new(dataset.len(), batch_size, seed)?;
        Ok(Self { dataset, batcher, cursor })
    }
}

impl<B: Backend, D: Dataset<Seq2SeqSample>> Iterator for SinglePassBatches<B, D> {
    type Item = Seq2SeqBatch<B>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.exhausted() {
            return None;
        }
        let items = collect_items(&self.dataset, self.cursor.advance());
        Some(self.batcher.batch(items))
    }
}

impl<B: Backend, D: Dataset<Seq2SeqSample>> BatchStream<B> for SinglePassBatches<B, D> {
    fn is_repeating(&self) -> bool {
        false
    }

    fn batches_per_pass(&self) -> usize {
        self.cursor.batches_per_pass()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Seq2SeqDataset;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    /// Sample i carries the value i in every position
    fn dataset(n: usize) -> Seq2SeqDataset {
        Seq2SeqDataset::new(
            (0..n)
                .map(|i| Seq2SeqSample { input: vec![i, i], output: vec![i, i], target: vec![i, i] })
                .collect(),
        )
    }

    fn batcher() -> Seq2SeqBatcher<TestBackend> {
        Seq2SeqBatcher::new(Default::default())
    }

    /// First column of `input`, i.e. the example ids in the batch
    fn ids(batch: Seq2SeqBatch<TestBackend>) -> Vec<i64> {
        let rows = batch.batch_size();
        let flat: Vec<i64> = batch.input.into_data().convert::<i64>().to_vec().unwrap();
        (0..rows).map(|r| flat[r * 2]).collect()
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        assert!(matches!(
            SinglePassBatches::new(dataset(3), batcher(), 0, 1),
            Err(ChatbotError::InvalidBatchSize(0))
        ));
        assert!(RepeatingBatches::new(dataset(3), batcher(), 0, 1).is_err());
    }

    #[test]
    fn test_single_pass_visits_everything_once() {
        let stream = SinglePassBatches::new(dataset(10), batcher(), 4, 7).unwrap();
        assert!(!stream.is_repeating());
        assert_eq!(stream.batches_per_pass(), 3);

        let batches: Vec<_> = stream.collect();
        assert_eq!(batches.len(), 3);

        let mut seen: Vec<i64> = batches.into_iter().flat_map(ids).collect();
        seen.sort();
        assert_eq!(seen, (0..10).collect::<Vec<i64>>());
    }

    #[test]
    fn test_repeating_covers_each_pass_and_keeps_going() {
        let mut stream = RepeatingBatches::new(dataset(5), batcher(), 2, 3).unwrap();
        assert!(stream.is_repeating());
        let per_pass = stream.batches_per_pass();
        assert_eq!(per_pass, 3);

        for pass in 0..4 {
            let mut seen: Vec<i64> = (0..per_pass)
                .flat_map(|_| ids(stream.next().unwrap()))
                .collect();
            seen.sort();
            assert_eq!(seen, (0..5).collect::<Vec<i64>>(), "pass {pass}");
        }
        assert_eq!(stream.pass(), 3);
    }

    #[test]
    fn test_same_seed_same_order() {
        let a: Vec<i64> = SinglePassBatches::new(dataset(8), batcher(), 3, 42)
            .unwrap()
            .flat_map(ids)
            .collect();
        let b: Vec<i64> = SinglePassBatches::new(dataset(8), batcher(), 3, 42)
            .unwrap()
            .flat_map(ids)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset_yields_nothing() {
        let mut repeating = RepeatingBatches::new(dataset(0), batcher(), 2, 0).unwrap();
        assert!(repeating.next().is_none());
        let mut single = SinglePassBatches::new(dataset(0), batcher(), 2, 0).unwrap();
        assert!(single.next().is_none());
    }
}
