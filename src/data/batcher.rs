// ============================================================
// Layer 4 — Seq2Seq Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<Seq2SeqSample>
// into three integer tensors of shape [batch, max_len]:
//
//   input  — reversed encoder indices
//   output — teacher-forced decoder input
//   target — labels for the loss / accuracy
//
// Row order is the order of `items`, and column order is the
// time-step order of each sequence; neither is ever permuted
// here.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::Seq2SeqSample;

// ─── Seq2SeqBatch ─────────────────────────────────────────────────────────────
/// Named, self-describing batch consumed by every execution mode.
#[derive(Debug, Clone)]
pub struct Seq2SeqBatch<B: Backend> {
    /// Encoder input indices — shape: [batch_size, max_len]
    pub input: Tensor<B, 2, Int>,

    /// Decoder input indices — shape: [batch_size, max_len]
    pub output: Tensor<B, 2, Int>,

    /// Target indices — shape: [batch_size, max_len]
    pub target: Tensor<B, 2, Int>,
}

impl<B: Backend> Seq2SeqBatch<B> {
    pub fn batch_size(&self) -> usize {
        self.input.dims()[0]
    }
}

// ─── Seq2SeqBatcher ───────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct Seq2SeqBatcher<B: Backend> {
    /// The device to create tensors on
    pub device: B::Device,
}

impl<B: Backend> Seq2SeqBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Flatten one field of every sample and reshape to [batch, len]
    fn stack(&self, rows: Vec<&[usize]>) -> Tensor<B, 2, Int> {
        let batch_size = rows.len();
        let seq_len    = rows.first().map_or(0, |r| r.len());

        let flat: Vec<i32> = rows
            .iter()
            .flat_map(|r| r.iter().map(|&x| x as i32))
            .collect();

        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len])
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
impl<B: Backend> Batcher<Seq2SeqSample, Seq2SeqBatch<B>> for Seq2SeqBatcher<B> {
    fn batch(&self, items: Vec<Seq2SeqSample>) -> Seq2SeqBatch<B> {
        let input  = self.stack(items.iter().map(|s| s.input.as_slice()).collect());
        let output = self.stack(items.iter().map(|s| s.output.as_slice()).collect());
        let target = self.stack(items.iter().map(|s| s.target.as_slice()).collect());

        Seq2SeqBatch { input, output, target }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_batch_preserves_row_and_column_order() {
        let device  = Default::default();
        let batcher = Seq2SeqBatcher::<TestBackend>::new(device);
        let items = vec![
            Seq2SeqSample { input: vec![0, 5, 4], output: vec![1, 6, 0], target: vec![6, 2, 0] },
            Seq2SeqSample { input: vec![7, 8, 9], output: vec![1, 7, 8], target: vec![7, 8, 2] },
        ];

        let batch = batcher.batch(items);
        assert_eq!(batch.batch_size(), 2);
        assert_eq!(batch.input.dims(), [2, 3]);

        let input: Vec<i64> = batch.input.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(input, vec![0, 5, 4, 7, 8, 9]);

        let target: Vec<i64> = batch.target.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(target, vec![6, 2, 0, 7, 8, 2]);
    }
}
