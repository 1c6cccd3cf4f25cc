// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the corpus file and tensor batches:
//
//   corpus.csv
//       │
//       ▼
//   CsvCorpusLoader   → (question, answer) pairs
//       │
//       ▼
//   split_train_test  → seeded train / evaluation split
//       │
//       ▼
//   Preprocessor      → segmentation, punctuation filter, words
//       │
//       ▼
//   SequenceEncoder   → fixed-length index sequences
//       │
//       ▼
//   Seq2SeqDataset    → implements Burn's Dataset trait
//       │
//       ▼
//   Seq2SeqBatcher    → stacks samples into [batch, len] tensors
//       │
//       ▼
//   RepeatingBatches / SinglePassBatches → feed train / eval
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the Q/A corpus CSV
pub mod loader;

/// Segmentation and punctuation filtering
pub mod preprocessor;

/// Text ↔ fixed-length index sequences
pub mod encoder;

/// Implements Burn's Dataset trait for encoded pairs
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Repeating (train) and single-pass (eval) batch streams
pub mod iterator;

/// Seeded train/test split
pub mod splitter;
