// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// Typed failures raised by the core pipeline. Higher layers
// wrap these in anyhow::Error with extra context.
//
// Recoverable data problems (unknown words, over-long
// sentences) are NOT errors — they are substituted or
// truncated by the encoder. Everything here is fatal.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::mode::{Mode, Scope};

#[derive(Error, Debug)]
pub enum ChatbotError {
    /// Neither a vocabulary file nor a corpus to build one from exists
    #[error(
        "missing vocabulary source: neither '{}' nor corpus '{}' exists",
        vocabulary.display(),
        corpus.display()
    )]
    MissingVocabularySource { vocabulary: PathBuf, corpus: PathBuf },

    #[error("max sequence length must be positive, got {0}")]
    InvalidSequenceLength(usize),

    #[error("batch size must be positive, got {0}")]
    InvalidBatchSize(usize),

    #[error("dropout must be within [0, 1], got {0}")]
    InvalidDropout(f64),

    #[error("corrupt vocabulary: {0}")]
    CorruptVocabulary(String),

    #[error("{scope:?} has {layers} recurrent layers, layer {layer} does not exist")]
    LayerOutOfRange { scope: Scope, layer: usize, layers: usize },

    /// Training logic was reached outside of TRAIN mode
    #[error("mode invariant violated: expected {expected:?}, got {actual:?}")]
    ModeViolation { expected: Mode, actual: Mode },

    #[error("usage: predict <word> [<word> ...]  (query is empty)")]
    EmptyQuery,

    #[error("segmentation failed: {0}")]
    Segmentation(String),
}
