// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits, not
// against concrete loaders or model wrappers:
//   - CsvCorpusLoader implements CorpusSource
//   - PredictUseCase  implements Responder

use anyhow::Result;
use crate::domain::qa_pair::QaPair;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can supply (question, answer) pairs.
pub trait CorpusSource {
    /// Load every pair in source order.
    fn load_pairs(&self) -> Result<Vec<QaPair>>;
}

// ─── Responder ────────────────────────────────────────────────────────────────
/// Any component that maps an utterance to a generated reply.
pub trait Responder {
    fn reply(&self, utterance: &str) -> Result<String>;
}
