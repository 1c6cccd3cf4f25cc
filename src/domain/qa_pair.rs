// ============================================================
// Layer 3 — QaPair Domain Type
// ============================================================
// One conversational exchange from the corpus:
//   - question: what the user said
//   - answer:   the reply the model should learn to generate
//
// The corpus CSV names these columns `Q` and `A`; the serde
// renames let the loader deserialise rows straight into this
// struct and ignore any extra columns (e.g. `label`).
//
// Example:
//   Q: "12시 땡!"
//   A: "하루가 또 가네요."

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    #[serde(rename = "Q")]
    pub question: String,

    #[serde(rename = "A")]
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer:   answer.into(),
        }
    }
}

/// Split a slice of pairs into parallel (questions, answers) columns.
pub fn unzip_pairs(pairs: &[QaPair]) -> (Vec<String>, Vec<String>) {
    pairs
        .iter()
        .map(|p| (p.question.clone(), p.answer.clone()))
        .unzip()
}
