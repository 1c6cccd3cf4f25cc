// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Turns one raw sentence into the word list that both the
// vocabulary builder and the sequence encoder consume.
//
// Steps (applied in order):
//   1. Optional morpheme-style segmentation
//   2. Strip the punctuation class  ~ . , ! ? " ' : ; ) (
//   3. Split on whitespace
//
// Segmentation is powered by the `tokenizers` pre-tokenizers:
// first at Unicode-script boundaries (Hangul | Latin | Han ...),
// then at word / punctuation boundaries. The pieces are joined
// back with single spaces so step 3 sees them as words.
//
// This is NOT a morphological analyser. It never splits inside
// a run of one script (Korean particles stay attached to their
// stem) and it keeps the existing spaces instead of re-deriving
// word boundaries. It only adds boundaries where the script or
// the character class changes.
//
// The same Preprocessor value MUST be used for building the
// vocabulary and for encoding, otherwise the word lists drift.

use std::sync::LazyLock;

use regex::Regex;
use tokenizers::pre_tokenizers::{unicode_scripts::UnicodeScripts, whitespace::Whitespace};
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use crate::domain::error::ChatbotError;

/// Characters removed before splitting
static FILTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[~.,!?"':;)(]"#).expect("static punctuation pattern"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preprocessor {
    tokenize_as_morph: bool,
}

impl Preprocessor {
    pub fn new(tokenize_as_morph: bool) -> Self {
        Self { tokenize_as_morph }
    }

    /// Full pipeline: segment → strip punctuation → split.
    pub fn words(&self, text: &str) -> Result<Vec<String>, ChatbotError> {
        let segmented = if self.tokenize_as_morph {
            segment(text)?
        } else {
            text.to_string()
        };

        Ok(strip_punctuation(&segmented)
            .split_whitespace()
            .map(str::to_string)
            .collect())
    }

    /// Words of every sentence, flattened in order
    pub fn corpus_words(&self, sentences: &[String]) -> Result<Vec<String>, ChatbotError> {
        let mut out = Vec::new();
        for sentence in sentences {
            out.extend(self.words(sentence)?);
        }
        Ok(out)
    }
}

/// Remove every character of the punctuation class.
pub fn strip_punctuation(text: &str) -> String {
    FILTER.replace_all(text, "").into_owned()
}

/// Boundary-based approximation of morpheme segmentation: split at
/// script changes and word/punctuation edges, keep existing spaces,
/// join the pieces with single spaces. Same-script runs stay whole.
fn segment(text: &str) -> Result<String, ChatbotError> {
    let mut pretokenized = PreTokenizedString::from(text);

    UnicodeScripts::new()
        .pre_tokenize(&mut pretokenized)
        .map_err(|e| ChatbotError::Segmentation(e.to_string()))?;
    Whitespace::default()
        .pre_tokenize(&mut pretokenized)
        .map_err(|e| ChatbotError::Segmentation(e.to_string()))?;

    let pieces: Vec<&str> = pretokenized
        .get_splits(OffsetReferential::Original, OffsetType::Byte)
        .into_iter()
        .map(|(piece, _, _)| piece)
        .collect();

    Ok(pieces.join(" "))
}
