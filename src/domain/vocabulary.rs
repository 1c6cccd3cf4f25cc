// ============================================================
// Layer 3 — Vocabulary Domain Type
// ============================================================
// Bijective token ↔ index mapping shared by every stage of
// the pipeline. Built once per process and then only read.
//
// Layout:
//   0  <PADDING>
//   1  <START>
//   2  <END>
//   3  <UNKNOWN>
//   4… corpus tokens
//
// Indices are always contiguous in [0, len).

use std::collections::HashMap;

use crate::domain::error::ChatbotError;

pub const PAD: &str = "<PADDING>";
pub const START: &str = "<START>";
pub const END: &str = "<END>";
pub const UNKNOWN: &str = "<UNKNOWN>";

pub const PAD_INDEX: usize = 0;
pub const START_INDEX: usize = 1;
pub const END_INDEX: usize = 2;
pub const UNKNOWN_INDEX: usize = 3;

/// Control tokens in index order
pub const MARKERS: [&str; 4] = [PAD, START, END, UNKNOWN];

/// Immutable token ↔ index mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    char2idx: HashMap<String, usize>,
    idx2char: Vec<String>,
}

impl Vocabulary {
    /// Build from an ordered token list where position = index.
    ///
    /// The list must start with the four control tokens and
    /// contain no duplicates, otherwise the mapping would not
    /// be a bijection.
    pub fn from_tokens(tokens: Vec<String>) -> Result<Self, ChatbotError> {
        if tokens.len() < MARKERS.len()
            || tokens.iter().zip(MARKERS).any(|(t, m)| t != m)
        {
            return Err(ChatbotError::CorruptVocabulary(format!(
                "first {} tokens must be {:?}",
                MARKERS.len(),
                MARKERS
            )));
        }

        let mut char2idx = HashMap::with_capacity(tokens.len());
        for (idx, token) in tokens.iter().enumerate() {
            if token.trim().is_empty() {
                return Err(ChatbotError::CorruptVocabulary(format!(
                    "blank token at line {}",
                    idx + 1
                )));
            }
            if char2idx.insert(token.clone(), idx).is_some() {
                return Err(ChatbotError::CorruptVocabulary(format!(
                    "duplicate token '{token}' at line {}",
                    idx + 1
                )));
            }
        }

        Ok(Self { char2idx, idx2char: tokens })
    }

    /// Build from deduplicated corpus words. Control tokens are
    /// prepended; words spelled like a control token are dropped.
    pub fn from_corpus_words<I>(words: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let unique: std::collections::BTreeSet<String> = words
            .into_iter()
            .filter(|w| !w.is_empty() && !MARKERS.contains(&w.as_str()))
            .collect();

        let tokens: Vec<String> = MARKERS
            .iter()
            .map(|m| m.to_string())
            .chain(unique)
            .collect();

        let char2idx = tokens
            .iter()
            .enumerate()
            .map(|(idx, t)| (t.clone(), idx))
            .collect();

        Self { char2idx, idx2char: tokens }
    }

    /// Index for a token, falling back to UNKNOWN. Never fails.
    pub fn index_of(&self, token: &str) -> usize {
        self.char2idx.get(token).copied().unwrap_or(UNKNOWN_INDEX)
    }

    /// Exact lookup without the UNKNOWN fallback
    pub fn get(&self, token: &str) -> Option<usize> {
        self.char2idx.get(token).copied()
    }

    pub fn token(&self, index: usize) -> Option<&str> {
        self.idx2char.get(index).map(String::as_str)
    }

    /// Tokens in index order
    pub fn tokens(&self) -> &[String] {
        &self.idx2char
    }

    pub fn len(&self) -> usize {
        self.idx2char.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idx2char.is_empty()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_markers_take_first_indices() {
        let vocab = Vocabulary::from_corpus_words(words(&["hello", "world"]));
        assert_eq!(vocab.index_of(PAD), PAD_INDEX);
        assert_eq!(vocab.index_of(START), START_INDEX);
        assert_eq!(vocab.index_of(END), END_INDEX);
        assert_eq!(vocab.index_of(UNKNOWN), UNKNOWN_INDEX);
        assert_eq!(vocab.len(), 6);
    }

    #[test]
    fn test_mapping_is_bijective_and_contiguous() {
        let vocab = Vocabulary::from_corpus_words(words(&["b", "a", "c", "a", "b"]));
        for (idx, token) in vocab.tokens().iter().enumerate() {
            assert_eq!(vocab.index_of(token), idx);
            assert_eq!(vocab.token(idx), Some(token.as_str()));
        }
        assert_eq!(vocab.len(), 4 + 3);
        assert_eq!(vocab.token(vocab.len()), None);
    }

    #[test]
    fn test_unknown_word_falls_back() {
        let vocab = Vocabulary::from_corpus_words(words(&["hi"]));
        assert_eq!(vocab.index_of("missing"), UNKNOWN_INDEX);
        assert_eq!(vocab.get("missing"), None);
    }

    #[test]
    fn test_marker_spellings_in_corpus_are_not_duplicated() {
        let vocab = Vocabulary::from_corpus_words(words(&[END, "hi", PAD]));
        assert_eq!(vocab.len(), 5);
        assert_eq!(vocab.index_of(END), END_INDEX);
    }

    #[test]
    fn test_order_is_stable_for_same_corpus() {
        let a = Vocabulary::from_corpus_words(words(&["x", "y", "z"]));
        let b = Vocabulary::from_corpus_words(words(&["z", "x", "y", "x"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_tokens_rejects_missing_markers() {
        let err = Vocabulary::from_tokens(words(&["hi", "there"])).unwrap_err();
        assert!(matches!(err, ChatbotError::CorruptVocabulary(_)));
    }

    #[test]
    fn test_from_tokens_rejects_duplicates() {
        let mut tokens = words(&MARKERS);
        tokens.extend(words(&["hi", "hi"]));
        assert!(Vocabulary::from_tokens(tokens).is_err());
    }

    #[test]
    fn test_from_tokens_rejects_blank_tokens() {
        let mut tokens = words(&MARKERS);
        tokens.extend(words(&["hi", "", "there"]));
        assert!(matches!(
            Vocabulary::from_tokens(tokens),
            Err(ChatbotError::CorruptVocabulary(msg)) if msg.contains("line 6")
        ));
    }

    #[test]
    fn test_from_tokens_keeps_line_order() {
        let mut tokens = words(&MARKERS);
        tokens.extend(words(&["zeta", "alpha"]));
        let vocab = Vocabulary::from_tokens(tokens).unwrap();
        assert_eq!(vocab.index_of("zeta"), 4);
        assert_eq!(vocab.index_of("alpha"), 5);
    }
}
