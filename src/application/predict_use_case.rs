// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Loads everything a reply needs once, then answers queries:
//
//   train_config.json → model shape, max length, morph flag
//   vocabulary file   → index mapping used during training
//   latest checkpoint → weights
//
// Command-line words are joined with single spaces into one
// query; a blank query is rejected before touching the model.

use anyhow::Result;

use crate::domain::{error::ChatbotError, traits::Responder};
use crate::infra::{checkpoint::CheckpointManager, vocabulary_store::VocabularyStore};
use crate::ml::inferencer::{InferBackend, Predictor};

pub struct PredictUseCase {
    predictor: Predictor<InferBackend>,
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: &str) -> Result<Self> {
        let ckpt       = CheckpointManager::new(checkpoint_dir)?;
        let cfg        = ckpt.load_config()?;
        let vocabulary = VocabularyStore::new(&cfg.vocabulary_path).load()?;
        let predictor  = Predictor::from_checkpoint(&ckpt, vocabulary)?;
        Ok(Self { predictor })
    }

    /// Join `words` into one query and reply to it.
    pub fn answer(&self, words: &[String]) -> Result<String> {
        self.reply(&join_query(words))
    }
}

impl Responder for PredictUseCase {
    fn reply(&self, utterance: &str) -> Result<String> {
        validate_query(utterance)?;
        Ok(self.predictor.predict(utterance)?)
    }
}

pub fn join_query(words: &[String]) -> String {
    words.join(" ")
}

fn validate_query(query: &str) -> Result<(), ChatbotError> {
    if query.trim().is_empty() {
        return Err(ChatbotError::EmptyQuery);
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_join_with_single_spaces() {
        let words = vec!["how".to_string(), "are".to_string(), "you".to_string()];
        assert_eq!(join_query(&words), "how are you");
    }

    #[test]
    fn test_blank_query_is_a_usage_error() {
        assert!(matches!(validate_query(""), Err(ChatbotError::EmptyQuery)));
        assert!(matches!(validate_query("   "), Err(ChatbotError::EmptyQuery)));
        assert!(validate_query("hi").is_ok());
    }

    #[test]
    fn test_empty_query_message_mentions_usage() {
        assert!(ChatbotError::EmptyQuery.to_string().starts_with("usage: predict"));
    }
}
