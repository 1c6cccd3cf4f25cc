// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load or build vocabulary   (Layer 6 - infra)
//   Step 2: Load Q/A pairs             (Layer 4 - data)
//   Step 3: Seeded train/test split    (Layer 4 - data)
//   Step 4: Encode both splits         (Layer 4 - data)
//   Step 5: Save config                (Layer 6 - infra)
//   Step 6: Run training loop          (Layer 5 - ml)
//
// Steps 1–4 are shared with EvaluateUseCase through
// `prepare_corpus`, so both see the same held-out pairs.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{
    dataset::{Seq2SeqDataset, Seq2SeqSample},
    encoder::SequenceEncoder,
    loader::CsvCorpusLoader,
    preprocessor::Preprocessor,
    splitter::split_train_test,
};
use crate::domain::{error::ChatbotError, traits::CorpusSource, vocabulary::Vocabulary};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    vocabulary_store::VocabularyStore,
};
use crate::ml::model::Seq2SeqConfig;
use crate::ml::trainer::{run_training, TrainingSummary};

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a run. Saved as train_config.json so evaluate
// and predict rebuild the exact same model and encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:           String,
    pub vocabulary_path:     String,
    pub checkpoint_dir:      String,
    pub max_sequence_length: usize,
    pub batch_size:          usize,
    pub train_steps:         usize,
    pub checkpoint_every:    usize,
    pub log_every:           usize,
    pub learning_rate:       f64,
    pub hidden_size:         usize,
    pub layer_size:          usize,
    pub embedding_size:      usize,
    pub embedding:           bool,
    pub multilayer:          bool,
    pub dropout:             f64,
    pub tokenize_as_morph:   bool,
    pub test_fraction:       f64,
    pub seed:                u64,
    /// Filled in once the vocabulary is known
    #[serde(default)]
    pub vocabulary_length:   usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:           "data/ChatbotData.csv".to_string(),
            vocabulary_path:     "data/vocabulary.txt".to_string(),
            checkpoint_dir:      "checkpoints".to_string(),
            max_sequence_length: 25,
            batch_size:          64,
            train_steps:         2000,
            checkpoint_every:    500,
            log_every:           100,
            learning_rate:       1e-3,
            hidden_size:         128,
            layer_size:          3,
            embedding_size:      128,
            embedding:           true,
            multilayer:          true,
            dropout:             0.2,
            tokenize_as_morph:   false,
            test_fraction:       0.33,
            seed:                42,
            vocabulary_length:   0,
        }
    }
}

impl TrainConfig {
    pub fn preprocessor(&self) -> Preprocessor {
        Preprocessor::new(self.tokenize_as_morph)
    }

    /// Model hyperparameters, validated before any layer is built.
    pub fn model_config(&self, vocabulary_length: usize) -> Result<Seq2SeqConfig, ChatbotError> {
        let config = Seq2SeqConfig::new(vocabulary_length, self.embedding_size, self.hidden_size)
            .with_layer_size(self.layer_size)
            .with_embedding(self.embedding)
            .with_multilayer(self.multilayer)
            .with_dropout(self.dropout);
        config.validate()?;
        Ok(config)
    }
}

// ─── Shared corpus preparation ───────────────────────────────────────────────
pub struct PreparedCorpus {
    pub vocabulary: Vocabulary,
    pub train:      Seq2SeqDataset,
    pub test:       Seq2SeqDataset,
}

/// Vocabulary, split and encoding for `cfg`; deterministic in
/// the corpus, the vocabulary file and `cfg.seed`.
pub fn prepare_corpus(cfg: &TrainConfig) -> Result<PreparedCorpus> {
    let preprocessor = cfg.preprocessor();

    // ── Vocabulary ───────────────────────────────────────────────────────────
    let store      = VocabularyStore::new(&cfg.vocabulary_path);
    let vocabulary = store.load_or_build(Path::new(&cfg.data_path), &preprocessor)?;

    // ── Corpus + split ───────────────────────────────────────────────────────
    let pairs = CsvCorpusLoader::new(&cfg.data_path).load_pairs()?;
    let (train_pairs, test_pairs) = split_train_test(pairs, cfg.test_fraction, cfg.seed);
    tracing::info!(
        "Split: {} train, {} evaluation",
        train_pairs.len(),
        test_pairs.len()
    );

    // ── Encoding ─────────────────────────────────────────────────────────────
    let encoder = SequenceEncoder::new(&vocabulary, preprocessor, cfg.max_sequence_length)?;
    let train   = Seq2SeqDataset::new(Seq2SeqSample::encode_pairs(&encoder, &train_pairs)?);
    let test    = Seq2SeqDataset::new(Seq2SeqSample::encode_pairs(&encoder, &test_pairs)?);

    Ok(PreparedCorpus { vocabulary, train, test })
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingSummary> {
        // fail on bad flags before reading the corpus
        self.config.model_config(0)?;

        let PreparedCorpus { vocabulary, train, test } = prepare_corpus(&self.config)?;

        let cfg = TrainConfig { vocabulary_length: vocabulary.len(), ..self.config.clone() };

        let ckpt    = CheckpointManager::new(&cfg.checkpoint_dir)?;
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;
        ckpt.save_config(&cfg)?;

        let model_config = cfg.model_config(vocabulary.len())?;
        run_training(&cfg, &model_config, train, test, &ckpt, &metrics)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::data::dataset::Dataset;
    use std::fs;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> TrainConfig {
        let corpus = dir.join("corpus.csv");
        let mut rows = String::from("Q,A,label\n");
        for i in 0..9 {
            rows.push_str(&format!("question {i},answer {i},0\n"));
        }
        fs::write(&corpus, rows).unwrap();

        TrainConfig {
            data_path:           corpus.display().to_string(),
            vocabulary_path:     dir.join("vocab.txt").display().to_string(),
            checkpoint_dir:      dir.join("ckpt").display().to_string(),
            max_sequence_length: 4,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_model_config_follows_flags() {
        let cfg = TrainConfig { multilayer: false, embedding: false, ..TrainConfig::default() };
        let model = cfg.model_config(50).unwrap();
        assert_eq!(model.vocabulary_length, 50);
        assert_eq!(model.layers(), 1);
        assert!(!model.embedding);
    }

    #[test]
    fn test_bad_dropout_fails_before_touching_the_corpus() {
        let cfg = TrainConfig {
            dropout:   1.5,
            data_path: "does/not/exist.csv".to_string(),
            ..TrainConfig::default()
        };
        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatbotError>(),
            Some(ChatbotError::InvalidDropout(_))
        ));
    }

    #[test]
    fn test_config_json_without_vocabulary_length_still_loads() {
        let mut value = serde_json::to_value(TrainConfig::default()).unwrap();
        value.as_object_mut().unwrap().remove("vocabulary_length");
        let cfg: TrainConfig = serde_json::from_value(value).unwrap();
        assert_eq!(cfg.vocabulary_length, 0);
    }

    #[test]
    fn test_prepare_splits_and_writes_vocabulary() {
        let dir = tempdir().unwrap();
        let cfg = config_in(dir.path());
        let prepared = prepare_corpus(&cfg).unwrap();

        // 9 × 0.33 = 2.97 → 3 held out
        assert_eq!(prepared.test.len(), 3);
        assert_eq!(prepared.train.len(), 6);
        assert!(Path::new(&cfg.vocabulary_path).exists());
        // question answer 0..8
        assert_eq!(prepared.vocabulary.len(), 4 + 2 + 9);

        let sample = prepared.train.get(0).unwrap();
        assert_eq!(sample.input.len(), 4);
        assert_eq!(sample.output.len(), 4);
        assert_eq!(sample.target.len(), 4);
    }

    #[test]
    fn test_prepare_is_reproducible() {
        let dir = tempdir().unwrap();
        let cfg = config_in(dir.path());
        let a = prepare_corpus(&cfg).unwrap();
        let b = prepare_corpus(&cfg).unwrap();
        assert_eq!(a.vocabulary, b.vocabulary);
        for i in 0..a.test.len() {
            assert_eq!(a.test.get(i), b.test.get(i));
        }
    }

    #[test]
    fn test_prepare_without_any_source_fails() {
        let dir = tempdir().unwrap();
        let cfg = TrainConfig {
            data_path:       dir.path().join("missing.csv").display().to_string(),
            vocabulary_path: dir.path().join("missing.txt").display().to_string(),
            ..TrainConfig::default()
        };
        assert!(prepare_corpus(&cfg).is_err());
    }
}
