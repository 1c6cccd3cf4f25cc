// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Re-scores the newest checkpoint on the held-out split:
//
//   Step 1: Read train_config.json      (Layer 6 - infra)
//   Step 2: Rebuild vocabulary + split  (Layers 4, 6)
//   Step 3: One Eval-mode pass          (Layer 5 - ml)
//
// The saved seed and test_fraction reproduce the exact split
// training held out.

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::application::train_use_case::{prepare_corpus, PreparedCorpus};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::trainer::{run_evaluation, Evaluation};

pub struct EvaluateUseCase {
    checkpoint_dir: PathBuf,
}

impl EvaluateUseCase {
    pub fn new(checkpoint_dir: impl Into<PathBuf>) -> Self {
        Self { checkpoint_dir: checkpoint_dir.into() }
    }

    pub fn execute(&self) -> Result<Evaluation> {
        let ckpt = CheckpointManager::new(&self.checkpoint_dir)?;
        let cfg  = ckpt.load_config()?;

        let PreparedCorpus { vocabulary, test, .. } = prepare_corpus(&cfg)?;
        if vocabulary.len() != cfg.vocabulary_length {
            bail!(
                "Vocabulary '{}' has {} tokens, checkpoint expects {}",
                cfg.vocabulary_path,
                vocabulary.len(),
                cfg.vocabulary_length
            );
        }

        let evaluation = run_evaluation(&cfg, &cfg.model_config(vocabulary.len())?, test, &ckpt)?;
        tracing::info!(
            "Evaluated {} batches: loss={:.4}, accuracy={:.1}%",
            evaluation.batches,
            evaluation.loss,
            evaluation.accuracy * 100.0
        );
        Ok(evaluation)
    }
}
