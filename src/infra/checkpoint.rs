// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores Seq2SeqModel weights with Burn's
// CompactRecorder (MessagePack, half precision, gzip).
//
// Directory layout:
//   checkpoints/
//     model_step_500.mpk.gz    ← weights after step 500
//     model_step_1000.mpk.gz
//     ...
//     latest_step.json         ← step of the newest checkpoint
//     train_config.json        ← everything needed to rebuild
//                                the model before loading weights
//     metrics.csv              ← written by MetricsLogger
//
// Loading fails if the stored record does not match the
// architecture rebuilt from train_config.json.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::Seq2SeqModel;

const LATEST_FILE: &str = "latest_step.json";
const CONFIG_FILE: &str = "train_config.json";

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    fn model_path(&self, step: usize) -> PathBuf {
        // recorder appends the extension
        self.dir.join(format!("model_step_{step}"))
    }

    /// Write weights for `step` and move the latest pointer to it.
    pub fn save_model<B: Backend>(&self, model: &Seq2SeqModel<B>, step: usize) -> Result<()> {
        let path = self.model_path(step);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        fs::write(self.dir.join(LATEST_FILE), serde_json::to_string(&step)?)
            .with_context(|| format!("Failed to write {LATEST_FILE}"))?;

        tracing::debug!("Saved checkpoint: step {}", step);
        Ok(())
    }

    /// Restore the newest checkpoint into a freshly built model.
    pub fn load_model<B: Backend>(
        &self,
        model:  Seq2SeqModel<B>,
        device: &B::Device,
    ) -> Result<Seq2SeqModel<B>> {
        let step = self.latest_step()?;
        self.load_model_at(model, step, device)
    }

    pub fn load_model_at<B: Backend>(
        &self,
        model:  Seq2SeqModel<B>,
        step:   usize,
        device: &B::Device,
    ) -> Result<Seq2SeqModel<B>> {
        let path = self.model_path(step);
        tracing::info!("Loading checkpoint from step {}", step);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display()
                )
            })?;

        Ok(model.load_record(record))
    }

    /// Must run before training so evaluate/predict can rebuild
    /// the same architecture.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Run 'train' before 'evaluate' or 'predict'.",
                path.display()
            )
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config '{}'", path.display()))
    }

    /// Step number recorded by the last `save_model` call.
    pub fn latest_step(&self) -> Result<usize> {
        let path = self.dir.join(LATEST_FILE);
        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot find '{LATEST_FILE}'. Have you run 'train' first?"))?;
        Ok(serde_json::from_str::<usize>(&s)?)
    }
}
