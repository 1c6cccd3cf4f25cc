// ============================================================
// Layer 5 — Predictor
// ============================================================
// Single-pass reply generation from a restored checkpoint.
//
//   query ──encode_input──────────────▶ encoder input (reversed)
//   ""    ──encode_decoder_input──────▶ [START, PAD, PAD, ...]
//   ""    ──encode_target─────────────▶ [END, PAD, ...] (unused)
//
//   run(batch, Predict) → arg-max per step → decode_to_text
//
// The decoder is not fed its own predictions; every step sees
// the placeholder input and the encoder's final state, exactly
// as the model was queried when it was trained.

use anyhow::{bail, Result};
use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::{
    batcher::Seq2SeqBatcher,
    dataset::Seq2SeqSample,
    encoder::{decode_to_text, SequenceEncoder},
    preprocessor::Preprocessor,
};
use crate::domain::{error::ChatbotError, mode::Mode, vocabulary::Vocabulary};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::mode::ModeOutput;
use crate::ml::model::Seq2SeqModel;

pub type InferBackend = burn::backend::Wgpu;

pub struct Predictor<B: Backend> {
    model:        Seq2SeqModel<B>,
    vocabulary:   Vocabulary,
    preprocessor: Preprocessor,
    max_len:      usize,
    device:       B::Device,
}

impl Predictor<InferBackend> {
    pub fn from_checkpoint(ckpt: &CheckpointManager, vocabulary: Vocabulary) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        Self::load(ckpt, vocabulary, device)
    }
}

impl<B: Backend> Predictor<B> {
    pub fn new(
        model:        Seq2SeqModel<B>,
        vocabulary:   Vocabulary,
        preprocessor: Preprocessor,
        max_len:      usize,
        device:       B::Device,
    ) -> Self {
        Self { model, vocabulary, preprocessor, max_len, device }
    }

    /// Rebuild the trained architecture and restore its newest weights.
    pub fn load(ckpt: &CheckpointManager, vocabulary: Vocabulary, device: B::Device) -> Result<Self> {
        let cfg = ckpt.load_config()?;
        if cfg.vocabulary_length != vocabulary.len() {
            bail!(
                "Vocabulary has {} tokens but the checkpoint was trained with {}",
                vocabulary.len(),
                cfg.vocabulary_length
            );
        }

        let model_config = cfg.model_config(vocabulary.len())?;
        let model = ckpt.load_model(model_config.init::<B>(&device), &device)?;
        tracing::info!("Model loaded from checkpoint");

        Ok(Self::new(
            model,
            vocabulary,
            Preprocessor::new(cfg.tokenize_as_morph),
            cfg.max_sequence_length,
            device,
        ))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Arg-max vocabulary index per output position.
    pub fn predict_indices(&self, query: &str) -> Result<Vec<usize>, ChatbotError> {
        let encoder = SequenceEncoder::new(&self.vocabulary, self.preprocessor, self.max_len)?;
        let sample  = Seq2SeqSample::for_query(&encoder, query)?;
        let batch   = Seq2SeqBatcher::<B>::new(self.device.clone()).batch(vec![sample]);

        match self.model.run(batch, Mode::Predict)? {
            ModeOutput::Predict(out) => Ok(out
                .indices
                .into_data()
                .iter::<i64>()
                .map(|idx| idx as usize)
                .collect()),
            other => Err(ChatbotError::ModeViolation {
                expected: Mode::Predict,
                actual:   other.mode(),
            }),
        }
    }

    pub fn predict(&self, query: &str) -> Result<String, ChatbotError> {
        let indices = self.predict_indices(query)?;
        let reply   = decode_to_text(&indices, &self.vocabulary);
        tracing::debug!("Predicted {:?} → '{}'", indices, reply);
        Ok(reply)
    }
}
