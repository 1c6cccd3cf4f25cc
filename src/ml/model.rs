use burn::{
    nn::{Embedding, Linear, LinearConfig},
    prelude::*,
};

use crate::data::batcher::Seq2SeqBatch;
use crate::domain::error::ChatbotError;
use crate::domain::mode::Mode;
use crate::ml::embedding::SideEmbeddingConfig;
use crate::ml::mode::{dispatch, ModeOutput};
use crate::ml::recurrent::{RecurrentConfig, RecurrentCore};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct Seq2SeqConfig {
    pub vocabulary_length: usize,
    pub embedding_size:    usize,
    pub hidden_size:       usize,
    #[config(default = 1)]
    pub layer_size: usize,
    /// Dense trainable embeddings when true, one-hot identity when false
    #[config(default = true)]
    pub embedding: bool,
    /// Stack `layer_size` cells per side when true, a single cell when false
    #[config(default = false)]
    pub multilayer: bool,
    #[config(default = 0.2)]
    pub dropout: f64,
}

impl Seq2SeqConfig {
    pub fn layers(&self) -> usize {
        if self.multilayer { self.layer_size.max(1) } else { 1 }
    }

    /// Reject hyperparameters the layers would panic on.
    pub fn validate(&self) -> Result<(), ChatbotError> {
        if !(0.0..=1.0).contains(&self.dropout) {
            return Err(ChatbotError::InvalidDropout(self.dropout));
        }
        Ok(())
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Seq2SeqModel<B> {
        let side = SideEmbeddingConfig::new(self.vocabulary_length, self.embedding_size)
            .with_trainable(self.embedding);
        let encoder_embedding = side.init(device);
        let decoder_embedding = side.init(device);

        let recurrent = RecurrentConfig::new(side.output_size(), side.output_size(), self.hidden_size)
            .with_layers(self.layers())
            .with_dropout(self.dropout)
            .init(device);

        let projection = LinearConfig::new(self.hidden_size, self.vocabulary_length).init(device);

        Seq2SeqModel { encoder_embedding, decoder_embedding, recurrent, projection }
    }
}

#[derive(Module, Debug)]
pub struct Seq2SeqModel<B: Backend> {
    pub encoder_embedding: Embedding<B>,
    pub decoder_embedding: Embedding<B>,
    pub recurrent:         RecurrentCore<B>,
    pub projection:        Linear<B>,
}

impl<B: Backend> Seq2SeqModel<B> {
    /// input, output: [batch, seq] → logits: [batch, seq, vocabulary_length]
    pub fn forward(
        &self,
        input:  Tensor<B, 2, Int>,
        output: Tensor<B, 2, Int>,
        mode:   Mode,
    ) -> Result<Tensor<B, 3>, ChatbotError> {
        let states = self
            .recurrent
            .encode(self.encoder_embedding.forward(input), mode)?;

        let decoded = self
            .recurrent
            .decode(self.decoder_embedding.forward(output), states, mode)?;

        // Linear, no activation
        Ok(self.projection.forward(decoded))
    }

    /// Shared forward pass followed by the mode-specific tail.
    pub fn run(&self, batch: Seq2SeqBatch<B>, mode: Mode) -> Result<ModeOutput<B>, ChatbotError> {
        let logits = self.forward(batch.input, batch.output, mode)?;
        Ok(dispatch(mode, logits, batch.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batcher::Seq2SeqBatcher;
    use crate::data::dataset::Seq2SeqSample;
    use burn::backend::NdArray;
    use burn::data::dataloader::batcher::Batcher;

    type TestBackend = NdArray;

    fn batch() -> Seq2SeqBatch<TestBackend> {
        Seq2SeqBatcher::new(Default::default()).batch(vec![
            Seq2SeqSample { input: vec![0, 5, 4], output: vec![1, 6, 0], target: vec![6, 2, 0] },
            Seq2SeqSample { input: vec![7, 5, 4], output: vec![1, 7, 6], target: vec![7, 6, 2] },
        ])
    }

    #[test]
    fn test_single_layer_unless_multilayer() {
        let cfg = Seq2SeqConfig::new(10, 4, 8).with_layer_size(3);
        assert_eq!(cfg.layers(), 1);
        assert_eq!(cfg.with_multilayer(true).layers(), 3);
    }

    #[test]
    fn test_dropout_outside_unit_range_is_rejected() {
        for bad in [1.5, -0.1, f64::NAN] {
            assert!(matches!(
                Seq2SeqConfig::new(10, 4, 8).with_dropout(bad).validate(),
                Err(ChatbotError::InvalidDropout(_))
            ));
        }
        assert!(Seq2SeqConfig::new(10, 4, 8).with_dropout(1.0).validate().is_ok());
        assert!(Seq2SeqConfig::new(10, 4, 8).with_dropout(0.0).validate().is_ok());
    }

    #[test]
    fn test_logits_shape_dense_multilayer() {
        let model = Seq2SeqConfig::new(10, 4, 8)
            .with_layer_size(2)
            .with_multilayer(true)
            .init::<TestBackend>(&Default::default());
        let b = batch();
        let logits = model.forward(b.input, b.output, Mode::Eval).unwrap();
        assert_eq!(logits.dims(), [2, 3, 10]);
        assert_eq!(model.recurrent.layers(), 2);
    }

    #[test]
    fn test_logits_shape_one_hot() {
        let model = Seq2SeqConfig::new(10, 4, 8)
            .with_embedding(false)
            .init::<TestBackend>(&Default::default());
        assert_eq!(model.encoder_embedding.weight.val().dims(), [10, 10]);
        let b = batch();
        let logits = model.forward(b.input, b.output, Mode::Predict).unwrap();
        assert_eq!(logits.dims(), [2, 3, 10]);
    }

    #[test]
    fn test_predict_never_returns_loss() {
        let model = Seq2SeqConfig::new(10, 4, 8).init::<TestBackend>(&Default::default());
        let out = model.run(batch(), Mode::Predict).unwrap();
        assert!(out.loss().is_none());
        assert!(model.run(batch(), Mode::Eval).unwrap().loss().is_some());
        assert!(model.run(batch(), Mode::Train).unwrap().loss().is_some());
    }

    #[test]
    fn test_repeated_predict_is_consistent() {
        let model = Seq2SeqConfig::new(10, 4, 8)
            .with_multilayer(true)
            .with_layer_size(2)
            .with_dropout(0.5)
            .init::<TestBackend>(&Default::default());
        let b = batch();
        let first: Vec<f32> = model
            .forward(b.input.clone(), b.output.clone(), Mode::Predict)
            .unwrap()
            .into_data()
            .to_vec()
            .unwrap();
        let second: Vec<f32> = model
            .forward(b.input, b.output, Mode::Predict)
            .unwrap()
            .into_data()
            .to_vec()
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encoder_and_decoder_embeddings_are_independent() {
        let model = Seq2SeqConfig::new(10, 4, 8).init::<TestBackend>(&Default::default());
        assert_ne!(model.encoder_embedding.weight.id, model.decoder_embedding.weight.id);
    }
}
