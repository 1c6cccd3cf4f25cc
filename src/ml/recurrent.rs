// ============================================================
// Layer 5 — Encoder-Decoder Recurrent Core
// ============================================================
// Two stacks of LSTM cells, one per Scope:
//
//   Encoder: runs over the embedded (reversed) question and
//            keeps ONLY each layer's final (cell, hidden)
//            state. Its output sequence is discarded.
//   Decoder: runs over the embedded decoder input, layer l
//            starting from the encoder's final state of layer l,
//            and returns its full output sequence.
//
// Weight reuse
//   Every cell is owned by the registry under (scope, layer)
//   and created once, in RecurrentConfig::init. `cell()` only
//   ever hands out a reference to that one instance, so asking
//   twice for the same (scope, layer) yields the same weights,
//   while encoder layer 0 and decoder layer 0 stay distinct.
//
// Dropout is applied to each layer's output only in Train mode.

use burn::{
    nn::{Dropout, DropoutConfig, Lstm, LstmConfig, LstmState},
    prelude::*,
};

use crate::domain::error::ChatbotError;
use crate::domain::mode::{Mode, Scope};

#[derive(Config, Debug)]
pub struct RecurrentConfig {
    /// Width of the encoder embedding vectors
    pub encoder_input: usize,
    /// Width of the decoder embedding vectors
    pub decoder_input: usize,
    pub hidden_size:   usize,
    #[config(default = 1)]
    pub layers: usize,
    #[config(default = 0.0)]
    pub dropout: f64,
}

impl RecurrentConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> RecurrentCore<B> {
        let layers = self.layers.max(1);
        RecurrentCore {
            encoder: self.build_stack(self.encoder_input, layers, device),
            decoder: self.build_stack(self.decoder_input, layers, device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }

    /// Layer 0 reads the embeddings, deeper layers read hidden states
    fn build_stack<B: Backend>(&self, input: usize, layers: usize, device: &B::Device) -> Vec<Lstm<B>> {
        (0..layers)
            .map(|layer| {
                let d_input = if layer == 0 { input } else { self.hidden_size };
                LstmConfig::new(d_input, self.hidden_size, true).init(device)
            })
            .collect()
    }
}

#[derive(Module, Debug)]
pub struct RecurrentCore<B: Backend> {
    encoder: Vec<Lstm<B>>,
    decoder: Vec<Lstm<B>>,
    dropout: Dropout,
}

impl<B: Backend> RecurrentCore<B> {
    /// The single cell registered under (scope, layer).
    pub fn cell(&self, scope: Scope, layer: usize) -> Result<&Lstm<B>, ChatbotError> {
        let stack = match scope {
            Scope::Encoder => &self.encoder,
            Scope::Decoder => &self.decoder,
        };
        stack.get(layer).ok_or(ChatbotError::LayerOutOfRange {
            scope,
            layer,
            layers: stack.len(),
        })
    }

    pub fn layers(&self) -> usize {
        self.encoder.len()
    }

    /// [batch, seq, d_in] → one final state per layer, each [batch, hidden]
    pub fn encode(
        &self,
        embedded: Tensor<B, 3>,
        mode:     Mode,
    ) -> Result<Vec<LstmState<B, 2>>, ChatbotError> {
        let mut x      = embedded;
        let mut states = Vec::with_capacity(self.encoder.len());

        for layer in 0..self.encoder.len() {
            let (output, state) = self.cell(Scope::Encoder, layer)?.forward(x, None);
            x = self.apply_dropout(output, mode);
            states.push(state);
        }

        Ok(states)
    }

    /// [batch, seq, d_in] + encoder states → [batch, seq, hidden]
    pub fn decode(
        &self,
        embedded: Tensor<B, 3>,
        initial:  Vec<LstmState<B, 2>>,
        mode:     Mode,
    ) -> Result<Tensor<B, 3>, ChatbotError> {
        if initial.len() != self.decoder.len() {
            return Err(ChatbotError::LayerOutOfRange {
                scope:  Scope::Decoder,
                layer:  initial.len().saturating_sub(1),
                layers: self.decoder.len(),
            });
        }

        let mut x = embedded;
        for (layer, state) in initial.into_iter().enumerate() {
            let (output, _) = self.cell(Scope::Decoder, layer)?.forward(x, Some(state));
            x = self.apply_dropout(output, mode);
        }

        Ok(x)
    }

    fn apply_dropout<const D: usize>(&self, x: Tensor<B, D>, mode: Mode) -> Tensor<B, D> {
        if mode.dropout_enabled() {
            self.dropout.forward(x)
        } else {
            x
        }
    }
}
