// ============================================================
// Layer 3 — Execution Mode and Weight Scope
// ============================================================
// Mode selects what happens after the shared forward pass:
//   Train   → loss + one optimiser step
//   Eval    → loss + accuracy, weights untouched
//   Predict → arg-max indices + raw logits, no loss
//
// Scope names the side of the network that owns a recurrent
// cell, so layer 0 of the encoder and layer 0 of the decoder
// never share weights.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Train,
    Eval,
    Predict,
}

impl Mode {
    /// Output dropout is only active while training.
    pub fn dropout_enabled(self) -> bool {
        matches!(self, Mode::Train)
    }

    /// Train and Eval compute a loss; Predict never does.
    pub fn computes_loss(self) -> bool {
        !matches!(self, Mode::Predict)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Encoder,
    Decoder,
}
