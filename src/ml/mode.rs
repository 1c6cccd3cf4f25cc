// ============================================================
// Layer 5 — Mode Dispatcher, Loss and Metrics
// ============================================================
// The forward pass up to logits is shared by every mode.
// `dispatch` then picks what to compute from those logits:
//
//   Predict → arg-max over the vocabulary axis + raw logits
//   Eval    → mean cross-entropy + batch accuracy
//   Train   → mean cross-entropy (the trainer backpropagates it)
//
// Loss is averaged over every (batch element, time step),
// padding positions included.

use burn::{nn::loss::CrossEntropyLossConfig, prelude::*};

use crate::domain::mode::Mode;

// ─── Outputs ──────────────────────────────────────────────────────────────────
pub struct PredictOutput<B: Backend> {
    /// Arg-max index per time step — shape: [batch, seq]
    pub indices: Tensor<B, 2, Int>,
    /// Raw vocabulary scores — shape: [batch, seq, vocab]
    pub logits: Tensor<B, 3>,
}

pub struct EvalOutput<B: Backend> {
    pub loss:     Tensor<B, 1>,
    pub accuracy: BatchAccuracy,
}

pub struct TrainOutput<B: Backend> {
    pub loss: Tensor<B, 1>,
}

pub enum ModeOutput<B: Backend> {
    Train(TrainOutput<B>),
    Eval(EvalOutput<B>),
    Predict(PredictOutput<B>),
}

impl<B: Backend> ModeOutput<B> {
    pub fn mode(&self) -> Mode {
        match self {
            ModeOutput::Train(_)   => Mode::Train,
            ModeOutput::Eval(_)    => Mode::Eval,
            ModeOutput::Predict(_) => Mode::Predict,
        }
    }

    /// None in Predict mode, which never computes a loss
    pub fn loss(&self) -> Option<&Tensor<B, 1>> {
        match self {
            ModeOutput::Train(t)   => Some(&t.loss),
            ModeOutput::Eval(e)    => Some(&e.loss),
            ModeOutput::Predict(_) => None,
        }
    }
}

/// Choose the downstream computation for `mode`.
pub fn dispatch<B: Backend>(
    mode:   Mode,
    logits: Tensor<B, 3>,
    target: Tensor<B, 2, Int>,
) -> ModeOutput<B> {
    match mode {
        Mode::Predict => {
            let indices = arg_max(logits.clone());
            ModeOutput::Predict(PredictOutput { indices, logits })
        }
        Mode::Eval => {
            let accuracy = BatchAccuracy::measure(arg_max(logits.clone()), target.clone());
            let loss     = sequence_loss(logits, target);
            ModeOutput::Eval(EvalOutput { loss, accuracy })
        }
        Mode::Train => ModeOutput::Train(TrainOutput { loss: sequence_loss(logits, target) }),
    }
}

/// [batch, seq, vocab] → [batch, seq]
pub fn arg_max<B: Backend>(logits: Tensor<B, 3>) -> Tensor<B, 2, Int> {
    let [batch, seq, _] = logits.dims();
    logits.argmax(2).reshape([batch, seq])
}

/// Softmax cross-entropy against one-hot targets, mean over batch × seq.
pub fn sequence_loss<B: Backend>(logits: Tensor<B, 3>, target: Tensor<B, 2, Int>) -> Tensor<B, 1> {
    let [batch, seq, vocab] = logits.dims();
    let ce = CrossEntropyLossConfig::new().init(&logits.device());
    ce.forward(logits.reshape([batch * seq, vocab]), target.reshape([batch * seq]))
}

// ─── Accuracy ─────────────────────────────────────────────────────────────────
/// Matching time steps in one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchAccuracy {
    pub correct: usize,
    pub total:   usize,
}

impl BatchAccuracy {
    pub fn measure<B: Backend>(predicted: Tensor<B, 2, Int>, target: Tensor<B, 2, Int>) -> Self {
        let [batch, seq] = target.dims();
        let correct: i64 = predicted
            .equal(target)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();
        Self { correct: correct as usize, total: batch * seq }
    }
}

/// Accuracy accumulated across batches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningAccuracy {
    correct: usize,
    total:   usize,
}

impl RunningAccuracy {
    pub fn update(&mut self, batch: BatchAccuracy) {
        self.correct += batch.correct;
        self.total   += batch.total;
    }

    /// Fraction in [0, 1]; 0 before any update
    pub fn value(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}
