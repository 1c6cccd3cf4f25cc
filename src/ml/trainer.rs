// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Step-driven training over an endless, reshuffling batch
// stream. The loop, not the data, decides when to stop:
//
//   for step in 1..=train_steps
//     run(batch, Train) → loss → backward → Adam step
//     every log_every steps        → log running loss
//     every checkpoint_every steps
//     and after the last step      → save weights,
//                                    one eval pass,
//                                    append metrics row
//
// Backends:
//   - training runs on TrainBackend (Autodiff<Wgpu>)
//   - model.valid() drops autodiff for evaluation, so the
//     evaluation batcher is built on the inner backend
//   - dropout is a function of Mode, not of the backend

use anyhow::{Context, Result};
use burn::{
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{Seq2SeqBatch, Seq2SeqBatcher},
    dataset::Seq2SeqDataset,
    iterator::{BatchStream, RepeatingBatches, SinglePassBatches},
};
use crate::domain::{error::ChatbotError, mode::Mode};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{MetricsLogger, StepMetrics},
};
use crate::ml::mode::{ModeOutput, RunningAccuracy, TrainOutput};
use crate::ml::model::{Seq2SeqConfig, Seq2SeqModel};

type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;
type EvalBackend  = burn::backend::Wgpu;

/// Mean loss and time-step accuracy over one pass of a split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Per-example mean loss (batch losses weighted by batch size);
    /// NaN when there were no batches
    pub loss:     f64,
    pub accuracy: f64,
    pub batches:  usize,
    pub examples: usize,
}

#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub steps:          usize,
    pub last:           Option<StepMetrics>,
    pub best_eval_loss: f64,
}

// ─── Single step ──────────────────────────────────────────────────────────────

/// Backpropagate a Train-mode output and apply one optimizer update.
/// Any other mode reaching this point is an internal error.
pub fn apply_update<B, O>(
    model:  Seq2SeqModel<B>,
    optim:  &mut O,
    output: ModeOutput<B>,
    lr:     f64,
) -> Result<(Seq2SeqModel<B>, f64), ChatbotError>
where
    B: AutodiffBackend,
    O: Optimizer<Seq2SeqModel<B>, B>,
{
    let loss = match output {
        ModeOutput::Train(TrainOutput { loss }) => loss,
        other => {
            return Err(ChatbotError::ModeViolation {
                expected: Mode::Train,
                actual:   other.mode(),
            })
        }
    };

    let value: f64 = loss.clone().into_scalar().elem::<f64>();

    let grads = loss.backward();
    let grads = GradientsParams::from_grads(grads, &model);
    Ok((optim.step(lr, model, grads), value))
}

/// Forward in Train mode, then `apply_update`.
pub fn train_step<B, O>(
    model: Seq2SeqModel<B>,
    optim: &mut O,
    batch: Seq2SeqBatch<B>,
    lr:    f64,
) -> Result<(Seq2SeqModel<B>, f64), ChatbotError>
where
    B: AutodiffBackend,
    O: Optimizer<Seq2SeqModel<B>, B>,
{
    let output = model.run(batch, Mode::Train)?;
    apply_update(model, optim, output, lr)
}

/// One Eval-mode pass; no parameter is touched.
pub fn evaluate<B, I>(model: &Seq2SeqModel<B>, batches: I) -> Result<Evaluation, ChatbotError>
where
    B: Backend,
    I: IntoIterator<Item = Seq2SeqBatch<B>>,
{
    let mut loss_sum = 0.0f64;
    let mut count    = 0usize;
    let mut examples = 0usize;
    let mut accuracy = RunningAccuracy::default();

    for batch in batches {
        let size = batch.batch_size();
        match model.run(batch, Mode::Eval)? {
            ModeOutput::Eval(out) => {
                // a short final batch must not weigh as much as a full one
                loss_sum += out.loss.into_scalar().elem::<f64>() * size as f64;
                accuracy.update(out.accuracy);
                examples += size;
                count += 1;
            }
            other => {
                return Err(ChatbotError::ModeViolation {
                    expected: Mode::Eval,
                    actual:   other.mode(),
                })
            }
        }
    }

    let loss = if examples > 0 { loss_sum / examples as f64 } else { f64::NAN };
    Ok(Evaluation { loss, accuracy: accuracy.value(), batches: count, examples })
}

// ─── Drivers ──────────────────────────────────────────────────────────────────

pub fn run_training(
    cfg:          &TrainConfig,
    model_config: &Seq2SeqConfig,
    train:        Seq2SeqDataset,
    test:         Seq2SeqDataset,
    ckpt:         &CheckpointManager,
    metrics:      &MetricsLogger,
) -> Result<TrainingSummary> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop::<TrainBackend>(cfg, model_config, train, test, ckpt, metrics, device)
}

/// Restore the newest checkpoint and evaluate it over `test`.
pub fn run_evaluation(
    cfg:          &TrainConfig,
    model_config: &Seq2SeqConfig,
    test:         Seq2SeqDataset,
    ckpt:         &CheckpointManager,
) -> Result<Evaluation> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    let model  = ckpt.load_model(model_config.init::<EvalBackend>(&device), &device)?;
    let batches = SinglePassBatches::new(
        test,
        Seq2SeqBatcher::<EvalBackend>::new(device),
        cfg.batch_size,
        cfg.seed,
    )?;
    Ok(evaluate(&model, batches)?)
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    model_config: &Seq2SeqConfig,
    train:        Seq2SeqDataset,
    test:         Seq2SeqDataset,
    ckpt:         &CheckpointManager,
    metrics:      &MetricsLogger,
    device:       B::Device,
) -> Result<TrainingSummary> {

    // ── Build model ───────────────────────────────────────────────────────────
    model_config.validate()?;
    let mut model: Seq2SeqModel<B> = model_config.init(&device);
    tracing::info!(
        "Model ready: {} layer(s) per side, hidden={}, vocab={}",
        model_config.layers(),
        model_config.hidden_size,
        model_config.vocabulary_length,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new().init::<B, Seq2SeqModel<B>>();

    // ── Endless training stream ───────────────────────────────────────────────
    let mut stream = RepeatingBatches::new(
        train,
        Seq2SeqBatcher::<B>::new(device.clone()),
        cfg.batch_size,
        cfg.seed,
    )?;
    tracing::info!(
        "Training for {} steps ({} batches per pass)",
        cfg.train_steps,
        stream.batches_per_pass(),
    );

    let log_every        = cfg.log_every.max(1);
    let checkpoint_every = cfg.checkpoint_every.max(1);

    let mut window_loss  = 0.0f64;
    let mut window_steps = 0usize;
    let mut log_loss     = 0.0f64;
    let mut log_steps    = 0usize;
    let mut best         = f64::INFINITY;
    let mut last         = None;

    // ── Step loop ─────────────────────────────────────────────────────────────
    for step in 1..=cfg.train_steps {
        let batch = stream.next().context("Training split is empty")?;

        let (next, loss) = train_step(model, &mut optim, batch, cfg.learning_rate)?;
        model = next;

        window_loss  += loss;
        window_steps += 1;
        log_loss     += loss;
        log_steps    += 1;

        if step % log_every == 0 {
            tracing::info!(
                "Step {:>6}/{} | pass {} | loss={:.4}",
                step,
                cfg.train_steps,
                stream.pass() + 1,
                log_loss / log_steps as f64,
            );
            log_loss  = 0.0;
            log_steps = 0;
        }

        if step % checkpoint_every != 0 && step != cfg.train_steps {
            continue;
        }

        // ── Checkpoint + evaluation ───────────────────────────────────────────
        ckpt.save_model(&model, step)?;

        let eval_batches = SinglePassBatches::new(
            test.clone(),
            Seq2SeqBatcher::<B::InnerBackend>::new(device.clone()),
            cfg.batch_size,
            cfg.seed,
        )?;
        let eval = evaluate(&model.valid(), eval_batches)?;

        let row = StepMetrics::new(
            step,
            window_loss / window_steps as f64,
            eval.loss,
            eval.accuracy,
        );
        metrics.log(&row)?;

        tracing::info!(
            "Step {:>6} | train_loss={:.4} | eval_loss={:.4} | accuracy={:.1}%",
            step,
            row.train_loss,
            row.eval_loss,
            row.accuracy * 100.0,
        );
        if row.is_improvement(best) {
            best = row.eval_loss;
            tracing::info!("New best eval loss {:.4} at step {}", best, step);
        }

        window_loss  = 0.0;
        window_steps = 0;
        last = Some(row);
    }

    tracing::info!("Training complete!");
    Ok(TrainingSummary { steps: cfg.train_steps, last, best_eval_loss: best })
}
