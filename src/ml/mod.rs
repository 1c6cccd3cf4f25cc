// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All model math lives here. Everything is generic over the
// Burn backend; the concrete Wgpu backends are named only in
// trainer.rs and inferencer.rs.
//
//   embedding.rs  — encoder-side and decoder-side lookup tables
//                   (dense Xavier or frozen one-hot identity)
//
//   recurrent.rs  — LSTM encoder/decoder stacks kept in a
//                   (scope, layer) registry; train-only dropout
//
//   model.rs      — Seq2SeqConfig + Seq2SeqModel: embeddings,
//                   recurrent core, linear projection to
//                   vocabulary logits
//
//   mode.rs       — Train / Eval / Predict dispatcher over the
//                   shared logits: loss, accuracy, arg-max
//
//   trainer.rs    — step-driven Adam loop with periodic
//                   checkpoint + evaluation
//
//   inferencer.rs — restores a checkpoint and turns a query
//                   into a reply
//
// Reference: Sutskever et al. (2014) Sequence to Sequence
//            Learning with Neural Networks
//            Burn Book §3 (Building Blocks), §5 (Training)

/// Per-side embedding tables
pub mod embedding;

/// LSTM cell registry and encoder/decoder passes
pub mod recurrent;

/// Encoder-decoder model
pub mod model;

/// Mode dispatch, sequence loss and accuracy
pub mod mode;

/// Training loop with evaluation and checkpointing
pub mod trainer;

/// Checkpoint-backed reply generation
pub mod inferencer;
