// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem on behalf of the
// other layers:
//
//   vocabulary_store.rs — Vocabulary file persistence
//                         Loads and validates vocabulary.txt,
//                         or builds it from the corpus once
//                         and writes it so training and
//                         inference share one index mapping.
//
//   checkpoint.rs       — Model weights and run config
//                         CompactRecorder checkpoints per
//                         step, latest_step.json pointer, and
//                         train_config.json for rebuilding the
//                         model at evaluate/predict time.
//
//   metrics.rs          — Training metrics logging
//                         One CSV row per evaluation point
//                         (step, losses, accuracy).

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Vocabulary file loading, building and saving
pub mod vocabulary_store;

/// Training metrics CSV logger
pub mod metrics;
