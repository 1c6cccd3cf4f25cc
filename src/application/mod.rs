// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: each use case wires the data,
// ml and infra layers together for one command.
//
// Rules for this layer:
//   - No model math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - File access only through Layer 4 and Layer 6 types

// The training workflow and the shared run configuration
pub mod train_use_case;

// Re-scoring a checkpoint on the held-out split
pub mod evaluate_use_case;

// Reply generation from a trained checkpoint
pub mod predict_use_case;
