// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe what the system works with:
// the vocabulary, corpus pairs, errors, and the traits other
// layers implement. No tensors and no file I/O here.

// Token ↔ index mapping with the four control tokens
pub mod vocabulary;

// A (question, answer) corpus row
pub mod qa_pair;

// Execution mode (train / eval / predict) and weight scopes
pub mod mode;

// Typed failures of the core pipeline
pub mod error;

// Abstractions implemented by the data and application layers
pub mod traits;
