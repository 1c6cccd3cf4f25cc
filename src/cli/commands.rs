// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands: `train`, `evaluate` and `predict`.
//
// Boolean hyperparameters take an explicit value
// (`--embedding false`) so their true defaults can be
// switched off from the command line.

use clap::{ArgAction, Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the encoder-decoder on a Q/A corpus
    Train(TrainArgs),

    /// Score the latest checkpoint on the held-out split
    Evaluate(EvaluateArgs),

    /// Generate a reply to a query
    Predict(PredictArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV corpus with `Q` and `A` columns
    #[arg(long, default_value = "data/ChatbotData.csv")]
    pub data_path: String,

    /// Vocabulary file; built from the corpus if missing
    #[arg(long, default_value = "data/vocabulary.txt")]
    pub vocabulary_path: String,

    /// Directory for checkpoints, config and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Every encoded sequence is exactly this long
    #[arg(long, default_value_t = 25)]
    pub max_sequence_length: usize,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Number of optimizer steps
    #[arg(long, default_value_t = 2000)]
    pub train_steps: usize,

    /// Save + evaluate every N steps (and after the last one)
    #[arg(long, default_value_t = 500)]
    pub checkpoint_every: usize,

    #[arg(long, default_value_t = 100)]
    pub log_every: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub learning_rate: f64,

    /// LSTM hidden/cell width
    #[arg(long, default_value_t = 128)]
    pub hidden_size: usize,

    /// Cells per side when --multilayer is on
    #[arg(long, default_value_t = 3)]
    pub layer_size: usize,

    #[arg(long, default_value_t = 128)]
    pub embedding_size: usize,

    /// Dense trainable embeddings; `false` uses fixed one-hot
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub embedding: bool,

    /// Stack --layer-size cells per side instead of one
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub multilayer: bool,

    /// Output dropout, applied in training only
    #[arg(long, default_value_t = 0.2)]
    pub dropout: f64,

    /// Split on script and punctuation boundaries before tokenizing
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub tokenize_as_morph: bool,

    /// Fraction of pairs held out for evaluation
    #[arg(long, default_value_t = 0.33)]
    pub test_fraction: f64,

    /// Seed for the split and batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:           a.data_path,
            vocabulary_path:     a.vocabulary_path,
            checkpoint_dir:      a.checkpoint_dir,
            max_sequence_length: a.max_sequence_length,
            batch_size:          a.batch_size,
            train_steps:         a.train_steps,
            checkpoint_every:    a.checkpoint_every,
            log_every:           a.log_every,
            learning_rate:       a.learning_rate,
            hidden_size:         a.hidden_size,
            layer_size:          a.layer_size,
            embedding_size:      a.embedding_size,
            embedding:           a.embedding,
            multilayer:          a.multilayer,
            dropout:             a.dropout,
            tokenize_as_morph:   a.tokenize_as_morph,
            test_fraction:       a.test_fraction,
            seed:                a.seed,
            vocabulary_length:   0,
        }
    }
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Directory written by `train`
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Query words, joined with single spaces
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Directory written by `train`
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
