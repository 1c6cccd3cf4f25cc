// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to
// its use case. The only layer that prints to stdout.
//
//   1. `train`    — train on the corpus, checkpoint as it goes
//   2. `evaluate` — loss/accuracy of the latest checkpoint
//   3. `predict`  — reply to the words given on the command line

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, PredictArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "seq2seq-chatbot",
    version = "0.1.0",
    about = "Train an LSTM encoder-decoder on question/answer pairs, then generate replies."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
            Commands::Predict(args)  => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on corpus: {}", args.data_path);
    let summary = TrainUseCase::new(args.into()).execute()?;

    match summary.last {
        Some(m) => println!(
            "Training complete after {} steps. eval_loss={:.4} accuracy={:.1}% (best eval_loss={:.4})",
            summary.steps,
            m.eval_loss,
            m.accuracy * 100.0,
            summary.best_eval_loss,
        ),
        None => println!("Training complete. No steps were run."),
    }
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let eval = EvaluateUseCase::new(&args.checkpoint_dir).execute()?;
    println!("loss={:.4} accuracy={:.1}%", eval.loss, eval.accuracy * 100.0);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::new(&args.checkpoint_dir)?;
    let reply    = use_case.answer(&args.query)?;
    println!("{reply}");
    Ok(())
}
