// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one CSV row per evaluation point of a training run.
//
// Output file: checkpoints/metrics.csv
//
//   step,train_loss,eval_loss,accuracy
//   500,3.912345,4.010203,0.412000
//   1000,2.871100,3.554300,0.468000
//   ...
//
// train_loss is the mean over the steps since the previous
// row; eval_loss and accuracy come from one full pass over
// the held-out split. accuracy counts every time step,
// padding included.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

const HEADER: &str = "step,train_loss,eval_loss,accuracy";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepMetrics {
    pub step:       usize,
    pub train_loss: f64,
    pub eval_loss:  f64,
    /// Fraction of matching time steps, in [0, 1]
    pub accuracy:   f64,
}

impl StepMetrics {
    pub fn new(step: usize, train_loss: f64, eval_loss: f64, accuracy: f64) -> Self {
        Self { step, train_loss, eval_loss, accuracy }
    }

    /// True if eval_loss beat the best seen so far
    pub fn is_improvement(&self, best_eval_loss: f64) -> bool {
        self.eval_loss < best_eval_loss
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the header only when the file is new, so repeated
    /// runs into the same directory keep appending.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &StepMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.step, m.train_loss, m.eval_loss, m.accuracy,
        )?;

        tracing::debug!(
            "Logged step {} metrics: train_loss={:.4}, eval_loss={:.4}",
            m.step,
            m.train_loss,
            m.eval_loss,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_improvement() {
        let m = StepMetrics::new(500, 2.5, 2.3, 0.2);
        assert!(m.is_improvement(3.0));
        assert!(!m.is_improvement(2.0));
    }

    #[test]
    fn test_rows_append_under_single_header() {
        let dir = tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&StepMetrics::new(1, 1.0, 2.0, 0.5)).unwrap();

        // reopening must not write a second header
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&StepMetrics::new(2, 0.5, 1.5, 0.75)).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            HEADER,
            "1,1.000000,2.000000,0.500000",
            "2,0.500000,1.500000,0.750000",
        ]);
    }
}
