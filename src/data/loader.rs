// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads the (question, answer) corpus from a CSV file.
//
// Expected layout (header row required):
//   Q,A,label
//   12시 땡!,하루가 또 가네요.,0
//   ...
//
// Only the `Q` and `A` columns are used. Quoted fields may
// contain commas; the csv crate handles RFC 4180 quoting.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::domain::qa_pair::QaPair;
use crate::domain::traits::CorpusSource;

pub struct CsvCorpusLoader {
    path: PathBuf,
}

impl CsvCorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CorpusSource for CsvCorpusLoader {
    fn load_pairs(&self) -> Result<Vec<QaPair>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Cannot open corpus '{}'", self.path.display()))?;

        let mut pairs = Vec::new();
        for (row, record) in reader.deserialize::<QaPair>().enumerate() {
            // +2: one for the header, one for 1-based line numbers
            let pair = record.with_context(|| {
                format!("Malformed corpus row {} in '{}'", row + 2, self.path.display())
            })?;
            pairs.push(pair);
        }

        tracing::info!("Loaded {} pairs from '{}'", pairs.len(), self.path.display());
        Ok(pairs)
    }
}
