// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Persists the vocabulary as UTF-8 text, one token per line,
// line number = index. The first four lines are always the
// control tokens.
//
// Resolution order:
//   1. vocabulary file exists → load and validate it
//   2. corpus file exists     → build from every Q and A,
//                               write the file, return it
//   3. neither                → MissingVocabularySource
//
// The file is written at most once per run and only read
// afterwards, so training and inference see identical indices.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::{loader::CsvCorpusLoader, preprocessor::Preprocessor};
use crate::domain::error::ChatbotError;
use crate::domain::qa_pair::{unzip_pairs, QaPair};
use crate::domain::traits::CorpusSource;
use crate::domain::vocabulary::Vocabulary;

pub struct VocabularyStore {
    path: PathBuf,
}

impl VocabularyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved vocabulary, or build one from the corpus at
    /// `corpus_path` if no file has been written yet.
    pub fn load_or_build(&self, corpus_path: &Path, preprocessor: &Preprocessor) -> Result<Vocabulary> {
        if self.path.exists() {
            tracing::info!("Loading vocabulary from '{}'", self.path.display());
            return self.load();
        }

        if !corpus_path.exists() {
            return Err(ChatbotError::MissingVocabularySource {
                vocabulary: self.path.clone(),
                corpus:     corpus_path.to_path_buf(),
            }
            .into());
        }

        let pairs = CsvCorpusLoader::new(corpus_path).load_pairs()?;
        let vocabulary = self.build(&pairs, preprocessor)?;
        self.save(&vocabulary)?;
        Ok(vocabulary)
    }

    /// Build from already-loaded pairs without touching disk.
    pub fn build(&self, pairs: &[QaPair], preprocessor: &Preprocessor) -> Result<Vocabulary> {
        let (questions, answers) = unzip_pairs(pairs);
        let mut sentences = questions;
        sentences.extend(answers);

        let words = preprocessor.corpus_words(&sentences)?;
        let vocabulary = Vocabulary::from_corpus_words(words);
        tracing::info!(
            "Built vocabulary of {} tokens from {} sentences",
            vocabulary.len(),
            sentences.len()
        );
        Ok(vocabulary)
    }

    /// Read and validate an existing vocabulary file.
    pub fn load(&self) -> Result<Vocabulary> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read vocabulary '{}'", self.path.display()))?;

        // every line is a token, blank ones included, so line n stays index n
        let tokens: Vec<String> = text
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect();

        let vocabulary = Vocabulary::from_tokens(tokens)
            .with_context(|| format!("Invalid vocabulary file '{}'", self.path.display()))?;
        tracing::debug!("Vocabulary loaded: {} tokens", vocabulary.len());
        Ok(vocabulary)
    }

    pub fn save(&self, vocabulary: &Vocabulary) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut body = vocabulary.tokens().join("\n");
        body.push('\n');
        fs::write(&self.path, body)
            .with_context(|| format!("Cannot write vocabulary '{}'", self.path.display()))?;

        tracing::info!("Saved vocabulary to '{}'", self.path.display());
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::{END, MARKERS, PAD, START, UNKNOWN};
    use tempfile::tempdir;

    fn write_corpus(dir: &Path) -> PathBuf {
        let path = dir.join("corpus.csv");
        fs::write(&path, "Q,A,label\nhi there!,hello,0\nhow are you?,fine thanks,0\n").unwrap();
        path
    }

    #[test]
    fn test_builds_and_writes_when_missing() {
        let dir    = tempdir().unwrap();
        let corpus = write_corpus(dir.path());
        let store  = VocabularyStore::new(dir.path().join("vocab.txt"));

        let vocab = store.load_or_build(&corpus, &Preprocessor::default()).unwrap();
        assert!(store.path().exists());
        assert_eq!(&vocab.tokens()[..4], &[PAD, START, END, UNKNOWN]);
        // hi there hello how are you fine thanks
        assert_eq!(vocab.len(), 4 + 8);
        assert!(vocab.get("there").is_some());
        assert!(vocab.get("there!").is_none());
    }

    #[test]
    fn test_second_call_reads_the_file() {
        let dir    = tempdir().unwrap();
        let corpus = write_corpus(dir.path());
        let store  = VocabularyStore::new(dir.path().join("vocab.txt"));

        let built = store.load_or_build(&corpus, &Preprocessor::default()).unwrap();
        fs::remove_file(&corpus).unwrap();
        let loaded = store.load_or_build(&corpus, &Preprocessor::default()).unwrap();
        assert_eq!(built, loaded);
    }

    #[test]
    fn test_file_lines_match_indices() {
        let dir   = tempdir().unwrap();
        let store = VocabularyStore::new(dir.path().join("vocab.txt"));
        let vocab = Vocabulary::from_corpus_words(["b", "a"].iter().map(|s| s.to_string()));
        store.save(&vocab).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        for (idx, line) in text.lines().enumerate() {
            assert_eq!(vocab.index_of(line), idx);
        }
    }

    #[test]
    fn test_missing_file_and_corpus_is_an_error() {
        let dir   = tempdir().unwrap();
        let store = VocabularyStore::new(dir.path().join("vocab.txt"));
        let err = store
            .load_or_build(&dir.path().join("nope.csv"), &Preprocessor::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatbotError>(),
            Some(ChatbotError::MissingVocabularySource { .. })
        ));
    }

    #[test]
    fn test_corrupt_file_is_rejected() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("vocab.txt");
        fs::write(&path, "hello\nworld\n").unwrap();
        let err = VocabularyStore::new(&path).load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatbotError>(),
            Some(ChatbotError::CorruptVocabulary(_))
        ));
    }

    #[test]
    fn test_blank_line_is_rejected_not_skipped() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("vocab.txt");
        let mut lines: Vec<&str> = MARKERS.to_vec();
        lines.extend(["hi", "", "there"]);
        fs::write(&path, lines.join("\n") + "\n").unwrap();

        let err = VocabularyStore::new(&path).load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatbotError>(),
            Some(ChatbotError::CorruptVocabulary(_))
        ));
    }

    #[test]
    fn test_trailing_newline_is_not_a_blank_token() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("vocab.txt");
        let mut lines: Vec<&str> = MARKERS.to_vec();
        lines.push("hi");
        fs::write(&path, lines.join("\n") + "\n").unwrap();
        assert_eq!(VocabularyStore::new(&path).load().unwrap().index_of("hi"), 4);
    }

    #[test]
    fn test_duplicate_line_is_rejected() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("vocab.txt");
        let mut lines: Vec<&str> = MARKERS.to_vec();
        lines.extend(["hi", "hi"]);
        fs::write(&path, lines.join("\n")).unwrap();
        assert!(VocabularyStore::new(&path).load().is_err());
    }
}
