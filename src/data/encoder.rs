// ============================================================
// Layer 4 — Sequence Encoder / Decoder
// ============================================================
// Converts sentences to fixed-length index sequences and
// predicted indices back to display text.
//
// With max_len = 4 and vocabulary
//   {PAD:0, START:1, END:2, UNK:3, hi:4, there:5}
//
//   encode_input("hi there extra words")
//     words    → [4, 5, 3, 3]      unknown words become UNK
//     truncate → [4, 5, 3, 3]
//     pad      → [4, 5, 3, 3]
//     reverse  → [3, 3, 5, 4]
//
//   encode_decoder_input("hi there")  → [1, 4, 5, 0]   START first
//   encode_target("hi there")         → [4, 5, 2, 0]   END appended
//
// Encoder inputs are reversed AFTER padding, so padding ends
// up at the front and the most recent words sit next to the
// encoder's final state. Decoder sequences are never reversed.
//
// Truncation always drops from the tail. Targets keep room for
// the END marker so it can never be cut off.

use crate::data::preprocessor::Preprocessor;
use crate::domain::error::ChatbotError;
use crate::domain::vocabulary::{Vocabulary, END_INDEX, PAD_INDEX, START_INDEX};

/// Index sequences plus the true (pre-padding) length of each
pub type Encoded = (Vec<Vec<usize>>, Vec<usize>);

pub struct SequenceEncoder<'a> {
    vocabulary:   &'a Vocabulary,
    preprocessor: Preprocessor,
    max_len:      usize,
}

impl<'a> SequenceEncoder<'a> {
    pub fn new(
        vocabulary:   &'a Vocabulary,
        preprocessor: Preprocessor,
        max_len:      usize,
    ) -> Result<Self, ChatbotError> {
        if max_len == 0 {
            return Err(ChatbotError::InvalidSequenceLength(max_len));
        }
        Ok(Self { vocabulary, preprocessor, max_len })
    }

    /// Encoder input: map → truncate → pad → reverse.
    pub fn encode_input<S: AsRef<str>>(&self, sentences: &[S]) -> Result<Encoded, ChatbotError> {
        let mut sequences = Vec::with_capacity(sentences.len());
        let mut lengths   = Vec::with_capacity(sentences.len());

        for sentence in sentences {
            let mut seq = self.indices(sentence.as_ref())?;
            seq.truncate(self.max_len);
            lengths.push(seq.len());
            seq.resize(self.max_len, PAD_INDEX);
            seq.reverse();
            sequences.push(seq);
        }

        Ok((sequences, lengths))
    }

    /// Teacher-forced decoder input: START + words → truncate → pad.
    ///
    /// At prediction time this is built from "" and only fixes the
    /// shape of the decoder input.
    pub fn encode_decoder_input<S: AsRef<str>>(
        &self,
        sentences: &[S],
    ) -> Result<Encoded, ChatbotError> {
        let mut sequences = Vec::with_capacity(sentences.len());
        let mut lengths   = Vec::with_capacity(sentences.len());

        for sentence in sentences {
            let mut seq = vec![START_INDEX];
            seq.extend(self.indices(sentence.as_ref())?);
            seq.truncate(self.max_len);
            lengths.push(seq.len());
            seq.resize(self.max_len, PAD_INDEX);
            sequences.push(seq);
        }

        Ok((sequences, lengths))
    }

    /// Decoder target: words (+ END, always kept) → pad.
    pub fn encode_target<S: AsRef<str>>(
        &self,
        sentences: &[S],
    ) -> Result<Vec<Vec<usize>>, ChatbotError> {
        let mut sequences = Vec::with_capacity(sentences.len());

        for sentence in sentences {
            let mut seq = self.indices(sentence.as_ref())?;
            if seq.len() >= self.max_len {
                seq.truncate(self.max_len - 1);
            }
            seq.push(END_INDEX);
            seq.resize(self.max_len, PAD_INDEX);
            sequences.push(seq);
        }

        Ok(sequences)
    }

    /// Indices back to text, PAD and END dropped, words space-joined.
    pub fn decode_to_text(&self, indices: &[usize]) -> String {
        decode_to_text(indices, self.vocabulary)
    }

    fn indices(&self, sentence: &str) -> Result<Vec<usize>, ChatbotError> {
        Ok(self
            .preprocessor
            .words(sentence)?
            .iter()
            .map(|w| self.vocabulary.index_of(w))
            .collect())
    }
}

/// Free-standing inverse transform; only needs the vocabulary.
pub fn decode_to_text(indices: &[usize], vocabulary: &Vocabulary) -> String {
    indices
        .iter()
        .filter(|&&idx| idx != PAD_INDEX && idx != END_INDEX)
        .filter_map(|&idx| vocabulary.token(idx))
        .collect::<Vec<_>>()
        .join(" ")
}
