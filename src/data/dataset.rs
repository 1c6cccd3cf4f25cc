use std::sync::Arc;

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::encoder::SequenceEncoder;
use crate::domain::error::ChatbotError;
use crate::domain::qa_pair::{unzip_pairs, QaPair};

/// One encoded training example, every field `max_len` long.
///   input:  reversed, padded encoder input
///   output: START-prefixed decoder input (teacher forcing)
///   target: END-terminated decoder target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seq2SeqSample {
    pub input:  Vec<usize>,
    pub output: Vec<usize>,
    pub target: Vec<usize>,
}

impl Seq2SeqSample {
    /// Encode a list of pairs; questions feed the encoder,
    /// answers feed the decoder input and target.
    pub fn encode_pairs(
        encoder: &SequenceEncoder<'_>,
        pairs:   &[QaPair],
    ) -> Result<Vec<Self>, ChatbotError> {
        let (questions, answers) = unzip_pairs(pairs);
        let (inputs, _)  = encoder.encode_input(&questions)?;
        let (outputs, _) = encoder.encode_decoder_input(&answers)?;
        let targets      = encoder.encode_target(&answers)?;

        Ok(inputs
            .into_iter()
            .zip(outputs)
            .zip(targets)
            .map(|((input, output), target)| Self { input, output, target })
            .collect())
    }

    /// Inference-shaped sample: real input, placeholder decoder side.
    pub fn for_query(encoder: &SequenceEncoder<'_>, query: &str) -> Result<Self, ChatbotError> {
        let (mut inputs, _)  = encoder.encode_input(&[query])?;
        let (mut outputs, _) = encoder.encode_decoder_input(&[""])?;
        let mut targets      = encoder.encode_target(&[""])?;
        Ok(Self {
            input:  inputs.remove(0),
            output: outputs.remove(0),
            target: targets.remove(0),
        })
    }
}

/// Cloning shares the samples, so a fresh iterator can be
/// built over the same split for every evaluation pass.
#[derive(Clone)]
pub struct Seq2SeqDataset {
    samples: Arc<Vec<Seq2SeqSample>>,
}

impl Seq2SeqDataset {
    pub fn new(samples: Vec<Seq2SeqSample>) -> Self {
        Self { samples: Arc::new(samples) }
    }
}

impl Dataset<Seq2SeqSample> for Seq2SeqDataset {
    fn get(&self, index: usize) -> Option<Seq2SeqSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
