// ============================================================
// Layer 5 — Side Embeddings
// ============================================================
// Each side of the network (encoder, decoder) owns its own
// [vocabulary_length, d] lookup table. Two flavours:
//
//   trainable = true  → dense [V, embedding_size] matrix,
//                       Xavier/Glorot-initialised, updated by
//                       the optimiser
//   trainable = false → identity [V, V] matrix, i.e. one-hot
//                       encoding; excluded from gradients so
//                       Adam never touches it
//
// Both return a plain burn Embedding, so lookup is the usual
// Embedding::forward: [batch, seq] indices → [batch, seq, d],
// batch and position order preserved.

use burn::{
    module::Param,
    nn::{Embedding, EmbeddingConfig, Initializer},
    prelude::*,
    tensor::TensorData,
};

#[derive(Config, Debug)]
pub struct SideEmbeddingConfig {
    pub vocabulary_length: usize,
    pub embedding_size:    usize,
    #[config(default = true)]
    pub trainable: bool,
}

impl SideEmbeddingConfig {
    /// Width of the vectors this embedding produces
    pub fn output_size(&self) -> usize {
        if self.trainable {
            self.embedding_size
        } else {
            self.vocabulary_length
        }
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Embedding<B> {
        let (v, e) = (self.vocabulary_length, self.embedding_size);

        if self.trainable {
            // Xavier needs explicit fans; EmbeddingConfig's own init path has none
            let mut embedding = EmbeddingConfig::new(v, e).init(device);
            embedding.weight =
                Initializer::XavierUniform { gain: 1.0 }.init_with([v, e], Some(v), Some(e), device);
            return embedding;
        }

        let mut embedding =
            EmbeddingConfig::new(self.vocabulary_length, self.vocabulary_length).init(device);
        embedding.weight = Param::from_tensor(identity_matrix::<B>(self.vocabulary_length, device));
        embedding.no_grad()
    }
}

/// [n, n] identity matrix
pub fn identity_matrix<B: Backend>(n: usize, device: &B::Device) -> Tensor<B, 2> {
    let mut values = vec![0.0f32; n * n];
    for i in 0..n {
        values[i * n + i] = 1.0;
    }
    Tensor::from_data(TensorData::new(values, [n, n]), device)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = NdArray;

    #[test]
    fn test_dense_shape() {
        let device = Default::default();
        let emb = SideEmbeddingConfig::new(10, 4).init::<TestBackend>(&device);
        assert_eq!(emb.weight.val().dims(), [10, 4]);
    }

    #[test]
    fn test_dense_lookup_and_xavier_bound() {
        let device = Default::default();
        let emb = SideEmbeddingConfig::new(10, 4).init::<TestBackend>(&device);

        let ids = Tensor::<TestBackend, 2, Int>::zeros([1, 2], &device);
        assert_eq!(emb.forward(ids).dims(), [1, 2, 4]);

        // uniform in ±sqrt(6 / (fan_in + fan_out))
        let bound = (6.0f32 / 14.0).sqrt();
        let values: Vec<f32> = emb.weight.val().into_data().to_vec().unwrap();
        assert!(values.iter().all(|w| w.abs() <= bound));
        assert!(values.iter().any(|w| *w != 0.0));
    }

    #[test]
    fn test_identity_lookup_is_one_hot() {
        let device = Default::default();
        let cfg = SideEmbeddingConfig::new(5, 99).with_trainable(false);
        assert_eq!(cfg.output_size(), 5);

        let emb = cfg.init::<TestBackend>(&device);
        let ids = Tensor::<TestBackend, 1, Int>::from_ints([3, 0, 4].as_slice(), &device)
            .reshape([1, 3]);
        let out = emb.forward(ids);
        assert_eq!(out.dims(), [1, 3, 5]);

        let values: Vec<f32> = out.into_data().to_vec().unwrap();
        let expected = [
            0.0, 0.0, 0.0, 1.0, 0.0,
            1.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 1.0,
        ];
        assert_eq!(values, expected);
    }

    #[test]
    fn test_only_dense_tracks_gradients() {
        let device = Default::default();
        let dense = SideEmbeddingConfig::new(6, 3).init::<Autodiff<TestBackend>>(&device);
        let fixed = SideEmbeddingConfig::new(6, 3)
            .with_trainable(false)
            .init::<Autodiff<TestBackend>>(&device);

        assert!(dense.weight.val().is_require_grad());
        assert!(!fixed.weight.val().is_require_grad());
    }
}
