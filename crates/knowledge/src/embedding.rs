//! Text embedding — deterministic hash-bucket vectors.
//!
//! `HashEmbedder` is explicitly a placeholder semantic embedding, not a
//! trained model. Its contract is that it is **total** (never fails) and
//! **deterministic** (same text, same vector), which makes retrieval
//! reproducible and trivially testable.

/// Maps text to a fixed-dimension vector. Implementations must be total
/// and deterministic.
pub trait Embedder: Send + Sync {
    /// The fixed output dimension.
    fn dimension(&self) -> usize;

    /// Embed the text. Never fails; empty input yields the zero vector.
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Deterministic embedder: whitespace tokens are hashed into buckets of a
/// fixed-dimension vector, which is then L2-normalized.
pub struct HashEmbedder {
    dimension: usize,
}

/// Default embedding dimension.
pub const DEFAULT_DIMENSION: usize = 1536;

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl Embedder for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text.to_lowercase().split_whitespace() {
            let index = (token_hash(token).unsigned_abs() as usize) % self.dimension;
            vector[index] += 0.1;
        }

        normalize(&mut vector);
        vector
    }
}

/// Stable 32-bit shift-hash over the token's characters.
fn token_hash(token: &str) -> i32 {
    let mut hash: i32 = 0;
    for ch in token.chars() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(ch as i32);
    }
    hash
}

/// L2-normalize in place. A zero vector stays zero.
fn normalize(vector: &mut [f32]) {
    let magnitude: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for v in vector.iter_mut() {
            *v /= magnitude;
        }
    }
}
