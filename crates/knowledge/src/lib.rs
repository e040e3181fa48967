//! Knowledge retrieval for Parley.
//!
//! A deliberately small retrieval stack: a deterministic hash-bucket
//! embedder (a placeholder for a trained model — its only contract is
//! determinism and fixed dimensionality), cosine similarity, and an
//! immutable-after-build [`KnowledgeIndex`] answering top-K queries.
//! The index embeds every chunk once at build time, so queries only pay
//! for embedding the query text.

pub mod corpus;
pub mod embedding;
pub mod index;
pub mod similarity;

pub use corpus::{CorpusChunk, load_corpus};
pub use embedding::{Embedder, HashEmbedder};
pub use index::{KnowledgeIndex, ScoredChunk};
pub use similarity::cosine_similarity;
