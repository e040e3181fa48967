//! The knowledge index — build-once, query-many retrieval.
//!
//! Chunks and their embeddings are computed at build time and never mutated
//! afterwards, so the index is safe for unsynchronized concurrent reads.

use serde::Serialize;

use crate::corpus::CorpusChunk;
use crate::embedding::Embedder;
use crate::similarity::cosine_similarity;

/// A unit of retrievable knowledge with its precomputed embedding.
#[derive(Debug, Clone)]
pub struct KnowledgeChunk {
    /// The chunk text
    pub content: String,

    /// Where the chunk came from (e.g. a filename)
    pub source_id: String,

    /// Embedding computed once at build time
    pub embedding: Vec<f32>,
}

/// A chunk scored against one query. Request-scoped; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub content: String,
    pub source_id: String,
    pub score: f32,
}

/// Immutable-after-build collection of knowledge chunks.
pub struct KnowledgeIndex {
    chunks: Vec<KnowledgeChunk>,
    embedder: Box<dyn Embedder>,
}

impl KnowledgeIndex {
    /// Build the index: embed every corpus chunk once, amortizing the cost
    /// across all future queries.
    pub fn build(corpus: Vec<CorpusChunk>, embedder: Box<dyn Embedder>) -> Self {
        let chunks: Vec<KnowledgeChunk> = corpus
            .into_iter()
            .map(|chunk| {
                let embedding = embedder.embed(&chunk.content);
                KnowledgeChunk {
                    content: chunk.content,
                    source_id: chunk.source_id,
                    embedding,
                }
            })
            .collect();

        tracing::info!(chunks = chunks.len(), "knowledge index built");
        Self { chunks, embedder }
    }

    /// Top-K chunks by descending cosine similarity to the query text.
    ///
    /// Ties keep corpus order (stable sort). An empty index yields an empty
    /// result, never an error.
    pub fn query(&self, text: &str, top_k: usize) -> Vec<ScoredChunk> {
        if self.chunks.is_empty() {
            return Vec::new();
        }

        let query_embedding = self.embedder.embed(text);

        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                content: chunk.content.clone(),
                source_id: chunk.source_id.clone(),
                score: cosine_similarity(&query_embedding, &chunk.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;

    fn corpus(texts: &[(&str, &str)]) -> Vec<CorpusChunk> {
        texts
            .iter()
            .map(|(content, source)| CorpusChunk {
                content: content.to_string(),
                source_id: source.to_string(),
            })
            .collect()
    }

    fn index(texts: &[(&str, &str)]) -> KnowledgeIndex {
        KnowledgeIndex::build(corpus(texts), Box::new(HashEmbedder::new(256)))
    }

    #[test]
    fn query_ranks_by_similarity() {
        let idx = index(&[
            ("bananas and apples are fruit", "food.md"),
            ("rust compiles to native machine code", "rust.md"),
            ("the rust borrow checker enforces ownership", "rust.md"),
        ]);

        let results = idx.query("rust ownership borrow checker", 3);
        assert_eq!(results.len(), 3);
        assert!(results[0].content.contains("borrow checker"));
        assert!(results[0].score >= results[1].score);
        assert!(results[1].score >= results[2].score);
    }

    #[test]
    fn query_never_exceeds_top_k() {
        let idx = index(&[
            ("first chunk of knowledge", "a.md"),
            ("second chunk of knowledge", "a.md"),
            ("third chunk of knowledge", "b.md"),
        ]);
        assert_eq!(idx.query("knowledge", 2).len(), 2);
    }

    #[test]
    fn query_returns_fewer_when_corpus_is_small() {
        let idx = index(&[("just one chunk here", "a.md")]);
        assert_eq!(idx.query("anything", 5).len(), 1);
    }

    #[test]
    fn empty_corpus_yields_empty_result() {
        let idx = KnowledgeIndex::build(Vec::new(), Box::new(HashEmbedder::new(64)));
        assert!(idx.is_empty());
        assert!(idx.query("anything", 3).is_empty());
    }

    #[test]
    fn ties_keep_corpus_order() {
        // Two identical chunks score identically against any query; the
        // stable sort must keep the earlier corpus entry first.
        let idx = index(&[
            ("identical text", "first.md"),
            ("identical text", "second.md"),
        ]);

        let results = idx.query("identical text", 2);
        assert_eq!(results[0].source_id, "first.md");
        assert_eq!(results[1].source_id, "second.md");
    }

    #[test]
    fn unrelated_query_scores_low() {
        let idx = index(&[("rust compiles to native machine code", "rust.md")]);
        let results = idx.query("zzz qqq xxx", 1);
        assert_eq!(results.len(), 1);
        assert!(results[0].score.abs() < 0.5);
    }

    #[test]
    fn empty_query_scores_zero_everywhere() {
        let idx = index(&[("some indexed content here", "a.md")]);
        let results = idx.query("", 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 0.0);
    }
}
