//! Corpus loading — markdown files segmented into paragraph chunks.
//!
//! Segmentation policy: split each document on blank lines, trim, and
//! discard fragments shorter than the configured floor. When the corpus
//! directory is missing or unreadable the loader falls back to a single
//! synthetic sample chunk so the index can still be built and queried.

use std::path::Path;

/// An already-segmented chunk of raw text tagged with its source.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusChunk {
    pub content: String,
    pub source_id: String,
}

/// Load every `*.md` file under `dir` and segment it into chunks.
///
/// Never fails: an unavailable corpus yields the synthetic sample chunk.
pub fn load_corpus(dir: &Path, min_chunk_chars: usize) -> Vec<CorpusChunk> {
    let mut chunks = Vec::new();

    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut paths: Vec<_> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
                .collect();
            // Deterministic chunk order regardless of directory iteration order.
            paths.sort();

            for path in paths {
                let source_id = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "unknown".into());

                match std::fs::read_to_string(&path) {
                    Ok(content) => {
                        chunks.extend(segment(&content, &source_id, min_chunk_chars));
                    }
                    Err(e) => {
                        tracing::warn!(file = %path.display(), error = %e, "skipping unreadable document");
                    }
                }
            }
        }
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "corpus directory unavailable, using sample chunk");
        }
    }

    if chunks.is_empty() {
        chunks.push(sample_chunk());
    }

    chunks
}

/// Split one document into paragraph chunks.
fn segment(content: &str, source_id: &str, min_chunk_chars: usize) -> Vec<CorpusChunk> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| p.len() > min_chunk_chars)
        .map(|p| CorpusChunk {
            content: p.to_string(),
            source_id: source_id.to_string(),
        })
        .collect()
}

/// Placeholder chunk used when no corpus is available.
fn sample_chunk() -> CorpusChunk {
    CorpusChunk {
        content: "This is sample knowledge about AI agents and their capabilities.".into(),
        source_id: "sample.md".into(),
    }
}
