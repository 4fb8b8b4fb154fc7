use std::path::Path;

use askdoc_document::Chunk;
use serde::{Deserialize, Serialize};

use crate::error::IndexError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    chunk: Chunk,
    vector: Vec<f32>,
}

/// A chunk returned from similarity search.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// In-memory vector index over document chunks.
///
/// Built once per run, read-only during question answering. Insertion order
/// is preserved, which keeps equal-score tie-breaking stable across rebuilds
/// from the same source document.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorIndex {
    embedding_model: String,
    entries: Vec<IndexEntry>,
}

const SNAPSHOT_FILE: &str = "index.json";

impl VectorIndex {
    #[must_use]
    pub fn new(embedding_model: impl Into<String>) -> Self {
        Self {
            embedding_model: embedding_model.into(),
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a chunk with its embedding.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DimensionMismatch`] if the vector length differs
    /// from previously inserted entries.
    pub fn insert(&mut self, chunk: Chunk, vector: Vec<f32>) -> Result<(), IndexError> {
        if let Some(first) = self.entries.first()
            && first.vector.len() != vector.len()
        {
            return Err(IndexError::DimensionMismatch {
                expected: first.vector.len(),
                found: vector.len(),
            });
        }
        self.entries.push(IndexEntry { chunk, vector });
        Ok(())
    }

    /// Top-k cosine similarity search.
    ///
    /// Results are ranked by non-increasing score; equal scores are broken by
    /// ascending chunk index.
    #[must_use]
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(query, &e.vector), e))
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.chunk.chunk_index.cmp(&b.1.chunk.chunk_index))
        });
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(score, e)| ScoredChunk {
                chunk: e.chunk.clone(),
                score,
            })
            .collect()
    }

    /// Remove a persisted index directory if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be removed.
    pub fn clean(dir: &Path) -> Result<(), IndexError> {
        if dir.exists() {
            std::fs::remove_dir_all(dir)?;
            tracing::info!(dir = %dir.display(), "previous index cleaned");
        } else {
            tracing::debug!(dir = %dir.display(), "no existing index to clean");
        }
        Ok(())
    }

    /// Write a snapshot of the index into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the snapshot
    /// cannot be written.
    pub fn persist(&self, dir: &Path) -> Result<(), IndexError> {
        std::fs::create_dir_all(dir)?;
        let file = std::fs::File::create(dir.join(SNAPSHOT_FILE))?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)?;
        tracing::info!(dir = %dir.display(), entries = self.entries.len(), "index persisted");
        Ok(())
    }

    /// Load a snapshot from `dir`, verifying it was built with
    /// `embedding_model`.
    ///
    /// Corpus and query vectors must come from the same model for cosine
    /// distances to be comparable.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is missing, unreadable, or was built
    /// with a different embedding model.
    pub fn load(dir: &Path, embedding_model: &str) -> Result<Self, IndexError> {
        let file = std::fs::File::open(dir.join(SNAPSHOT_FILE))?;
        let index: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        if index.embedding_model != embedding_model {
            return Err(IndexError::ModelMismatch {
                built_with: index.embedding_model,
                requested: embedding_model.to_owned(),
            });
        }
        Ok(index)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
