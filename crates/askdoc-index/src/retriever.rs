use std::sync::Arc;

use askdoc_llm::{LlmError, LlmProvider};

use crate::index::{ScoredChunk, VectorIndex};

/// Retrieval configuration.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Number of nearest chunks to return.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetrieveError {
    #[error("query embedding failed: {0}")]
    Embed(#[from] LlmError),
}

/// Embeds a question with the index's provider and returns the top-k chunks.
pub struct Retriever<P: LlmProvider> {
    index: VectorIndex,
    provider: Arc<P>,
    config: RetrievalConfig,
}

impl<P: LlmProvider> Retriever<P> {
    #[must_use]
    pub fn new(index: VectorIndex, provider: Arc<P>, config: RetrievalConfig) -> Self {
        Self {
            index,
            provider,
            config,
        }
    }

    #[must_use]
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Retrieve the chunks nearest to `question`.
    ///
    /// The query is embedded with the same provider that embedded the corpus.
    ///
    /// # Errors
    ///
    /// Returns an error if the query embedding fails.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredChunk>, RetrieveError> {
        let query_vector = self.provider.embed(question).await?;
        let hits = self.index.search(&query_vector, self.config.top_k);
        tracing::debug!(
            question_len = question.len(),
            hits = hits.len(),
            "retrieved context chunks"
        );
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use askdoc_document::{Chunk, DocumentMetadata};
    use askdoc_llm::mock::MockProvider;

    use super::*;

    fn chunk(index: usize, content: &str) -> Chunk {
        Chunk {
            content: content.to_owned(),
            metadata: DocumentMetadata {
                source: "fixture.md".to_owned(),
                content_type: "text/markdown".to_owned(),
            },
            chunk_index: index,
        }
    }

    fn retriever(top_k: usize) -> Retriever<MockProvider> {
        let provider = Arc::new(
            MockProvider::default()
                .with_embedding_rule("falcon", vec![1.0, 0.0, 0.0])
                .with_embedding_rule("swift", vec![0.0, 1.0, 0.0])
                .with_embedding_rule("condor", vec![0.0, 0.0, 1.0]),
        );

        let mut index = VectorIndex::new("mock");
        index
            .insert(chunk(0, "falcon top speed 242"), vec![1.0, 0.0, 0.0])
            .unwrap();
        index
            .insert(chunk(1, "swift cruises at 106"), vec![0.0, 1.0, 0.0])
            .unwrap();
        index
            .insert(chunk(2, "condor soars at 80"), vec![0.0, 0.0, 1.0])
            .unwrap();

        Retriever::new(index, provider, RetrievalConfig { top_k })
    }

    #[tokio::test]
    async fn retrieves_nearest_chunk_first() {
        let r = retriever(3);
        let hits = r.retrieve("how fast is the falcon?").await.unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].chunk.chunk_index, 0);
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn top_k_limits_results() {
        let r = retriever(1);
        let hits = r.retrieve("where is the swift?").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk.chunk_index, 1);
    }

    #[tokio::test]
    async fn embed_failure_propagates() {
        let provider = Arc::new(MockProvider::failing_embed());
        let r = Retriever::new(
            VectorIndex::new("mock"),
            provider,
            RetrievalConfig::default(),
        );
        assert!(r.retrieve("anything").await.is_err());
    }

    #[test]
    fn default_top_k_is_three() {
        assert_eq!(RetrievalConfig::default().top_k, 3);
    }
}
