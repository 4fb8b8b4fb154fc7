use std::sync::Arc;

use askdoc_document::{RecursiveSplitter, SplitterConfig, TextLoader};
use askdoc_index::{RetrievalConfig, Retriever, VectorIndex};
use askdoc_llm::{LlmProvider, Message};

use crate::config::Config;
use crate::error::{BuildError, QueryError};
use crate::prompt::PromptProfile;

/// A generated answer plus the source labels of the chunks it was
/// conditioned on, in retrieval rank order.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<String>,
}

/// The application context: one instance per process, built at startup and
/// passed by reference to whichever surface handles questions.
pub struct Engine<P: LlmProvider> {
    provider: Arc<P>,
    retriever: Retriever<P>,
    profile: PromptProfile,
}

impl<P: LlmProvider> Engine<P> {
    /// Run the indexing phase: load the document, split it, embed every
    /// chunk, and build the similarity index.
    ///
    /// When `config.index.dir` is set, any existing snapshot directory is
    /// deleted first and the fresh index is persisted there; the index is
    /// never updated incrementally.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the document is missing or unreadable,
    /// an embedding request fails, or the snapshot cannot be written.
    pub async fn build(config: &Config, provider: Arc<P>) -> Result<Self, BuildError> {
        if let Some(dir) = &config.index.dir {
            VectorIndex::clean(dir)?;
        }

        let loader = TextLoader::default();
        let document = loader.load(&config.document.path).await?;

        let splitter = RecursiveSplitter::new(SplitterConfig {
            chunk_size: config.chunking.chunk_size,
            chunk_overlap: config.chunking.chunk_overlap,
            ..SplitterConfig::default()
        });
        let chunks = splitter.split(&document);
        tracing::info!(
            source = %document.metadata.source,
            chunks = chunks.len(),
            "document split"
        );

        let mut index = VectorIndex::new(&config.llm.embedding_model);
        for chunk in chunks {
            let vector = provider.embed(&chunk.content).await?;
            index.insert(chunk, vector)?;
        }
        tracing::info!(entries = index.len(), "index built");

        if let Some(dir) = &config.index.dir {
            index.persist(dir)?;
        }

        let retriever = Retriever::new(
            index,
            Arc::clone(&provider),
            RetrievalConfig {
                top_k: config.retrieval.top_k,
            },
        );

        Ok(Self {
            provider,
            retriever,
            profile: config.prompt.profile,
        })
    }

    #[must_use]
    pub fn index_len(&self) -> usize {
        self.retriever.index().len()
    }

    /// Answer one question: retrieve context, assemble the prompt, generate.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] if retrieval or generation fails; the engine
    /// stays usable for the next question.
    pub async fn answer(&self, question: &str) -> Result<Answer, QueryError> {
        let hits = self.retriever.retrieve(question).await?;

        let context: Vec<String> = hits.iter().map(|h| h.chunk.content.clone()).collect();
        let prompt = self.profile.assemble(&context, question);

        let text = self
            .provider
            .chat(&[Message::user(prompt)])
            .await
            .map_err(QueryError::Generate)?;

        let sources = hits
            .into_iter()
            .map(|h| h.chunk.metadata.source)
            .collect();

        Ok(Answer { text, sources })
    }
}
