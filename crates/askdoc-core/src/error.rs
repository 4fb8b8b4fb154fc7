use askdoc_document::DocumentError;
use askdoc_index::{IndexError, RetrieveError};
use askdoc_llm::LlmError;

/// Fatal startup failure: the pipeline never becomes ready.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    #[error("corpus embedding failed: {0}")]
    Embed(#[from] LlmError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),
}

/// Failure while answering a single question. The session continues; the
/// caller decides how to display it.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("retrieval failed: {0}")]
    Retrieve(#[from] RetrieveError),

    #[error("generation failed: {0}")]
    Generate(#[source] LlmError),
}
