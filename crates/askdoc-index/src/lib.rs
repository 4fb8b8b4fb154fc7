pub mod error;
pub mod index;
pub mod retriever;

pub use error::IndexError;
pub use index::{ScoredChunk, VectorIndex};
pub use retriever::{RetrievalConfig, RetrieveError, Retriever};
