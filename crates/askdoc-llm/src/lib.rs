pub mod error;
pub mod ollama;
pub mod provider;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::LlmError;
pub use ollama::OllamaProvider;
pub use provider::{LlmProvider, Message, Role};
