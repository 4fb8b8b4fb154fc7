pub mod config;
pub mod engine;
pub mod error;
pub mod prompt;

pub use config::Config;
pub use engine::{Answer, Engine};
pub use error::{BuildError, QueryError};
pub use prompt::PromptProfile;
