#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("source file not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file too large: {0} bytes")]
    FileTooLarge(u64),
}
