#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("embedding model mismatch: index built with {built_with}, loading for {requested}")]
    ModelMismatch {
        built_with: String,
        requested: String,
    },

    #[error("vector dimension mismatch: index holds {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
}
