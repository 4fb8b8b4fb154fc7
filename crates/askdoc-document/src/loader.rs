use std::path::Path;

use crate::{DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentMetadata};

/// Reads a single text or Markdown file into a [`Document`].
pub struct TextLoader {
    pub max_file_size: u64,
}

impl Default for TextLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl TextLoader {
    /// Load the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the file does not exist,
    /// [`DocumentError::FileTooLarge`] if it exceeds `max_file_size`, or an
    /// IO error if it cannot be read.
    pub async fn load(&self, path: &Path) -> Result<Document, DocumentError> {
        if !path.exists() {
            return Err(DocumentError::NotFound(path.display().to_string()));
        }
        let path = std::fs::canonicalize(path)?;

        let meta = tokio::fs::metadata(&path).await?;
        if meta.len() > self.max_file_size {
            return Err(DocumentError::FileTooLarge(meta.len()));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let content_type = match ext {
            "md" | "markdown" => "text/markdown",
            _ => "text/plain",
        };

        let content = tokio::fs::read_to_string(&path).await?;
        tracing::debug!(source = %path.display(), bytes = content.len(), "loaded document");

        Ok(Document {
            content,
            metadata: DocumentMetadata {
                source: path.display().to_string(),
                content_type: content_type.to_owned(),
            },
        })
    }
}
