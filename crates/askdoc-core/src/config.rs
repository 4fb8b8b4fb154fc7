use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::prompt::PromptProfile;

/// Complete configuration record: every knob is a named field with a
/// documented default. Loaded from TOML with `ASKDOC_*` env overrides.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub document: DocumentConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DocumentConfig {
    /// Source Markdown/text file. Must exist at startup.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    500
}

fn default_chunk_overlap() -> usize {
    50
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Decoding temperature; 0 for reproducible answers.
    #[serde(default)]
    pub temperature: f32,
}

fn default_base_url() -> String {
    "http://localhost:11434".into()
}

fn default_model() -> String {
    "phi3".into()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Snapshot directory. When set, any existing directory is deleted at
    /// startup and the index is rebuilt from scratch, then persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub profile: PromptProfile,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8080
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).context("failed to read config file")?;
        let mut config = toml::from_str::<Self>(&content).context("failed to parse config file")?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ASKDOC_DOCUMENT_PATH") {
            self.document.path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("ASKDOC_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("ASKDOC_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("ASKDOC_LLM_EMBEDDING_MODEL") {
            self.llm.embedding_model = v;
        }
        if let Ok(v) = std::env::var("ASKDOC_RETRIEVAL_TOP_K")
            && let Ok(k) = v.parse::<usize>()
        {
            self.retrieval.top_k = k;
        }
        if let Ok(v) = std::env::var("ASKDOC_INDEX_DIR") {
            self.index.dir = Some(PathBuf::from(v));
        }
    }

    /// Check cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated invariant.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.chunking.chunk_size > 0, "chunk_size must be positive");
        anyhow::ensure!(
            self.chunking.chunk_overlap < self.chunking.chunk_size,
            "chunk_overlap must be smaller than chunk_size"
        );
        anyhow::ensure!(self.retrieval.top_k > 0, "top_k must be positive");
        anyhow::ensure!(
            (0.0..=2.0).contains(&self.llm.temperature),
            "temperature must be within 0.0..=2.0"
        );
        Ok(())
    }
}
