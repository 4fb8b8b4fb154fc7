//! Test-only mock LLM provider.

use std::sync::{Arc, Mutex};

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message};

/// Scripted provider for tests: canned chat responses and deterministic
/// embeddings.
///
/// Embeddings are resolved by substring rules first, so a test can steer a
/// chunk and a related question to the same region of the vector space; any
/// other text falls back to a letter-frequency vector derived from the text
/// itself, which is stable across calls and rebuilds.
#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    pub default_response: String,
    embedding_rules: Vec<(String, Vec<f32>)>,
    pub fail_chat: bool,
    pub fail_embed: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            embedding_rules: Vec::new(),
            fail_chat: false,
            fail_embed: false,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_chat: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing_embed() -> Self {
        Self {
            fail_embed: true,
            ..Self::default()
        }
    }

    /// Texts containing `needle` embed to `vector`. Rules are checked in
    /// insertion order before the derived fallback.
    #[must_use]
    pub fn with_embedding_rule(mut self, needle: impl Into<String>, vector: Vec<f32>) -> Self {
        self.embedding_rules.push((needle.into(), vector));
        self
    }
}

/// Letter-frequency embedding: 26 dims of lowercase letter counts plus one
/// length dim, L2-normalized.
#[must_use]
pub fn derived_embedding(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; 27];
    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            let idx = (c.to_ascii_lowercase() as u8 - b'a') as usize;
            v[idx] += 1.0;
        }
    }
    #[allow(clippy::cast_precision_loss)]
    {
        v[26] = text.len() as f32;
    }
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

impl LlmProvider for MockProvider {
    async fn chat(&self, _messages: &[Message]) -> Result<String, LlmError> {
        if self.fail_chat {
            return Err(LlmError::Other("mock LLM error".into()));
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        if self.fail_embed {
            return Err(LlmError::Other("mock embed error".into()));
        }
        for (needle, vector) in &self.embedding_rules {
            if text.contains(needle.as_str()) {
                return Ok(vector.clone());
            }
        }
        Ok(derived_embedding(text))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
