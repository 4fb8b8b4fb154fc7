use ollama_rs::Ollama;
use ollama_rs::generation::chat::ChatMessage;
use ollama_rs::generation::chat::request::ChatMessageRequest;
use ollama_rs::generation::embeddings::request::{EmbeddingsInput, GenerateEmbeddingsRequest};
use ollama_rs::models::ModelOptions;

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message, Role};

/// Ollama-backed provider for generation and embeddings.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Ollama,
    model: String,
    embedding_model: String,
    temperature: f32,
}

impl OllamaProvider {
    #[must_use]
    pub fn new(base_url: &str, model: String, embedding_model: String) -> Self {
        let (host, port) = parse_host_port(base_url);
        Self {
            client: Ollama::new(host, port),
            model,
            embedding_model,
            temperature: 0.0,
        }
    }

    /// Decoding temperature for generation. Defaults to 0 for deterministic
    /// decoding where the backend supports it.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Check if Ollama is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection to Ollama fails.
    pub async fn health_check(&self) -> Result<(), LlmError> {
        self.client.list_local_models().await.map_err(|e| {
            LlmError::Other(format!("failed to connect to Ollama (is it running?): {e}"))
        })?;
        Ok(())
    }
}

impl LlmProvider for OllamaProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        tracing::debug!(model = %self.model, count = messages.len(), "sending chat request");
        let ollama_messages: Vec<ChatMessage> = messages.iter().map(convert_message).collect();

        let request = ChatMessageRequest::new(self.model.clone(), ollama_messages)
            .options(ModelOptions::default().temperature(self.temperature));

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| LlmError::Other(format!("Ollama chat request failed: {e}")))?;

        Ok(response.message.content)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let request = GenerateEmbeddingsRequest::new(
            self.embedding_model.clone(),
            EmbeddingsInput::from(text),
        );

        let response = self
            .client
            .generate_embeddings(request)
            .await
            .map_err(|e| LlmError::Other(format!("Ollama embedding request failed: {e}")))?;

        response
            .embeddings
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse { provider: "ollama" })
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

fn convert_message(msg: &Message) -> ChatMessage {
    match msg.role {
        Role::System => ChatMessage::system(msg.content.clone()),
        Role::Assistant => ChatMessage::assistant(msg.content.clone()),
        Role::User => ChatMessage::user(msg.content.clone()),
    }
}

fn parse_host_port(url: &str) -> (String, u16) {
    let url = url.trim_end_matches('/');
    if let Some(colon_pos) = url.rfind(':') {
        let port_str = &url[colon_pos + 1..];
        if let Ok(port) = port_str.parse::<u16>() {
            let host = url[..colon_pos].to_string();
            return (host, port);
        }
    }
    (url.to_string(), 11434)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_host_port_with_port() {
        let (host, port) = parse_host_port("http://localhost:11434");
        assert_eq!(host, "http://localhost");
        assert_eq!(port, 11434);
    }

    #[test]
    fn parse_host_port_without_port() {
        let (host, port) = parse_host_port("http://localhost");
        assert_eq!(host, "http://localhost");
        assert_eq!(port, 11434);
    }

    #[test]
    fn parse_host_port_trailing_slash() {
        let (host, port) = parse_host_port("http://localhost:11434/");
        assert_eq!(host, "http://localhost");
        assert_eq!(port, 11434);
    }

    #[test]
    fn parse_host_port_invalid_port_falls_back() {
        let (host, port) = parse_host_port("http://localhost:notaport");
        assert_eq!(host, "http://localhost:notaport");
        assert_eq!(port, 11434);
    }

    #[test]
    fn parse_host_port_custom_port() {
        let (host, port) = parse_host_port("http://192.168.1.1:8080");
        assert_eq!(host, "http://192.168.1.1");
        assert_eq!(port, 8080);
    }

    #[test]
    fn temperature_defaults_to_zero() {
        let provider = OllamaProvider::new("http://localhost:11434", "phi3".into(), "nomic".into());
        assert!((provider.temperature - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn with_temperature_overrides() {
        let provider = OllamaProvider::new("http://localhost:11434", "phi3".into(), "nomic".into())
            .with_temperature(0.7);
        assert!((provider.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn convert_message_roles() {
        let cm = convert_message(&Message::user("hello"));
        assert_eq!(cm.content, "hello");
        let cm = convert_message(&Message::system("sys"));
        assert_eq!(cm.content, "sys");
    }

    #[test]
    fn name_returns_ollama() {
        let provider = OllamaProvider::new("http://localhost:11434", "phi3".into(), "nomic".into());
        assert_eq!(provider.name(), "ollama");
    }

    #[tokio::test]
    async fn chat_with_unreachable_endpoint_errors() {
        let provider = OllamaProvider::new("http://127.0.0.1:1", "phi3".into(), "nomic".into());
        let result = provider.chat(&[Message::user("hello")]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn embed_with_unreachable_endpoint_errors() {
        let provider = OllamaProvider::new("http://127.0.0.1:1", "phi3".into(), "nomic".into());
        let result = provider.embed("test text").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn health_check_unreachable_errors() {
        let provider = OllamaProvider::new("http://127.0.0.1:1", "phi3".into(), "nomic".into());
        let result = provider.health_check().await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Ollama"));
    }

    #[tokio::test]
    #[ignore = "requires running Ollama instance"]
    async fn integration_ollama_embed() {
        let provider = OllamaProvider::new(
            "http://localhost:11434",
            "phi3".into(),
            "nomic-embed-text".into(),
        );

        let embedding = provider.embed("hello world").await.unwrap();
        assert!(!embedding.is_empty());
        assert!(embedding.iter().all(|v| v.is_finite()));
    }

    #[tokio::test]
    #[ignore = "requires running Ollama instance; determinism is backend-dependent"]
    async fn integration_temperature_zero_is_deterministic() {
        let provider = OllamaProvider::new(
            "http://localhost:11434",
            "phi3".into(),
            "nomic-embed-text".into(),
        );

        let messages = [Message::user("Reply with exactly one word: pong")];
        let first = provider.chat(&messages).await.unwrap();
        let second = provider.chat(&messages).await.unwrap();
        assert_eq!(first, second);
    }
}
