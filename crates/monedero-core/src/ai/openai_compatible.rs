//! Chat-completions backend
//!
//! Alternative to Gemini for self-hosted or proxied models. Any server that speaks
//! `POST /v1/chat/completions` works; the optional API key is sent as a bearer token.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::types::GenerationRequest;
use super::GenerationBackend;

/// Backend for servers exposing the chat-completions API
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAICompatibleBackend {
    /// Create a backend sharing the given HTTP client
    pub fn new(http_client: Client, base_url: &str, model: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
        }
    }

    /// Send a bearer token with every request
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.api_key {
            Some(ref api_key) => builder.header("Authorization", format!("Bearer {}", api_key)),
            None => builder,
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAICompatibleBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: chat_messages(request),
            temperature: CATEGORIZATION_TEMPERATURE,
            stream: false,
        };

        let response = self
            .authorized(
                self.http_client
                    .post(format!("{}/v1/chat/completions", self.base_url)),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "Chat completion failed with {}: {}",
                status, detail
            )));
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Invalid chat completion body: {}", e)))?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::Upstream("Chat completion returned no text".into()))?;
        debug!(model = %self.model, "Chat completion text: {}", text);
        Ok(text)
    }

    async fn health_check(&self) -> bool {
        // Model listing first, then the bare health route some servers expose instead
        for path in ["/v1/models", "/health"] {
            let probe = self.authorized(self.http_client.get(format!("{}{}", self.base_url, path)));
            match probe.send().await {
                Ok(resp) if resp.status().is_success() => return true,
                Ok(resp) => debug!(path, status = %resp.status(), "Health probe failed"),
                Err(e) => debug!(path, error = %e, "Health probe unreachable"),
            }
        }
        false
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

/// Sampling temperature sent with every completion
const CATEGORIZATION_TEMPERATURE: f32 = 0.1;

fn chat_messages(request: &GenerationRequest) -> Vec<ChatMessage<'_>> {
    let system = request.system.as_deref().map(|content| ChatMessage {
        role: "system",
        content,
    });
    system
        .into_iter()
        .chain(std::iter::once(ChatMessage {
            role: "user",
            content: &request.prompt,
        }))
        .collect()
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockGenerationServer, ServerReply};

    fn backend(url: &str) -> OpenAICompatibleBackend {
        OpenAICompatibleBackend::new(Client::new(), url, "qwen2.5")
    }

    #[test]
    fn test_base_url_without_trailing_slash() {
        let b = backend("http://localhost:8080/");
        assert_eq!(b.host(), "http://localhost:8080");
        assert_eq!(b.model(), "qwen2.5");
        assert!(b.api_key.is_none());
        assert_eq!(b.with_api_key("sk-local").api_key.as_deref(), Some("sk-local"));
    }

    #[test]
    fn test_system_message_goes_first() {
        let request = GenerationRequest::new("Resume mis gastos").with_system("Responde en JSON");
        let body = ChatCompletionRequest {
            model: "qwen2.5",
            messages: chat_messages(&request),
            temperature: CATEGORIZATION_TEMPERATURE,
            stream: false,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "Responde en JSON");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Resume mis gastos");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_user_message_only_without_system() {
        let request = GenerationRequest::new("hola");
        let messages = chat_messages(&request);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
    }

    #[test]
    fn test_null_content_is_accepted_by_the_wire_type() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert!(response.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn test_generate_against_mock_server() {
        let server = MockGenerationServer::start(ServerReply::Text("listo".into())).await;
        let text = backend(&server.url())
            .generate(&GenerationRequest::new("hola").with_system("sé breve"))
            .await
            .unwrap();
        assert_eq!(text, "listo");
    }

    #[tokio::test]
    async fn test_generate_error_status_is_upstream() {
        let server = MockGenerationServer::start(ServerReply::Status(503)).await;
        let err = backend(&server.url())
            .generate(&GenerationRequest::new("hola"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_health_check_against_mock_server() {
        let server = MockGenerationServer::start(ServerReply::Text("ok".into())).await;
        assert!(backend(&server.url()).health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        assert!(!backend("http://127.0.0.1:1").health_check().await);
    }
}
