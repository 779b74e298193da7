//! Google Gemini backend implementation
//!
//! Talks to the `generateContent` REST API:
//! `POST {host}/v1beta/models/{model}:generateContent`
//!
//! The API key travels in the `x-goog-api-key` header, never in the URL.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::types::GenerationRequest;
use super::GenerationBackend;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini backend
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    /// Create a backend sharing the given HTTP client
    pub fn new(http_client: Client, base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = GenerateContentRequest {
            system_instruction: request.system.as_ref().map(|text| Content {
                role: None,
                parts: vec![Part { text: text.clone() }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
        };

        let response = self
            .http_client
            .post(self.generate_url())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("Gemini API error {}: {}", status, body)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Invalid Gemini response body: {}", e)))?;

        let text = parsed.first_text().ok_or_else(|| {
            Error::Upstream("Gemini response contained no candidate text".into())
        })?;
        debug!(model = %self.model, "Gemini response: {}", text);
        Ok(text)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/v1beta/models", self.base_url))
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

// Gemini wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any is non-empty
    fn first_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockGenerationServer, ServerReply};
    use std::time::Duration;

    fn backend(url: &str) -> GeminiBackend {
        let http = Client::builder()
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        GeminiBackend::new(http, url, "gemini-2.5-flash", "test-key")
    }

    #[test]
    fn test_backend_new_trims_trailing_slash() {
        let b = backend("https://generativelanguage.googleapis.com/");
        assert_eq!(b.host(), "https://generativelanguage.googleapis.com");
        assert_eq!(
            b.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_serialization() {
        let body = GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part { text: "Hola".into() }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hola");
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn test_response_joins_parts() {
        let json = r#"{"candidates": [{"content": {"role": "model", "parts": [
            {"text": "{\"a\":"}, {"text": " 1}"}
        ]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.first_text().unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.first_text().is_none());
    }

    #[tokio::test]
    async fn test_generate_sends_key_and_returns_text() {
        let server = MockGenerationServer::start(ServerReply::Text("respuesta".into())).await;
        let b = backend(&server.url());

        let text = b
            .generate(&GenerationRequest::new("hola").with_system("sistema"))
            .await
            .unwrap();
        assert_eq!(text, "respuesta");
        assert_eq!(server.last_api_key().as_deref(), Some("test-key"));
    }

    #[tokio::test]
    async fn test_generate_error_status_is_upstream() {
        let server = MockGenerationServer::start(ServerReply::Status(500)).await;
        let err = backend(&server.url())
            .generate(&GenerationRequest::new("hola"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_generate_no_candidates_is_upstream() {
        let server = MockGenerationServer::start(ServerReply::NoCandidates).await;
        let err = backend(&server.url())
            .generate(&GenerationRequest::new("hola"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_generate_timeout_is_upstream() {
        let server =
            MockGenerationServer::start(ServerReply::Delay(Duration::from_secs(3))).await;
        let err = backend(&server.url())
            .generate(&GenerationRequest::new("hola"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
        assert!(!err.to_string().contains("test-key"));
    }

    #[tokio::test]
    async fn test_health_check_sends_key_header() {
        let server = MockGenerationServer::start(ServerReply::Text("ok".into())).await;
        assert!(backend(&server.url()).health_check().await);
        assert_eq!(server.last_api_key().as_deref(), Some("test-key"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockGenerationServer::start(ServerReply::Text("ok".into())).await;
        assert!(backend(&server.url()).health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        assert!(!backend("http://127.0.0.1:1").health_check().await);
    }
}
