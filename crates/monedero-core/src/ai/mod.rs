//! Pluggable text generation backend abstraction
//!
//! This module provides a backend-agnostic interface over the large-language-model
//! service used for categorization and free-text analysis.
//!
//! # Architecture
//!
//! - `GenerationBackend` trait: defines the interface for all backends
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = AIConfig::from_env();
//! let client = AIClient::from_config(&config)?;
//! let text = client.generate(&GenerationRequest::new("Hola")).await?;
//! ```

pub mod config;
mod gemini;
mod mock;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use config::{AIConfig, BackendKind};
pub use gemini::GeminiBackend;
pub use mock::{MockBackend, MockReply};
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Error, Result};

/// Trait defining the interface for all generation backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send one prompt and return the model's text
    ///
    /// Fails with `Upstream` on transport errors, timeouts, non-success statuses,
    /// or a response that carries no text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Check if the backend is reachable and accepts our credentials
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete generation client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Google Gemini generateContent API
    Gemini(GeminiBackend),
    /// OpenAI-compatible backend (vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create a client from resolved configuration
    ///
    /// Fails with `NotConfigured` when the selected backend is missing a required
    /// setting (the Gemini API key or the OpenAI-compatible host).
    pub fn from_config(config: &AIConfig) -> Result<Self> {
        match config.backend {
            BackendKind::Gemini => {
                let api_key = config.api_key.as_deref().ok_or_else(|| {
                    Error::NotConfigured("GEMINI_API_KEY is not set".into())
                })?;
                let host = config
                    .host
                    .as_deref()
                    .unwrap_or(config::DEFAULT_GEMINI_HOST);
                let http = http_client(config)?;
                Ok(AIClient::Gemini(GeminiBackend::new(
                    http,
                    host,
                    &config.model,
                    api_key,
                )))
            }
            BackendKind::OpenAICompatible => {
                let host = config.host.as_deref().ok_or_else(|| {
                    Error::NotConfigured("OPENAI_COMPATIBLE_HOST is not set".into())
                })?;
                let http = http_client(config)?;
                let mut backend = OpenAICompatibleBackend::new(http, host, &config.model);
                if let Some(ref key) = config.api_key {
                    backend = backend.with_api_key(key);
                }
                Ok(AIClient::OpenAICompatible(backend))
            }
            BackendKind::Mock => Ok(AIClient::Mock(MockBackend::new())),
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    ///
    /// Used for runtime model override (e.g. `ai-test --model`)
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::Gemini(b) => AIClient::Gemini(b.with_model(model)),
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }

    /// Backend name, host and model
    pub fn info(&self) -> BackendInfo {
        let backend = match self {
            AIClient::Gemini(_) => BackendKind::Gemini,
            AIClient::OpenAICompatible(_) => BackendKind::OpenAICompatible,
            AIClient::Mock(_) => BackendKind::Mock,
        };
        BackendInfo {
            backend: backend.as_str().to_string(),
            host: self.host().to_string(),
            model: self.model().to_string(),
        }
    }
}

fn http_client(config: &AIConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| Error::NotConfigured(format!("Failed to build HTTP client: {}", e)))
}

// Implement GenerationBackend for AIClient by delegating to the inner backend
#[async_trait]
impl GenerationBackend for AIClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.generate(request).await,
            AIClient::OpenAICompatible(b) => b.generate(request).await,
            AIClient::Mock(b) => b.generate(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
