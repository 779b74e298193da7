//! Mock backend for testing
//!
//! Returns predictable responses without a running generation service. Tests can
//! script the reply and inspect the last request that was sent.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::taxonomy::CategoryTaxonomy;

use super::types::GenerationRequest;
use super::GenerationBackend;

/// Scripted reply for the mock backend
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text verbatim
    Text(String),
    /// Fail with `Error::Upstream` carrying this message
    Fail(String),
}

/// Mock generation backend
///
/// Without a scripted reply, categorization prompts get the all-zero category
/// object wrapped in a short sentence, and anything else gets a fixed analysis text.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: Option<MockReply>,
    model: String,
    last_request: Arc<Mutex<Option<GenerationRequest>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            reply: None,
            model: "mock".to_string(),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Always answer with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Some(MockReply::Text(text.into())),
            ..Self::new()
        }
    }

    /// Always fail with an upstream error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Some(MockReply::Fail(message.into())),
            ..Self::new()
        }
    }

    /// Create a new instance with a different model name
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// The most recent request seen by this backend (shared across clones)
    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }

    fn default_reply(request: &GenerationRequest) -> String {
        if request.prompt.contains("\"totales\"") {
            format!(
                "Aquí tienes el resultado:\n{}\n",
                CategoryTaxonomy::standard().schema_json()
            )
        } else {
            "Análisis simulado: no hay observaciones relevantes.".to_string()
        }
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request.clone());
        }

        match self.reply {
            Some(MockReply::Text(ref text)) => Ok(text.clone()),
            Some(MockReply::Fail(ref message)) => Err(Error::Upstream(message.clone())),
            None => Ok(Self::default_reply(request)),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
