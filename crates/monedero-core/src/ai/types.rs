//! Generation backend request/response types
//!
//! These types are backend-agnostic and used across all implementations.

use serde::Serialize;

/// A single text generation request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Instructions sent as the system role, when the backend supports one
    pub system: Option<String>,
    /// The user prompt
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Backend description for logging and health output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendInfo {
    pub backend: String,
    pub host: String,
    pub model: String,
}
