//! Generation backend configuration
//!
//! Configuration is resolved once (normally at startup) into an `AIConfig` value and
//! handed to `AIClient::from_config`. Backends never read the environment themselves.
//!
//! Environment variables understood by `AIConfig::from_env`:
//! - `AI_BACKEND`: `gemini` (default), `openai_compatible`, or `mock`
//! - `GEMINI_API_KEY`: API key (required for gemini)
//! - `GEMINI_MODEL`: model name (default: gemini-2.5-flash)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)
//! - `OPENAI_COMPATIBLE_HOST`: server URL (required for openai_compatible)
//! - `OPENAI_COMPATIBLE_MODEL`: model name (default: gpt-4o-mini)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required
//! - `MONEDERO_AI_TIMEOUT_SECS`: request timeout in seconds (default: 30)

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENAI_COMPATIBLE_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which generation backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Gemini,
    OpenAICompatible,
    Mock,
}

impl BackendKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                Some(Self::OpenAICompatible)
            }
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAICompatible => "openai_compatible",
            Self::Mock => "mock",
        }
    }
}

/// Resolved generation backend settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AIConfig {
    pub backend: BackendKind,
    /// Base URL; `None` means the backend default (Gemini only)
    pub host: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    /// Bound on a single generation round trip
    pub timeout: Duration,
}

impl AIConfig {
    /// Gemini with the default host and model
    pub fn gemini(api_key: &str) -> Self {
        Self {
            backend: BackendKind::Gemini,
            host: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: Some(api_key.to_string()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn openai_compatible(host: &str, model: &str) -> Self {
        Self {
            backend: BackendKind::OpenAICompatible,
            host: Some(host.to_string()),
            model: model.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn mock() -> Self {
        Self {
            backend: BackendKind::Mock,
            host: None,
            model: "mock".to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let backend = match var("AI_BACKEND") {
            Some(name) => BackendKind::parse(&name).unwrap_or_else(|| {
                warn!(backend = %name, "Unknown AI_BACKEND, falling back to gemini");
                BackendKind::Gemini
            }),
            None => BackendKind::Gemini,
        };

        let timeout_secs = match var("MONEDERO_AI_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                warn!(value = %raw, "Invalid MONEDERO_AI_TIMEOUT_SECS, using default");
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };
        let timeout = Duration::from_secs(timeout_secs);

        match backend {
            BackendKind::Gemini => Self {
                backend,
                host: var("GEMINI_HOST"),
                model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                api_key: var("GEMINI_API_KEY"),
                timeout,
            },
            BackendKind::OpenAICompatible => Self {
                backend,
                host: var("OPENAI_COMPATIBLE_HOST"),
                model: var("OPENAI_COMPATIBLE_MODEL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_COMPATIBLE_MODEL.to_string()),
                api_key: var("OPENAI_COMPATIBLE_API_KEY"),
                timeout,
            },
            BackendKind::Mock => Self::mock().with_timeout(timeout),
        }
    }
}
