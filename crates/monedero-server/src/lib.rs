//! Monedero Web Server
//!
//! Axum-based REST API over the Monedero core:
//! - `GET /balance` income, expense and balance of the whole ledger
//! - `POST /analizar_categorias` per-category totals from the generation service
//! - `POST /analizar` free-text answer about the ledger
//! - `GET /health` ledger readability and generation backend reachability
//!
//! Errors are returned as `{"error": "..."}`.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use monedero_core::{
    AIClient, Analyst, CategorizationPipeline, GenerationBackend, LedgerStore, PromptLibrary,
};

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = any origin)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Parse a comma-separated origin list (e.g. `MONEDERO_ALLOWED_ORIGINS`)
    pub fn with_origins(list: &str) -> Self {
        Self {
            allowed_origins: list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Shared application state
///
/// Read-only: the ledger is reloaded from `store` on every request.
pub struct AppState {
    pub store: LedgerStore,
    pub ai: Option<AIClient>,
    pub prompts: PromptLibrary,
}

impl AppState {
    fn ai_client(&self) -> Result<&AIClient, AppError> {
        self.ai.as_ref().ok_or_else(|| {
            AppError::service_unavailable(
                "Generation service not configured (set GEMINI_API_KEY or AI_BACKEND)",
            )
        })
    }

    pub(crate) fn pipeline(&self) -> Result<CategorizationPipeline, AppError> {
        let client = self.ai_client()?;
        Ok(CategorizationPipeline::new(client.clone(), self.prompts.clone()))
    }

    pub(crate) fn analyst(&self) -> Result<Analyst, AppError> {
        let client = self.ai_client()?;
        Ok(Analyst::new(client.clone(), self.prompts.clone()))
    }
}

/// Create the application router
pub fn create_router(
    store: LedgerStore,
    ai: Option<AIClient>,
    prompts: PromptLibrary,
    config: ServerConfig,
) -> Router {
    match ai {
        Some(ref client) => {
            let backend = client.info();
            info!(
                "Generation backend configured: {} at {} (model: {})",
                backend.backend, backend.host, backend.model
            );
        }
        None => info!("Generation backend not configured (AI endpoints will return 503)"),
    }

    let state = Arc::new(AppState { store, ai, prompts });

    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .route("/balance", get(handlers::get_balance))
        .route("/analizar_categorias", post(handlers::categorize))
        .route("/analizar", post(handlers::analyze))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(
    store: LedgerStore,
    ai: Option<AIClient>,
    prompts: PromptLibrary,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    serve_with_config(store, ai, prompts, host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    store: LedgerStore,
    ai: Option<AIClient>,
    prompts: PromptLibrary,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !store.path().exists() {
        warn!(
            "Ledger file {} does not exist yet (GET /balance will return 404)",
            store.path().display()
        );
    }

    check_ai_connection(ai.as_ref()).await;

    let app = create_router(store, ai, prompts, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log generation backend connection status
async fn check_ai_connection(ai: Option<&AIClient>) {
    match ai {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "Generation backend connected: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "Generation backend configured but not responding: {} (model: {})",
                    client.host(),
                    client.model()
                );
            }
        }
        None => {
            info!("Generation backend not configured (set GEMINI_API_KEY to enable AI features)");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Error returned by handlers, rendered as `{"error": message}`
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn service_unavailable(msg: &str) -> Self {
        Self::with_status(StatusCode::SERVICE_UNAVAILABLE, msg)
    }

    /// Map a ledger store failure
    ///
    /// `NotFound` is 404, `Parse`/`Validation` are 400, anything else is an
    /// internal error with a generic message.
    pub fn ledger(err: monedero_core::Error) -> Self {
        use monedero_core::Error;
        match err {
            Error::NotFound(_) => Self::not_found(&err.to_string()),
            Error::Parse(_) | Error::Validation(_) => Self::bad_request(&err.to_string()),
            other => other.into(),
        }
    }

    /// Map a categorization or analysis failure
    ///
    /// Generation failures are reported to the client with their message.
    pub fn generation(err: monedero_core::Error) -> Self {
        use monedero_core::Error;
        match err {
            Error::NotFound(_) => Self::not_found(&err.to_string()),
            Error::NotConfigured(_) => Self::service_unavailable(&err.to_string()),
            other => {
                warn!(error = %other, "Generation request failed");
                Self::internal(&other.to_string())
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(ref err) = self.internal {
            error!(error = %err, status = %self.status, "Request failed");
        }

        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        // Details stay in the log; the client gets a generic message
        Self {
            internal: Some(err.into()),
            ..Self::internal("An internal error occurred")
        }
    }
}
