//! Test utilities for monedero-core
//!
//! Provides a mock generation server speaking both the Gemini `generateContent` API
//! and the OpenAI chat completions API, for exercising the real HTTP backends.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::sync::oneshot;

/// How the mock server answers generation requests
#[derive(Debug, Clone)]
pub enum ServerReply {
    /// Answer with this model text
    Text(String),
    /// Answer every request with this HTTP status
    Status(u16),
    /// Successful response that carries no candidates/choices
    NoCandidates,
    /// Wait this long before answering (for timeout tests)
    Delay(Duration),
}

#[derive(Clone)]
struct MockState {
    reply: ServerReply,
    last_api_key: Arc<Mutex<Option<String>>>,
}

impl MockState {
    fn record_api_key(&self, headers: &HeaderMap) {
        let key = headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *self.last_api_key.lock().unwrap() = key;
    }
}

/// Mock generation server for testing and development
pub struct MockGenerationServer {
    addr: SocketAddr,
    last_api_key: Arc<Mutex<Option<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGenerationServer {
    /// Start the mock server on an available port
    pub async fn start(reply: ServerReply) -> Self {
        let last_api_key = Arc::new(Mutex::new(None));
        let state = MockState {
            reply,
            last_api_key: last_api_key.clone(),
        };

        let app = Router::new()
            .route("/v1beta/models", get(handle_gemini_models))
            .route("/v1beta/models/:model", post(handle_gemini_generate))
            .route("/v1/models", get(handle_openai_models))
            .route("/v1/chat/completions", post(handle_chat_completions))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            last_api_key,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The `x-goog-api-key` header of the most recent Gemini request
    pub fn last_api_key(&self) -> Option<String> {
        self.last_api_key.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGenerationServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Resolve the scripted reply into model text, or an early error response
async fn scripted_text(reply: &ServerReply) -> Result<Option<String>, Response> {
    match reply {
        ServerReply::Text(text) => Ok(Some(text.clone())),
        ServerReply::Status(code) => {
            let status = StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Err((status, Json(json!({"error": {"message": "mock failure"}}))).into_response())
        }
        ServerReply::NoCandidates => Ok(None),
        ServerReply::Delay(delay) => {
            tokio::time::sleep(*delay).await;
            Ok(Some("respuesta tardía".to_string()))
        }
    }
}

async fn handle_gemini_models(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Response {
    state.record_api_key(&headers);
    match state.reply {
        ServerReply::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        _ => Json(json!({"models": [{"name": "models/gemini-2.5-flash"}]})).into_response(),
    }
}

async fn handle_gemini_generate(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Response {
    state.record_api_key(&headers);
    match scripted_text(&state.reply).await {
        Ok(Some(text)) => Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
        Ok(None) => Json(json!({"candidates": []})).into_response(),
        Err(response) => response,
    }
}

async fn handle_openai_models(State(state): State<MockState>) -> Response {
    match state.reply {
        ServerReply::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        _ => Json(json!({"object": "list", "data": [{"id": "llama3.2"}]})).into_response(),
    }
}

async fn handle_chat_completions(State(state): State<MockState>) -> Response {
    match scripted_text(&state.reply).await {
        Ok(Some(text)) => Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        Ok(None) => Json(json!({"choices": []})).into_response(),
        Err(response) => response,
    }
}
