//! # HTTP API
//!
//! Builds the axum router for the webhook intake service.
//!
//! | Method | Path       | Description                                   |
//! |--------|------------|-----------------------------------------------|
//! | POST   | `/webhook` | Inbound payment event, `X-Webhook-Token` auth |
//! | GET    | `/health`  | Liveness and processed transaction count      |

use crate::application::outcome::WebhookOutcome;
use crate::application::processor::WebhookProcessor;
use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http_body_util::LengthLimitError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Header carrying the shared secret.
pub const TOKEN_HEADER: &str = "x-webhook-token";

/// Default cap on a `/webhook` body.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Shared state for all handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<WebhookProcessor>,
    pub body_limit: usize,
}

impl AppState {
    pub fn new(processor: WebhookProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }
}

/// Body of every `/webhook` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// `"success"` or `"error"`.
    pub status: String,
    pub message: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub processed_transactions: usize,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST /webhook`
///
/// The token is checked before the body is read, so the size cap never
/// masks an authentication failure. Processing runs in its own task: a
/// caller hanging up cannot interrupt a record-then-confirm sequence
/// halfway, and a panic becomes a 500.
async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    if !state.processor.authenticate(token.as_deref()) {
        tracing::warn!(token_present = token.is_some(), "rejected webhook: bad token");
        return outcome_response(&WebhookOutcome::Unauthorized);
    }

    let body = match axum::body::to_bytes(body, state.body_limit).await {
        Ok(body) => body,
        Err(e) if exceeds_limit(&e) => {
            tracing::warn!(limit = state.body_limit, "rejected webhook: body too large");
            return outcome_response(&WebhookOutcome::BodyTooLarge);
        }
        Err(e) => {
            tracing::warn!(error = %e, "rejected webhook: unreadable body");
            return outcome_response(&WebhookOutcome::Malformed);
        }
    };

    let processor = Arc::clone(&state.processor);
    let outcome = match tokio::spawn(async move { processor.handle(token.as_deref(), &body).await })
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "webhook task failed");
            WebhookOutcome::InternalFault("request processing aborted".to_string())
        }
    };

    outcome_response(&outcome)
}

/// `GET /health`
async fn health_handler(State(state): State<AppState>) -> Response {
    match state.processor.processed_count().await {
        Ok(count) => Json(HealthResponse {
            status: "healthy".to_string(),
            processed_transactions: count,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "health check could not read the ledger");
            outcome_response(&WebhookOutcome::InternalFault(e.to_string()))
        }
    }
}

fn exceeds_limit(error: &axum::Error) -> bool {
    std::iter::successors(Some(error as &(dyn Error + 'static)), |e| (*e).source())
        .any(|e| e.is::<LengthLimitError>())
}

fn outcome_response(outcome: &WebhookOutcome) -> Response {
    let status =
        StatusCode::from_u16(outcome.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = WebhookResponse {
        status: if outcome.is_success() { "success" } else { "error" }.to_string(),
        message: outcome.message(),
    };
    (status, Json(body)).into_response()
}
