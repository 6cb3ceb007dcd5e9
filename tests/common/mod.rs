#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use paywebhook::application::processor::WebhookProcessor;
use paywebhook::config::WebhookConfig;
use paywebhook::domain::ports::Dispatcher;
use paywebhook::domain::transaction::TransactionPayload;
use paywebhook::infrastructure::in_memory::InMemoryLedger;
use paywebhook::interfaces::http::{AppState, TOKEN_HEADER, create_router};
use reqwest::Url;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

pub const TOKEN: &str = "meu-token-secreto";

pub fn valid_payload() -> Value {
    json!({
        "event": "payment_success",
        "transaction_id": "abc123",
        "amount": "49.90",
        "currency": "BRL",
        "timestamp": "2023-10-01T12:00:00Z"
    })
}

pub fn payload_with_id(id: &str) -> Value {
    let mut payload = valid_payload();
    payload["transaction_id"] = json!(id);
    payload
}

/// Dispatcher that records every call and answers confirms with a fixed result.
#[derive(Clone)]
pub struct RecordingDispatcher {
    pub confirm_result: bool,
    pub confirmed: Arc<Mutex<Vec<Value>>>,
    pub cancelled: Arc<Mutex<Vec<Value>>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::with_confirm_result(true)
    }

    pub fn with_confirm_result(confirm_result: bool) -> Self {
        Self {
            confirm_result,
            confirmed: Arc::default(),
            cancelled: Arc::default(),
        }
    }

    pub fn confirmed(&self) -> Vec<Value> {
        self.confirmed.lock().unwrap().clone()
    }

    pub fn cancelled(&self) -> Vec<Value> {
        self.cancelled.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    async fn confirm(&self, payload: &TransactionPayload) -> bool {
        let value = serde_json::to_value(payload).unwrap();
        self.confirmed.lock().unwrap().push(value);
        self.confirm_result
    }

    async fn cancel(&self, payload: &TransactionPayload) -> bool {
        let value = serde_json::to_value(payload).unwrap();
        self.cancelled.lock().unwrap().push(value);
        true
    }
}

pub fn processor_with(dispatcher: RecordingDispatcher) -> WebhookProcessor {
    WebhookProcessor::new(
        TOKEN,
        WebhookConfig::default().validator(),
        Box::new(InMemoryLedger::new()),
        Box::new(dispatcher),
    )
}

pub fn router_with(dispatcher: RecordingDispatcher) -> Router {
    create_router(AppState::new(processor_with(dispatcher)))
}

/// Sends a POST /webhook through the router and returns (status, json body).
pub async fn post_webhook(router: &Router, token: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header(TOKEN_HEADER, token);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    send(router, req).await
}

pub async fn get_health(router: &Router) -> (StatusCode, Value) {
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    send(router, req).await
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// What the simulated downstream has received.
#[derive(Clone)]
pub struct DownstreamState {
    pub status: StatusCode,
    pub delay: Duration,
    pub confirmations: Arc<Mutex<Vec<Value>>>,
    pub cancellations: Arc<Mutex<Vec<Value>>>,
}

/// Simulated confirm/cancel destination served on an ephemeral port.
pub struct Downstream {
    pub addr: SocketAddr,
    pub state: DownstreamState,
}

impl Downstream {
    pub async fn start() -> Self {
        Self::start_with(StatusCode::OK, Duration::ZERO).await
    }

    pub async fn start_with(status: StatusCode, delay: Duration) -> Self {
        let state = DownstreamState {
            status,
            delay,
            confirmations: Arc::default(),
            cancellations: Arc::default(),
        };
        let router = Router::new()
            .route("/confirmar", post(confirm))
            .route("/cancelar", post(cancel))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn confirmation_url(&self) -> Url {
        Url::parse(&format!("http://{}/confirmar", self.addr)).unwrap()
    }

    pub fn cancellation_url(&self) -> Url {
        Url::parse(&format!("http://{}/cancelar", self.addr)).unwrap()
    }

    pub fn confirmations(&self) -> Vec<Value> {
        self.state.confirmations.lock().unwrap().clone()
    }

    pub fn cancellations(&self) -> Vec<Value> {
        self.state.cancellations.lock().unwrap().clone()
    }
}

async fn confirm(State(state): State<DownstreamState>, Json(body): Json<Value>) -> StatusCode {
    tokio::time::sleep(state.delay).await;
    state.confirmations.lock().unwrap().push(body);
    state.status
}

async fn cancel(State(state): State<DownstreamState>, Json(body): Json<Value>) -> StatusCode {
    tokio::time::sleep(state.delay).await;
    state.cancellations.lock().unwrap().push(body);
    state.status
}

/// An address nothing is listening on.
pub async fn unreachable_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/confirmar")).unwrap()
}
