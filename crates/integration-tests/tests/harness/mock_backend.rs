//! Mock LLM backend for integration tests
//!
//! Accepts any POST, records what it received and answers with a canned body

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// One request as seen by the mock
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Recorded {
    /// Header value as text, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

struct MockState {
    status: StatusCode,
    reply: Value,
    delay: Duration,
    received: Mutex<Vec<Recorded>>,
}

/// In-process backend bound to an ephemeral port
pub struct MockBackend {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockBackend {
    /// Answer every request with `200` and `reply`
    pub async fn start(reply: Value) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::OK, reply, Duration::ZERO).await
    }

    /// Answer every request with `status` and an error body
    pub async fn start_failing(status: u16) -> anyhow::Result<Self> {
        let body = serde_json::json!({"error": {"message": "mock backend intentional failure"}});
        Self::start_inner(StatusCode::from_u16(status)?, body, Duration::ZERO).await
    }

    /// Answer after `delay`
    pub async fn start_slow(reply: Value, delay: Duration) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::OK, reply, delay).await
    }

    async fn start_inner(status: StatusCode, reply: Value, delay: Duration) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            status,
            reply,
            delay,
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Root URL of the mock, without a trailing slash
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Every request received so far
    pub fn received(&self) -> Vec<Recorded> {
        self.state.received.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// The single request received, panicking otherwise
    pub fn only_request(&self) -> Recorded {
        let mut received = self.received();
        assert_eq!(received.len(), 1, "expected exactly one request");
        received.remove(0)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle(State(state): State<Arc<MockState>>, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);

    if let Ok(mut received) = state.received.lock() {
        received.push(Recorded {
            path: uri.path().to_owned(),
            query: uri.query().map(str::to_owned),
            headers,
            body,
        });
    }

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (state.status, axum::Json(state.reply.clone())).into_response()
}
