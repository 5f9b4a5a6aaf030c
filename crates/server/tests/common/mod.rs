//! Common test utilities: the router in-process plus a mock TorrServer
//! bound to an ephemeral port.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use torrtv_core::Config;
use torrtv_server::api::create_router;
use torrtv_server::state::AppState;

/// In-process server under test, with the URL of its mock upstream.
pub struct TestFixture {
    pub router: Router,
    pub upstream_url: String,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestFixture {
    /// Fixture whose default target is a mock TorrServer holding `torrents`.
    pub async fn with_torrents(torrents: Vec<Value>) -> Self {
        let upstream_url = spawn_mock_torrserver(torrents).await;
        Self::with_default_url(&upstream_url)
    }

    /// Fixture with an arbitrary default target URL.
    pub fn with_default_url(url: &str) -> Self {
        let mut config = Config::default();
        config.upstream.default_url = url.to_string();
        config.upstream.timeout_secs = 2;

        let state = Arc::new(AppState::new(config));
        Self {
            router: create_router(state),
            upstream_url: url.trim_end_matches('/').to_string(),
        }
    }

    /// Send a GET request to the server under test.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.get_with_headers(path, &[]).await
    }

    /// Send a GET request with extra headers.
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::empty()).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Serve a minimal TorrServer on 127.0.0.1:0, returning its base URL.
///
/// Implements the `/torrents` RPC (list/get against the given fixtures)
/// and `/echo`.
pub async fn spawn_mock_torrserver(torrents: Vec<Value>) -> String {
    let app = Router::new()
        .route("/torrents", post(torrents_rpc))
        .route("/echo", get(|| async { "MatriX.test" }))
        .with_state(Arc::new(torrents));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock upstream");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock upstream died");
    });

    format!("http://{}", addr)
}

async fn torrents_rpc(
    State(torrents): State<Arc<Vec<Value>>>,
    Json(request): Json<Value>,
) -> Json<Value> {
    match request["action"].as_str() {
        Some("list") => Json(Value::Array(torrents.as_ref().clone())),
        Some("get") => {
            let hash = request["hash"].as_str().unwrap_or_default();
            let found = torrents.iter().find(|t| t["hash"] == hash).cloned();
            Json(found.unwrap_or(Value::Null))
        }
        _ => Json(Value::Null),
    }
}

/// Like `spawn_mock_torrserver`, but `get` for an unknown hash replies
/// HTTP 404 instead of a `null` body, the other shape TorrServer versions
/// use for a missing torrent.
pub async fn spawn_mock_torrserver_with_404(torrents: Vec<Value>) -> String {
    let app = Router::new()
        .route("/torrents", post(torrents_rpc_strict))
        .route("/echo", get(|| async { "MatriX.test" }))
        .with_state(Arc::new(torrents));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock upstream");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock upstream died");
    });

    format!("http://{}", addr)
}

async fn torrents_rpc_strict(
    State(torrents): State<Arc<Vec<Value>>>,
    Json(request): Json<Value>,
) -> Response {
    match request["action"].as_str() {
        Some("list") => Json(Value::Array(torrents.as_ref().clone())).into_response(),
        Some("get") => {
            let hash = request["hash"].as_str().unwrap_or_default();
            match torrents.iter().find(|t| t["hash"] == hash).cloned() {
                Some(torrent) => Json(torrent).into_response(),
                None => (StatusCode::NOT_FOUND, "torrent not found").into_response(),
            }
        }
        _ => Json(Value::Null).into_response(),
    }
}

/// Find a port with nothing listening on it.
pub fn unused_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
