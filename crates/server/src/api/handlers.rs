//! Liveness and upstream round-trip handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::state::AppState;

use super::error::upstream_error;
use super::target::{resolve_client, TargetParams};

#[derive(Serialize)]
pub struct RootResponse {
    pub success: bool,
    pub message: String,
    pub default_url: String,
    pub usage: UsageInfo,
}

#[derive(Serialize)]
pub struct UsageInfo {
    pub query: String,
    pub header: String,
    pub example: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
    pub torrserver_url: String,
}

/// GET /
pub async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    let default_url = state.registry().default_url().to_string();
    Json(RootResponse {
        success: true,
        message: "TorrTV API is running".to_string(),
        usage: UsageInfo {
            query: "Add ?url=<torrserver-url> to your requests".to_string(),
            header: "Or use X-TorrServer-URL header".to_string(),
            example: format!("/torrents?url={}", default_url),
        },
        default_url,
    })
}

/// GET /ping
pub async fn ping(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TargetParams>,
    headers: HeaderMap,
) -> Json<StatusResponse> {
    let client = resolve_client(&state, &params, &headers).await;
    Json(StatusResponse {
        success: true,
        message: "Ping is working!".to_string(),
        torrserver_url: client.base_url().to_string(),
    })
}

/// GET /hello
pub async fn hello(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TargetParams>,
    headers: HeaderMap,
) -> Json<StatusResponse> {
    let client = resolve_client(&state, &params, &headers).await;
    Json(StatusResponse {
        success: true,
        message: "Hello from TorrTV".to_string(),
        torrserver_url: client.base_url().to_string(),
    })
}

/// GET /echo — round-trip check against the resolved upstream.
pub async fn echo(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TargetParams>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let client = resolve_client(&state, &params, &headers).await;

    match client.echo().await {
        Ok(_) => Json(StatusResponse {
            success: true,
            message: "Echo successful!".to_string(),
            torrserver_url: client.base_url().to_string(),
        })
        .into_response(),
        Err(e) => upstream_error("Echo failed", client.base_url(), &e).into_response(),
    }
}
