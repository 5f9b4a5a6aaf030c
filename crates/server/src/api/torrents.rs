//! Torrent list/get proxy handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use torrtv_core::{Torrent, UpstreamError};

use crate::state::AppState;

use super::error::{not_found, upstream_error};
use super::target::{resolve_client, TargetParams};

#[derive(Serialize)]
pub struct TorrentListResponse {
    pub success: bool,
    pub torrserver_url: String,
    pub count: usize,
    pub torrents: Vec<Torrent>,
}

#[derive(Serialize)]
pub struct TorrentResponse {
    pub success: bool,
    pub torrserver_url: String,
    pub torrent: Torrent,
}

/// GET /torrents
///
/// List all torrents on the resolved upstream.
pub async fn list_torrents(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TargetParams>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let client = resolve_client(&state, &params, &headers).await;

    match client.list_torrents().await {
        Ok(torrents) => Json(TorrentListResponse {
            success: true,
            torrserver_url: client.base_url().to_string(),
            count: torrents.len(),
            torrents,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch torrents");
            upstream_error("Failed to fetch torrents", client.base_url(), &e).into_response()
        }
    }
}

/// GET /torrents/{hash}
///
/// Fetch one torrent by hash.
pub async fn get_torrent(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
    Query(params): Query<TargetParams>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let client = resolve_client(&state, &params, &headers).await;

    match client.get_torrent(&hash).await {
        Ok(torrent) => Json(TorrentResponse {
            success: true,
            torrserver_url: client.base_url().to_string(),
            torrent,
        })
        .into_response(),
        Err(UpstreamError::TorrentNotFound(_)) => {
            not_found("Torrent not found", client.base_url(), &hash).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, hash = %hash, "Failed to fetch torrent");
            upstream_error("Failed to fetch torrents", client.base_url(), &e).into_response()
        }
    }
}
