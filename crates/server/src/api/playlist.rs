//! M3U playlist endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use torrtv_core::{render_all, render_single, safe_file_name, PlaylistError, UpstreamError};

use crate::state::AppState;

use super::error::{not_found, upstream_error};
use super::target::{resolve_client, TargetParams};

const M3U_CONTENT_TYPE: &str = "audio/x-mpegurl; charset=utf-8";

fn m3u_response(content: String, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, M3U_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        content,
    )
        .into_response()
}

/// GET /playlist/all
///
/// Aggregate M3U across every torrent on the resolved upstream.
pub async fn playlist_all(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TargetParams>,
    headers: HeaderMap,
) -> Response {
    let client = resolve_client(&state, &params, &headers).await;

    match client.list_torrents().await {
        Ok(torrents) => {
            let m3u = render_all(client.base_url(), &torrents);
            m3u_response(m3u, "TorrServer.m3u")
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to generate playlist");
            upstream_error("Failed to generate playlist", client.base_url(), &e).into_response()
        }
    }
}

/// GET /playlist/{hash}
///
/// M3U for one torrent. 404s distinguish "not found", "no files" and
/// "no video files".
pub async fn playlist_single(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
    Query(params): Query<TargetParams>,
    headers: HeaderMap,
) -> Response {
    let client = resolve_client(&state, &params, &headers).await;

    let torrent = match client.get_torrent(&hash).await {
        Ok(torrent) => torrent,
        Err(UpstreamError::TorrentNotFound(_)) => {
            return not_found("Torrent not found", client.base_url(), &hash).into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, hash = %hash, "Failed to generate playlist");
            return upstream_error("Failed to generate playlist", client.base_url(), &e)
                .into_response();
        }
    };

    match render_single(client.base_url(), &torrent) {
        Ok(m3u) => {
            let file_name = format!("{}.m3u", safe_file_name(torrent.display_title()));
            m3u_response(m3u, &file_name)
        }
        Err(PlaylistError::NoFiles) => {
            not_found("Torrent has no files", client.base_url(), &hash).into_response()
        }
        Err(PlaylistError::NoVideoFiles) => {
            not_found("Torrent has no video files", client.base_url(), &hash).into_response()
        }
    }
}
