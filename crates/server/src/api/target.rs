//! Per-request upstream target resolution.

use std::sync::Arc;

use axum::http::HeaderMap;
use serde::Deserialize;
use torrtv_core::TorrServerClient;

use crate::state::AppState;

/// Header naming an upstream target, checked after the `url` query param.
pub const TARGET_HEADER: &str = "x-torrserver-url";

/// Query parameters accepted by every route for target selection.
#[derive(Debug, Default, Deserialize)]
pub struct TargetParams {
    #[serde(default)]
    pub url: Option<String>,
}

/// Resolve the upstream client for this request.
///
/// Precedence: `url` query parameter, then the `X-TorrServer-URL` header,
/// then the configured default. Blank values are treated as absent.
pub async fn resolve_client(
    state: &AppState,
    params: &TargetParams,
    headers: &HeaderMap,
) -> Arc<TorrServerClient> {
    let header_url = headers.get(TARGET_HEADER).and_then(|v| v.to_str().ok());

    let requested = params
        .url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .or_else(|| header_url.filter(|u| !u.trim().is_empty()));

    state.registry().resolve(requested).await
}
