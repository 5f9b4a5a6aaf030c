use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, playlist, torrents};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness
        .route("/", get(handlers::root))
        .route("/ping", get(handlers::ping))
        .route("/hello", get(handlers::hello))
        .route("/echo", get(handlers::echo))
        // Torrent proxy
        .route("/torrents", get(torrents::list_torrents))
        .route("/torrents/{hash}", get(torrents::get_torrent))
        // Playlists
        .route("/playlist/all", get(playlist::playlist_all))
        .route("/playlist/{hash}", get(playlist::playlist_single))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
