//! HTTP client for a single TorrServer instance.

use std::time::Duration;

use bytes::Bytes;
use futures::Stream;
use reqwest::{multipart, Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::types::{
    AddTorrent, CacheAction, SettingsAction, StreamRequest, Torrent, TorrentAction, TorrentFields,
    UploadTorrent, UpstreamError, ViewedAction,
};

/// Build a stream URL for a file, pointing at the given TorrServer base.
///
/// Pure function of its inputs; playlist entries embed its output verbatim,
/// so the format must stay byte-stable.
pub fn stream_url(base_url: &str, hash: &str, file_name: &str, index: i64) -> String {
    format!(
        "{}/stream/{}?link={}&index={}&play&preload",
        base_url.trim_end_matches('/'),
        urlencoding::encode(file_name),
        urlencoding::encode(hash),
        index
    )
}

/// Build a play URL for a file index on the given TorrServer base.
pub fn play_url(base_url: &str, hash: &str, index: i64) -> String {
    format!("{}/play/{}/{}", base_url.trim_end_matches('/'), hash, index)
}

/// Client bound to one TorrServer base URL.
///
/// Each logical operation maps to exactly one HTTP request with a bounded
/// timeout. No retries; the caller decides how to surface failures.
pub struct TorrServerClient {
    base_url: String,
    client: Client,
}

impl TorrServerClient {
    /// Create a client bound to `base_url` (trailing slash stripped).
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// The normalized base URL this client is bound to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON action envelope and return the response body as text.
    async fn post_action<A: Serialize>(
        &self,
        path: &str,
        action: &A,
    ) -> Result<String, UpstreamError> {
        let url = self.url(path);
        debug!(url = %url, "POST upstream action");

        let response = self
            .client
            .post(&url)
            .json(action)
            .send()
            .await
            .map_err(map_send_error)?;

        read_success_body(response).await
    }

    /// POST an action envelope and parse the response as JSON.
    async fn post_action_json<A: Serialize>(
        &self,
        path: &str,
        action: &A,
    ) -> Result<Value, UpstreamError> {
        let body = self.post_action(path, action).await?;
        parse_json(&body)
    }

    /// GET a path and return the response body as text.
    async fn get_text(&self, path_and_query: &str) -> Result<String, UpstreamError> {
        let url = self.url(path_and_query);
        debug!(url = %url, "GET upstream");

        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        read_success_body(response).await
    }

    /// GET a path and parse the response as JSON.
    async fn get_json(&self, path_and_query: &str) -> Result<Value, UpstreamError> {
        let body = self.get_text(path_and_query).await?;
        parse_json(&body)
    }

    /// GET a path and return the raw byte stream for passthrough.
    async fn get_stream(
        &self,
        path_and_query: &str,
    ) -> Result<impl Stream<Item = reqwest::Result<Bytes>>, UpstreamError> {
        let url = self.url(path_and_query);
        let response = self.client.get(&url).send().await.map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes_stream())
    }

    // ------------------------------------------------------------------
    // Misc GET endpoints
    // ------------------------------------------------------------------

    /// Round-trip check; returns the upstream version string.
    pub async fn echo(&self) -> Result<String, UpstreamError> {
        self.get_text("/echo").await
    }

    /// Ask the upstream server to shut down.
    pub async fn shutdown(&self) -> Result<(), UpstreamError> {
        self.get_text("/shutdown").await.map(|_| ())
    }

    /// Upstream server statistics.
    pub async fn stats(&self) -> Result<Value, UpstreamError> {
        self.get_json("/stat").await
    }

    /// Magnet links for all registered torrents.
    pub async fn magnets(&self) -> Result<Value, UpstreamError> {
        self.get_json("/magnets").await
    }

    /// ffprobe output for one file of a torrent.
    pub async fn ffprobe(&self, hash: &str, index: i64) -> Result<Value, UpstreamError> {
        self.get_json(&format!("/ffp/{}/{}", hash, index)).await
    }

    /// Search the upstream torrent index.
    pub async fn search(&self, query: &str) -> Result<Value, UpstreamError> {
        self.get_json(&format!("/search?query={}", urlencoding::encode(query)))
            .await
    }

    /// Download-speed test stream of `size_mb` megabytes.
    pub async fn download_test(
        &self,
        size_mb: u32,
    ) -> Result<impl Stream<Item = reqwest::Result<Bytes>>, UpstreamError> {
        self.get_stream(&format!("/download/{}", size_mb)).await
    }

    // ------------------------------------------------------------------
    // Torrent RPC
    // ------------------------------------------------------------------

    /// List all torrents.
    pub async fn list_torrents(&self) -> Result<Vec<Torrent>, UpstreamError> {
        let body = self.post_action("/torrents", &TorrentAction::List).await?;
        serde_json::from_str(&body)
            .map_err(|e| UpstreamError::InvalidResponse(format!("Failed to parse list: {}", e)))
    }

    /// Get one torrent by hash.
    ///
    /// An upstream 404, or a success reply with an empty or `null` body,
    /// means the hash is unknown.
    pub async fn get_torrent(&self, hash: &str) -> Result<Torrent, UpstreamError> {
        let body = self
            .post_action(
                "/torrents",
                &TorrentAction::Get {
                    hash: hash.to_string(),
                },
            )
            .await
            .map_err(|e| match e {
                UpstreamError::Status { status: 404, .. } => {
                    UpstreamError::TorrentNotFound(hash.to_string())
                }
                other => other,
            })?;

        if body.trim().is_empty() {
            return Err(UpstreamError::TorrentNotFound(hash.to_string()));
        }

        let torrent: Option<Torrent> = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::InvalidResponse(format!("Failed to parse torrent: {}", e)))?;

        torrent.ok_or_else(|| UpstreamError::TorrentNotFound(hash.to_string()))
    }

    /// Add a torrent by magnet/link.
    pub async fn add_torrent(&self, params: AddTorrent) -> Result<Torrent, UpstreamError> {
        let body = self
            .post_action("/torrents", &TorrentAction::Add { params })
            .await?;
        serde_json::from_str(&body)
            .map_err(|e| UpstreamError::InvalidResponse(format!("Failed to parse torrent: {}", e)))
    }

    /// Update mutable fields of a torrent.
    pub async fn set_torrent(
        &self,
        hash: &str,
        fields: TorrentFields,
    ) -> Result<Value, UpstreamError> {
        self.post_action_json(
            "/torrents",
            &TorrentAction::Set {
                hash: hash.to_string(),
                fields,
            },
        )
        .await
    }

    /// Remove a torrent from the upstream list.
    pub async fn remove_torrent(&self, hash: &str) -> Result<(), UpstreamError> {
        self.post_action(
            "/torrents",
            &TorrentAction::Rem {
                hash: hash.to_string(),
            },
        )
        .await
        .map(|_| ())
    }

    /// Drop a torrent's active session, keeping its record.
    pub async fn drop_torrent(&self, hash: &str) -> Result<(), UpstreamError> {
        self.post_action(
            "/torrents",
            &TorrentAction::Drop {
                hash: hash.to_string(),
            },
        )
        .await
        .map(|_| ())
    }

    /// Remove every torrent.
    pub async fn wipe_torrents(&self) -> Result<(), UpstreamError> {
        self.post_action("/torrents", &TorrentAction::Wipe)
            .await
            .map(|_| ())
    }

    /// Upload a `.torrent` file via multipart POST.
    pub async fn upload_torrent(&self, upload: UploadTorrent) -> Result<Value, UpstreamError> {
        let file_part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("application/x-bittorrent")
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;

        let mut form = multipart::Form::new().part("file", file_part);
        if upload.save {
            form = form.text("save", "true");
        }
        if let Some(title) = upload.title {
            form = form.text("title", title);
        }
        if let Some(category) = upload.category {
            form = form.text("category", category);
        }
        if let Some(poster) = upload.poster {
            form = form.text("poster", poster);
        }
        if let Some(data) = upload.data {
            form = form.text("data", data);
        }

        let url = self.url("/torrent/upload");
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;

        let body = read_success_body(response).await?;
        parse_json(&body)
    }

    // ------------------------------------------------------------------
    // Streaming / playlists
    // ------------------------------------------------------------------

    /// Stream URL for a file of a torrent on this client's base.
    pub fn stream_url(&self, hash: &str, file_name: &str, index: i64) -> String {
        stream_url(&self.base_url, hash, file_name, index)
    }

    /// Play URL for a file index on this client's base.
    pub fn play_url(&self, hash: &str, index: i64) -> String {
        play_url(&self.base_url, hash, index)
    }

    /// Byte-stream passthrough for one file of a torrent.
    pub async fn stream_file(
        &self,
        hash: &str,
        index: i64,
    ) -> Result<impl Stream<Item = reqwest::Result<Bytes>>, UpstreamError> {
        self.get_stream(&format!("/play/{}/{}", hash, index)).await
    }

    /// Raw passthrough of the upstream `/stream` endpoint.
    ///
    /// The body is forwarded as-is: media bytes when `play` is set, the
    /// upstream's JSON description otherwise.
    pub async fn stream(
        &self,
        request: &StreamRequest,
    ) -> Result<impl Stream<Item = reqwest::Result<Bytes>>, UpstreamError> {
        self.get_stream(&format!("/stream?{}", request.query_string()))
            .await
    }

    /// Upstream-rendered playlist for one torrent.
    pub async fn playlist(&self, hash: &str, from_last: bool) -> Result<String, UpstreamError> {
        self.get_text(&format!(
            "/playlist?hash={}&fromlast={}",
            urlencoding::encode(hash),
            from_last
        ))
        .await
    }

    /// Upstream-rendered playlist for all torrents.
    pub async fn playlist_all(&self) -> Result<String, UpstreamError> {
        self.get_text("/playlistall/all.m3u").await
    }

    // ------------------------------------------------------------------
    // Settings / viewed / cache
    // ------------------------------------------------------------------

    /// Current upstream settings.
    pub async fn settings(&self) -> Result<Value, UpstreamError> {
        self.post_action_json("/settings", &SettingsAction::Get)
            .await
    }

    /// Apply upstream settings.
    pub async fn set_settings(&self, sets: Value) -> Result<Value, UpstreamError> {
        self.post_action_json("/settings", &SettingsAction::Set { sets })
            .await
    }

    /// Reset upstream settings to defaults.
    pub async fn reset_settings(&self) -> Result<Value, UpstreamError> {
        self.post_action_json("/settings", &SettingsAction::Reset)
            .await
    }

    /// List viewed file markers.
    pub async fn list_viewed(&self) -> Result<Value, UpstreamError> {
        self.post_action_json("/viewed", &ViewedAction::List).await
    }

    /// Mark a file as viewed.
    pub async fn set_viewed(&self, hash: &str, file_index: i64) -> Result<(), UpstreamError> {
        self.post_action(
            "/viewed",
            &ViewedAction::Set {
                hash: hash.to_string(),
                file_index,
            },
        )
        .await
        .map(|_| ())
    }

    /// Clear a viewed marker.
    pub async fn remove_viewed(&self, hash: &str, file_index: i64) -> Result<(), UpstreamError> {
        self.post_action(
            "/viewed",
            &ViewedAction::Rem {
                hash: hash.to_string(),
                file_index,
            },
        )
        .await
        .map(|_| ())
    }

    /// Cache statistics for a torrent.
    pub async fn cache_stats(&self, hash: &str) -> Result<Value, UpstreamError> {
        self.post_action_json(
            "/cache",
            &CacheAction::Get {
                hash: hash.to_string(),
            },
        )
        .await
    }
}

/// Map a reqwest send error into the upstream error taxonomy.
fn map_send_error(e: reqwest::Error) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Connection(e.to_string())
    }
}

/// Check status, then return the body text.
async fn read_success_body(response: reqwest::Response) -> Result<String, UpstreamError> {
    let status: StatusCode = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;

    if !status.is_success() {
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

fn parse_json(body: &str) -> Result<Value, UpstreamError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
        .map_err(|e| UpstreamError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_url_format() {
        assert_eq!(
            stream_url("http://ts:8090", "abc123", "episode.mkv", 3),
            "http://ts:8090/stream/episode.mkv?link=abc123&index=3&play&preload"
        );
    }

    #[test]
    fn test_stream_url_strips_trailing_slash() {
        assert_eq!(
            stream_url("http://ts:8090/", "h", "a.mp4", 1),
            "http://ts:8090/stream/a.mp4?link=h&index=1&play&preload"
        );
    }

    #[test]
    fn test_stream_url_encodes_file_name() {
        assert_eq!(
            stream_url("http://ts:8090", "h", "Some Movie.mkv", 1),
            "http://ts:8090/stream/Some%20Movie.mkv?link=h&index=1&play&preload"
        );
    }

    #[test]
    fn test_play_url_format() {
        assert_eq!(play_url("http://ts:8090", "abc", 2), "http://ts:8090/play/abc/2");
        assert_eq!(play_url("http://ts:8090/", "abc", 2), "http://ts:8090/play/abc/2");
    }

    #[test]
    fn test_client_normalizes_base_url() {
        let client = TorrServerClient::new("http://ts:8090/", Duration::from_secs(5));
        assert_eq!(client.base_url(), "http://ts:8090");
        assert_eq!(
            client.stream_url("h", "f.mkv", 1),
            "http://ts:8090/stream/f.mkv?link=h&index=1&play&preload"
        );
    }

    #[test]
    fn test_parse_json_empty_body_is_null() {
        assert_eq!(parse_json("").unwrap(), Value::Null);
        assert_eq!(parse_json("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_json_malformed() {
        let err = parse_json("{not json").unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidResponse(_)));
    }
}
