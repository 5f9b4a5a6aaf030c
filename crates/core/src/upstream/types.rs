//! Types for the TorrServer RPC surface.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when talking to a TorrServer instance.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Torrent not found: {0}")]
    TorrentNotFound(String),

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    /// True when the target could not be reached at all (refused, DNS
    /// failure, timeout) as opposed to an application-level failure.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, UpstreamError::Connection(_) | UpstreamError::Timeout)
    }
}

/// A torrent as reported by TorrServer.
///
/// Only the fields this service reads are typed; everything else the
/// upstream sends is preserved in `extra` so proxied responses lose nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Torrent {
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Direct file list, present on recent TorrServer versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_stats: Option<Vec<FileEntry>>,
    /// Embedded JSON blob, the older representation of the file list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Torrent {
    /// Display title: `title`, falling back to `name`, then `"Unknown"`.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.name.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Unknown")
    }
}

/// One file inside a torrent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// Index within the torrent, stable, used to build stream URLs.
    #[serde(default)]
    pub id: i64,
    /// Slash-separated path; the file name is the last segment.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
}

impl FileEntry {
    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(self.path.as_str())
    }
}

/// RPC envelope for the upstream `/torrents` endpoint.
///
/// Closed set of actions, each with its required fields, so a malformed
/// envelope cannot reach the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum TorrentAction {
    List,
    Get {
        hash: String,
    },
    Add {
        #[serde(flatten)]
        params: AddTorrent,
    },
    Set {
        hash: String,
        #[serde(flatten)]
        fields: TorrentFields,
    },
    Rem {
        hash: String,
    },
    Drop {
        hash: String,
    },
    Wipe,
}

/// Parameters for adding a torrent by link.
#[derive(Debug, Clone, Serialize)]
pub struct AddTorrent {
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub save_to_db: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl AddTorrent {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: None,
            poster: None,
            category: None,
            save_to_db: false,
            data: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn save_to_db(mut self, save: bool) -> Self {
        self.save_to_db = save;
        self
    }
}

/// Mutable torrent fields for the `set` action.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TorrentFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// RPC envelope for the upstream `/settings` endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum SettingsAction {
    Get,
    Set { sets: serde_json::Value },
    #[serde(rename = "def")]
    Reset,
}

/// RPC envelope for the upstream `/viewed` endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ViewedAction {
    List,
    Set { hash: String, file_index: i64 },
    Rem { hash: String, file_index: i64 },
}

/// RPC envelope for the upstream `/cache` endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum CacheAction {
    Get { hash: String },
}

/// Query parameters for the upstream `/stream` endpoint.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    /// Torrent hash or magnet link.
    pub link: String,
    pub index: Option<i64>,
    pub play: bool,
    pub preload: bool,
}

impl StreamRequest {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            index: None,
            play: false,
            preload: false,
        }
    }

    pub fn with_index(mut self, index: i64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn play(mut self, play: bool) -> Self {
        self.play = play;
        self
    }

    pub fn preload(mut self, preload: bool) -> Self {
        self.preload = preload;
        self
    }

    /// Render the query string. `play` and `preload` are valueless flags,
    /// matching the format of stream URLs embedded in playlists.
    pub fn query_string(&self) -> String {
        let mut query = format!("link={}", urlencoding::encode(&self.link));
        if let Some(index) = self.index {
            query.push_str(&format!("&index={}", index));
        }
        if self.play {
            query.push_str("&play");
        }
        if self.preload {
            query.push_str("&preload");
        }
        query
    }
}

/// Parameters for a multipart `.torrent` file upload.
#[derive(Debug, Clone)]
pub struct UploadTorrent {
    /// Raw .torrent file bytes.
    pub bytes: Vec<u8>,
    /// File name reported in the multipart part.
    pub file_name: String,
    pub save: bool,
    pub title: Option<String>,
    pub category: Option<String>,
    pub poster: Option<String>,
    pub data: Option<String>,
}

impl UploadTorrent {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            save: false,
            title: None,
            category: None,
            poster: None,
            data: None,
        }
    }
}
