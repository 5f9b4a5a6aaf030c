//! File-list normalization and video classification.

use serde::Deserialize;
use tracing::warn;

use crate::upstream::{FileEntry, Torrent};

/// Extensions considered playable video (lowercase, no dot).
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp", "ts",
];

/// Case-insensitive exact-extension check against the video whitelist.
///
/// Names without a dot are never video.
pub fn is_video_file(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Shape of the embedded `data` blob carrying the legacy file list.
#[derive(Debug, Deserialize)]
struct EmbeddedData {
    #[serde(rename = "TorrServer")]
    torrserver: Option<EmbeddedTorrServer>,
}

#[derive(Debug, Deserialize)]
struct EmbeddedTorrServer {
    #[serde(rename = "Files")]
    files: Option<Vec<FileEntry>>,
}

/// Flat file list for a torrent, whichever representation is present.
///
/// `file_stats` wins; otherwise the JSON blob in `data` is parsed. A
/// malformed blob is logged and treated as an empty list so one bad torrent
/// cannot abort a multi-torrent playlist render.
pub fn torrent_files(torrent: &Torrent) -> Vec<FileEntry> {
    if let Some(files) = &torrent.file_stats {
        return files.clone();
    }

    if let Some(data) = &torrent.data {
        match serde_json::from_str::<EmbeddedData>(data) {
            Ok(parsed) => {
                return parsed
                    .torrserver
                    .and_then(|ts| ts.files)
                    .unwrap_or_default();
            }
            Err(e) => {
                warn!(hash = %torrent.hash, error = %e, "Malformed embedded file metadata");
            }
        }
    }

    Vec::new()
}
