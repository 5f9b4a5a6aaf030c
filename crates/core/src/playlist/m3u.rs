//! M3U playlist rendering.

use std::fmt::Write;

use thiserror::Error;

use crate::upstream::{stream_url, FileEntry, Torrent};

use super::files::{is_video_file, torrent_files};

/// Reasons a single-torrent playlist cannot be rendered.
///
/// Kept distinct so the HTTP layer can name the exact condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("Torrent has no files")]
    NoFiles,

    #[error("Torrent has no video files")]
    NoVideoFiles,
}

/// Map an upstream category to its playlist group label.
///
/// Total: anything outside the known set lands in "Others".
pub fn category_label(category: &str) -> &'static str {
    match category {
        "movie" => "Movies",
        "tv" => "TV Shows",
        "music" => "Music",
        _ => "Others",
    }
}

/// Sanitize a title into an attachment file name: every non-ASCII-alphanumeric
/// character becomes `_`, the rest lowercased.
pub fn safe_file_name(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Render the aggregate playlist for every torrent.
///
/// Torrents with an empty file list are skipped; non-video files are
/// filtered out. Entries are labeled with the file name.
pub fn render_all(base_url: &str, torrents: &[Torrent]) -> String {
    let mut m3u = String::from("#EXTM3U\n");

    for torrent in torrents {
        let files = torrent_files(torrent);
        if files.is_empty() {
            continue;
        }

        for file in files.iter().filter(|f| is_video_file(f.file_name())) {
            push_entry(&mut m3u, base_url, torrent, file, file.file_name());
        }
    }

    m3u
}

/// Render the playlist for one torrent, labeled with its display title.
pub fn render_single(base_url: &str, torrent: &Torrent) -> Result<String, PlaylistError> {
    let files = torrent_files(torrent);
    if files.is_empty() {
        return Err(PlaylistError::NoFiles);
    }

    let videos: Vec<&FileEntry> = files
        .iter()
        .filter(|f| is_video_file(f.file_name()))
        .collect();
    if videos.is_empty() {
        return Err(PlaylistError::NoVideoFiles);
    }

    let mut m3u = String::from("#EXTM3U\n");
    let title = torrent.display_title().to_string();
    for file in videos {
        push_entry(&mut m3u, base_url, torrent, file, &title);
    }

    Ok(m3u)
}

fn push_entry(out: &mut String, base_url: &str, torrent: &Torrent, file: &FileEntry, label: &str) {
    let file_name = file.file_name();
    let url = stream_url(base_url, &torrent.hash, file_name, file.id);

    out.push_str("#EXTINF:-1");
    if let Some(poster) = torrent.poster.as_deref().filter(|p| !p.is_empty()) {
        let _ = write!(out, " tvg-logo=\"{}\"", poster);
    }
    if let Some(category) = torrent.category.as_deref().filter(|c| !c.is_empty()) {
        let _ = write!(out, " group-title=\"{}\"", category_label(category));
    }
    let _ = write!(out, " tvg-name=\"{}\"", file_name);
    let _ = writeln!(out, ",{}", label);
    let _ = writeln!(out, "{}", url);
}
