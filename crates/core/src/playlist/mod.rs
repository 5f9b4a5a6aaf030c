mod files;
mod m3u;

pub use files::{is_video_file, torrent_files, VIDEO_EXTENSIONS};
pub use m3u::{category_label, render_all, render_single, safe_file_name, PlaylistError};
