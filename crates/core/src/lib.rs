pub mod config;
pub mod playlist;
pub mod upstream;

pub use config::{load_config, load_config_from_str, Config, ConfigError, ServerConfig, UpstreamConfig};
pub use playlist::{
    category_label, is_video_file, render_all, render_single, safe_file_name, torrent_files,
    PlaylistError,
};
pub use upstream::{
    play_url, stream_url, AddTorrent, CacheAction, ClientRegistry, FileEntry, SettingsAction,
    StreamRequest, TorrServerClient, Torrent, TorrentAction, TorrentFields, UploadTorrent,
    UpstreamError, ViewedAction,
};
