mod client;
mod registry;
mod types;

pub use client::{play_url, stream_url, TorrServerClient};
pub use registry::ClientRegistry;
pub use types::*;
