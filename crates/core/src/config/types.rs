use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
///
/// Every field has a default so the service starts without a config file;
/// values come from `config.toml` and/or `TORRTV_`-prefixed environment
/// variables (see the loader).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Listening socket configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    3000
}

/// Upstream TorrServer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Default TorrServer base URL, used when a request names no target.
    #[serde(default = "default_upstream_url")]
    pub default_url: String,
    /// Per-call request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            default_url: default_upstream_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_upstream_url() -> String {
    "http://127.0.0.1:8090".to_string()
}

fn default_timeout() -> u32 {
    30
}
