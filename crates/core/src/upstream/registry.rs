//! Per-target client cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::config::UpstreamConfig;

use super::client::TorrServerClient;

/// Registry of TorrServer clients, one per distinct target.
///
/// Keys are normalized (trailing-slash-stripped) base URLs. Entries are
/// created lazily and never evicted; two requests naming the same target by
/// different means resolve to the identical client, so HTTP connections are
/// reused for the process lifetime.
pub struct ClientRegistry {
    default_url: String,
    timeout: Duration,
    clients: RwLock<HashMap<String, Arc<TorrServerClient>>>,
}

impl ClientRegistry {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            default_url: normalize_url(&config.default_url).to_string(),
            timeout: Duration::from_secs(config.timeout_secs as u64),
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// The configured default target (normalized).
    pub fn default_url(&self) -> &str {
        &self.default_url
    }

    /// Resolve a client for the requested target, falling back to the
    /// configured default when `url` is absent or blank.
    pub async fn resolve(&self, url: Option<&str>) -> Arc<TorrServerClient> {
        let target = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.default_url);
        let key = normalize_url(target);

        {
            let clients = self.clients.read().await;
            if let Some(client) = clients.get(key) {
                return Arc::clone(client);
            }
        }

        let mut clients = self.clients.write().await;
        // A concurrent request may have inserted it between the locks.
        if let Some(client) = clients.get(key) {
            return Arc::clone(client);
        }

        debug!(target = %key, "Creating TorrServer client");
        let client = Arc::new(TorrServerClient::new(key, self.timeout));
        clients.insert(key.to_string(), Arc::clone(&client));
        client
    }

    /// Resolve the configured default target.
    pub async fn resolve_default(&self) -> Arc<TorrServerClient> {
        self.resolve(None).await
    }
}

fn normalize_url(url: &str) -> &str {
    url.trim_end_matches('/')
}
