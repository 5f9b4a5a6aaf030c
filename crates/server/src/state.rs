use torrtv_core::{ClientRegistry, Config};

/// Shared application state
pub struct AppState {
    config: Config,
    registry: ClientRegistry,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let registry = ClientRegistry::new(&config.upstream);
        Self { config, registry }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }
}
