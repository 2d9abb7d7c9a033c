use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;

use crate::config::AppConfig;
use crate::persistence;
use crate::registry::ModelRegistry;

/// Shared application state, threaded through the route handlers via axum's
/// `State` extractor. The registry lock is held only for slot reads and
/// mutations; training and prediction run outside it.
pub struct AppState {
    pub config: AppConfig,
    pub registry: RwLock<ModelRegistry>,
}

impl AppState {
    /// Explicit one-time bootstrap: create the configured directories, load
    /// the persisted active model (or construct the default variant), and
    /// build the registry that request handling then operates on.
    pub fn bootstrap(config: AppConfig) -> Result<Arc<AppState>> {
        config.ensure_dirs()?;
        let active = persistence::load(&config.model_path, config.default_model)?;
        Ok(Arc::new(AppState {
            registry: RwLock::new(ModelRegistry::new(active)),
            config,
        }))
    }
}
