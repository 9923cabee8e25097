// Application state module
// Shared, read-only after startup: configuration plus the router and its store

use std::sync::Arc;

use super::types::Config;
use crate::handler::Router;
use crate::store::StudentStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub router: Router,
}

impl AppState {
    /// Create `AppState` with a store seeded per `store.seed_key`
    pub fn new(config: &Config) -> Result<Self, regex::Error> {
        let store = Arc::new(StudentStore::seeded(config.store.seed_key.clone()));
        Self::with_store(config, store)
    }

    /// Create `AppState` over an existing store
    pub fn with_store(config: &Config, store: Arc<StudentStore>) -> Result<Self, regex::Error> {
        Ok(Self {
            config: config.clone(),
            router: Router::from_config(config, store)?,
        })
    }

    pub const fn store(&self) -> &Arc<StudentStore> {
        self.router.store()
    }
}
