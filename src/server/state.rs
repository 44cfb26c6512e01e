use crate::{config::Config, store::Store};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Document store for channel definitions and the library index
    pub store: Store,
}

impl AppState {
    /// Create a new AppState with the given configuration
    pub fn new(config: Config) -> Self {
        let store = Store::new(&config.data_dir);

        Self {
            config: Arc::new(config),
            store,
        }
    }
}
