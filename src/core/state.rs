// Application state (AppState)

use crate::core::config::Config;
use crate::stores::user_store::InMemoryUserStore;
use std::sync::Arc;

/// Shared state of the login application
#[derive(Clone)]
pub struct AppState {
    /// Registered users, populated through the test-mode API
    pub users: Arc<InMemoryUserStore>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_store(config, Arc::new(InMemoryUserStore::new()))
    }

    /// Build state around an existing store, so tests can inspect it directly
    pub fn with_store(config: Config, users: Arc<InMemoryUserStore>) -> Self {
        Self {
            users,
            config: Arc::new(config),
        }
    }
}
