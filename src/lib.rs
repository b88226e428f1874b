pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod processor;

use std::sync::Arc;
use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}
