//! Shared application state injected into all Axum handlers.

use std::path::Path;
use std::sync::Arc;

use tower_http::services::ServeDir;

use crate::service::RelayService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay service for registrations, confirmations and discovery.
    pub relay_service: Arc<RelayService>,
    /// Static asset service for the checkout pages.
    pub static_files: ServeDir,
}

impl AppState {
    /// Creates the state, serving static assets from `static_dir`.
    #[must_use]
    pub fn new(relay_service: Arc<RelayService>, static_dir: impl AsRef<Path>) -> Self {
        Self {
            relay_service,
            static_files: ServeDir::new(static_dir),
        }
    }
}
