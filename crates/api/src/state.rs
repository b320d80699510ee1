use std::sync::Arc;

use catalog_db::ItemStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Catalogue storage (PostgreSQL or in-memory).
    pub store: Arc<dyn ItemStore>,
    /// Server configuration (JWT secret for the admin gate).
    pub config: Arc<ServerConfig>,
}
