pub mod health;
pub mod jewellery;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /jewellery                        list (public), create (admin)
/// /jewellery/categories             category table (public)
/// /jewellery/{id}                   get (public), update, delete (admin)
/// /jewellery/{id}/click             record a click (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/jewellery", jewellery::router())
}
