use axum::routing::{get, post};
use axum::Router;

use crate::handlers::jewellery;
use crate::state::AppState;

/// Routes mounted at `/api/jewellery`.
///
/// ```text
/// GET    /                 list (query parameters, bare envelope)
/// POST   /                 create (admin)
/// GET    /categories       category table
/// GET    /{id}             get by id
/// PUT    /{id}             overwrite (admin)
/// DELETE /{id}             delete (admin)
/// POST   /{id}/click       increment click count
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jewellery::list).post(jewellery::create))
        .route("/categories", get(jewellery::categories))
        .route(
            "/{id}",
            get(jewellery::get_by_id)
                .put(jewellery::update)
                .delete(jewellery::delete),
        )
        .route("/{id}/click", post(jewellery::record_click))
}
