//! Shared response envelope types for API handlers.
//!
//! Single-resource responses use a `{ "data": ... }` envelope. The catalogue
//! listing is the exception: it returns the bare pagination envelope.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: item }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
