//! Handlers for the `/jewellery` resource.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use catalog_core::envelope::Envelope;
use catalog_core::error::CoreError;
use catalog_core::item::{Item, ItemInput, CATEGORIES};
use catalog_core::query::{CatalogQueryParams, QueryPlan};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// One row of the fixed category table.
#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub name: &'static str,
    pub code: &'static str,
}

fn not_found(id: String) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Item", id })
}

/// Unwrap an admin payload, reporting malformed JSON as a validation error,
/// then normalize it.
fn validated(payload: Result<Json<ItemInput>, JsonRejection>) -> AppResult<ItemInput> {
    let Json(input) =
        payload.map_err(|rejection| CoreError::Validation(rejection.body_text()))?;
    Ok(input.into_validated()?)
}

/// GET /api/jewellery
///
/// Every parameter is optional and malformed values fall back to defaults,
/// so this never fails on input. A repeated key keeps its first value.
/// Returns the bare pagination envelope.
pub async fn list(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<Json<Envelope<Item>>> {
    let pairs = match pairs {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Unreadable catalogue query, using defaults");
            Vec::new()
        }
    };
    let params = CatalogQueryParams::from_pairs(pairs);

    let plan = QueryPlan::resolve(&params);
    let envelope = state.store.list(&plan).await?;

    tracing::debug!(
        page = plan.page,
        page_size = plan.page_size,
        total_items = envelope.total_items,
        returned = envelope.items.len(),
        "Catalogue query served",
    );

    Ok(Json(envelope))
}

/// GET /api/jewellery/categories
pub async fn categories() -> Json<DataResponse<Vec<CategoryInfo>>> {
    let data = CATEGORIES
        .iter()
        .map(|&(name, code)| CategoryInfo { name, code })
        .collect();
    Json(DataResponse { data })
}

/// GET /api/jewellery/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Item>>> {
    let item = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/jewellery/{id}/click
pub async fn record_click(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Item>>> {
    let item = state
        .store
        .record_click(&id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/jewellery (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    payload: Result<Json<ItemInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Item>>)> {
    let input = validated(payload)?;
    let item = state.store.create(&input).await?;

    tracing::info!(item_id = %item.id, admin = %admin.subject, "Item created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/jewellery/{id} (admin)
///
/// Overwrites every editable field; the id never changes.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    payload: Result<Json<ItemInput>, JsonRejection>,
) -> AppResult<Json<DataResponse<Item>>> {
    let input = validated(payload)?;
    let item = state
        .store
        .update(&id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(item_id = %item.id, admin = %admin.subject, "Item updated");
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/jewellery/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if state.store.delete(&id).await? {
        tracing::info!(item_id = %id, admin = %admin.subject, "Item deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
