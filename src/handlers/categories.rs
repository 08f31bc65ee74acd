use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use garde::Validate;

use crate::{
    error::{ErrorBody, Result},
    extract::ApiJson,
    models::category::{Category, CategoryDraft, CategoryPatch},
    services::categories as category_service,
    state::AppState,
    validation::catalog::{parse_id, report_to_error},
};

/// Lists all categories.
#[utoipa::path(
    get,
    path = "/owners/categories",
    tag = "Categories",
    responses(
        (status = 200, description = "List of all categories", body = [Category]),
        (status = 401, description = "Authentication required or invalid token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    security(("cookieAuth" = []))
)]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(category_service::list_categories(&state).await?))
}

/// Creates a category.
#[utoipa::path(
    post,
    path = "/owners/categories/create",
    tag = "Categories",
    request_body = CategoryDraft,
    responses(
        (status = 201, description = "Category created successfully", body = Category),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Authentication required or invalid token", body = ErrorBody),
        (status = 409, description = "Category already exists", body = ErrorBody)
    ),
    security(("cookieAuth" = []))
)]
#[axum::debug_handler]
pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<CategoryDraft>,
) -> Result<impl IntoResponse> {
    draft.validate().map_err(report_to_error)?;
    let category = category_service::create_category(&state, draft).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Applies a partial update to a category.
#[utoipa::path(
    patch,
    path = "/owners/categories/edit/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ID")),
    request_body = CategoryPatch,
    responses(
        (status = 200, description = "Category updated successfully", body = Category),
        (status = 400, description = "Validation error or malformed ID", body = ErrorBody),
        (status = 401, description = "Authentication required or invalid token", body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody),
        (status = 409, description = "Category already exists", body = ErrorBody)
    ),
    security(("cookieAuth" = []))
)]
#[axum::debug_handler]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<CategoryPatch>,
) -> Result<Json<Category>> {
    let id = parse_id(&id, "category")?;
    patch.validate().map_err(report_to_error)?;
    Ok(Json(
        category_service::update_category(&state, id, patch).await?,
    ))
}
