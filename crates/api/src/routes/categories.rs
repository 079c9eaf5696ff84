//! Category management routes.

use axum::{
    Router,
    extract::State,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::optional_kind;
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
    response::ApiResponse,
};
use spendwise_core::records::{
    CategoryType,
    validation::{is_blank, require_any_field, require_fields},
};
use spendwise_db::{entities::categories, repositories::CategoryRepository};

/// Creates the category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories/create-category", post(create_category))
        .route("/categories/get-categories", get(list_categories))
        .route("/categories/get-category/{id}", get(get_category))
        .route("/categories/update-category/{id}", put(update_category))
        .route("/categories/delete-category/{id}", delete(delete_category))
}

/// Request body for creating or updating a category.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryRequest {
    /// Display name.
    pub name: Option<String>,
    /// `income` or `expense`.
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

/// Query parameters for listing categories.
#[derive(Debug, Default, Deserialize)]
pub struct ListCategoriesQuery {
    /// Only categories of this kind.
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CategoryRequest>,
) -> Result<ApiResponse<categories::Model>, ApiError> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    require_fields(
        "Name and type are required",
        &[!name.is_empty(), !is_blank(payload.category_type.as_deref())],
    )?;
    let kind: CategoryType = payload
        .category_type
        .as_deref()
        .unwrap_or_default()
        .parse()?;

    let category = CategoryRepository::new((*state.db).clone())
        .create(auth.user_id(), name.to_string(), kind)
        .await?;

    info!(user_id = %auth.user_id(), category_id = %category.id, "Category created");
    Ok(ApiResponse::created("Category created successfully", category))
}

async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListCategoriesQuery>,
) -> Result<ApiResponse<Vec<categories::Model>>, ApiError> {
    let kind = optional_kind::<CategoryType>(query.category_type.as_deref())?;
    let categories = CategoryRepository::new((*state.db).clone())
        .list(auth.user_id(), kind)
        .await?;
    Ok(ApiResponse::ok("Categories fetched successfully", categories))
}

async fn get_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<categories::Model>, ApiError> {
    let category = CategoryRepository::new((*state.db).clone())
        .find(auth.user_id(), id)
        .await?;
    Ok(ApiResponse::ok("Category fetched successfully", category))
}

async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CategoryRequest>,
) -> Result<ApiResponse<categories::Model>, ApiError> {
    let name = payload
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let kind = optional_kind::<CategoryType>(payload.category_type.as_deref())?;
    require_any_field(&[name.is_some(), kind.is_some()])?;

    let category = CategoryRepository::new((*state.db).clone())
        .update(auth.user_id(), id, name, kind)
        .await?;

    info!(user_id = %auth.user_id(), category_id = %id, "Category updated");
    Ok(ApiResponse::ok("Category updated successfully", category))
}

async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<categories::Model>, ApiError> {
    let category = CategoryRepository::new((*state.db).clone())
        .delete(auth.user_id(), id)
        .await?;

    info!(user_id = %auth.user_id(), category_id = %id, "Category deleted");
    Ok(ApiResponse::ok("Category deleted successfully", category))
}
