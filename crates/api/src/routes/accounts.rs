//! Account management routes.

use axum::{
    Router,
    extract::State,
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath},
    middleware::AuthUser,
    response::ApiResponse,
};
use spendwise_core::records::validation::{is_blank, require_any_field, require_fields};
use spendwise_db::{
    entities::accounts,
    repositories::{AccountRepository, CreateAccountInput, UpdateAccountInput},
};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/create-account", post(create_account))
        .route("/accounts/get-accounts", get(list_accounts))
        .route("/accounts/get-account/{id}", get(get_account))
        .route("/accounts/update-account/{id}", put(update_account))
        .route("/accounts/delete-account/{id}", delete(delete_account))
}

/// Request body for creating or updating an account.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    /// Display name.
    pub name: Option<String>,
    /// Kind, e.g. "checking" or "savings".
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// Current balance. Defaults to zero on create.
    pub balance: Option<Decimal>,
}

async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<AccountRequest>,
) -> Result<ApiResponse<accounts::Model>, ApiError> {
    require_fields(
        "Name and type are required",
        &[
            !is_blank(payload.name.as_deref()),
            !is_blank(payload.account_type.as_deref()),
        ],
    )?;

    let input = CreateAccountInput {
        name: payload.name.unwrap_or_default().trim().to_string(),
        account_type: payload.account_type.unwrap_or_default().trim().to_string(),
        balance: payload.balance.unwrap_or(Decimal::ZERO),
    };

    let account = AccountRepository::new((*state.db).clone())
        .create(auth.user_id(), input)
        .await?;

    info!(user_id = %auth.user_id(), account_id = %account.id, "Account created");
    Ok(ApiResponse::created("Account created successfully", account))
}

async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<ApiResponse<Vec<accounts::Model>>, ApiError> {
    let accounts = AccountRepository::new((*state.db).clone())
        .list(auth.user_id())
        .await?;
    Ok(ApiResponse::ok("Accounts fetched successfully", accounts))
}

async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<accounts::Model>, ApiError> {
    let account = AccountRepository::new((*state.db).clone())
        .find(auth.user_id(), id)
        .await?;
    Ok(ApiResponse::ok("Account fetched successfully", account))
}

async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AccountRequest>,
) -> Result<ApiResponse<accounts::Model>, ApiError> {
    let name = payload.name.filter(|n| !n.trim().is_empty());
    let account_type = payload.account_type.filter(|t| !t.trim().is_empty());
    require_any_field(&[
        name.is_some(),
        account_type.is_some(),
        payload.balance.is_some(),
    ])?;

    let input = UpdateAccountInput {
        name: name.map(|n| n.trim().to_string()),
        account_type: account_type.map(|t| t.trim().to_string()),
        balance: payload.balance,
    };

    let account = AccountRepository::new((*state.db).clone())
        .update(auth.user_id(), id, input)
        .await?;

    info!(user_id = %auth.user_id(), account_id = %id, "Account updated");
    Ok(ApiResponse::ok("Account updated successfully", account))
}

async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<accounts::Model>, ApiError> {
    let account = AccountRepository::new((*state.db).clone())
        .delete(auth.user_id(), id)
        .await?;

    info!(user_id = %auth.user_id(), account_id = %id, "Account deleted");
    Ok(ApiResponse::ok("Account deleted successfully", account))
}
