//! Transaction routes.

use axum::{
    Router,
    extract::State,
    routing::{delete, get, post, put},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{optional_date, optional_kind};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
    response::ApiResponse,
};
use spendwise_core::records::{
    TransactionType,
    validation::{ensure_positive, is_blank, require_any_field, require_fields},
};
use spendwise_db::{
    entities::transactions,
    repositories::{
        CreateTransactionInput, TransactionFilter, TransactionRepository, UpdateTransactionInput,
    },
};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/create-transaction", post(create_transaction))
        .route("/transactions/get-transactions", get(list_transactions))
        .route("/transactions/get-transaction/{id}", get(get_transaction))
        .route(
            "/transactions/update-transaction/{id}",
            put(update_transaction),
        )
        .route(
            "/transactions/delete-transaction/{id}",
            delete(delete_transaction),
        )
}

/// Request body for creating or updating a transaction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Label.
    pub name: Option<String>,
    /// Positive amount.
    pub amount: Option<Decimal>,
    /// `income` or `expense`.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Booking date; today when omitted on create.
    pub date: Option<String>,
    /// Free text.
    pub description: Option<String>,
    /// Owned category.
    pub category_id: Option<Uuid>,
    /// Owned account.
    pub account_id: Option<Uuid>,
}

/// Query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    /// Earliest booking date, inclusive.
    pub start_date: Option<String>,
    /// Latest booking date, inclusive.
    pub end_date: Option<String>,
    /// Only this category.
    pub category_id: Option<Uuid>,
    /// Only this direction.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<TransactionRequest>,
) -> Result<ApiResponse<transactions::Model>, ApiError> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    require_fields(
        "Name, amount, and type are required",
        &[
            !name.is_empty(),
            payload.amount.is_some(),
            !is_blank(payload.transaction_type.as_deref()),
        ],
    )?;

    let amount = payload.amount.unwrap_or_default();
    ensure_positive("Amount", amount)?;
    let transaction_type = optional_kind::<TransactionType>(payload.transaction_type.as_deref())?
        .ok_or_else(|| ApiError::validation("Name, amount, and type are required"))?;
    let date = optional_date("date", payload.date.as_deref())?
        .unwrap_or_else(|| Utc::now().date_naive());

    let input = CreateTransactionInput {
        name: name.to_string(),
        amount,
        date,
        transaction_type,
        description: payload.description,
        category_id: payload.category_id,
        account_id: payload.account_id,
    };

    let transaction = TransactionRepository::new((*state.db).clone())
        .create(auth.user_id(), input)
        .await?;

    info!(
        user_id = %auth.user_id(),
        transaction_id = %transaction.id,
        amount = %transaction.amount,
        "Transaction created"
    );
    Ok(ApiResponse::created(
        "Transaction created successfully",
        transaction,
    ))
}

async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListTransactionsQuery>,
) -> Result<ApiResponse<Vec<transactions::Model>>, ApiError> {
    let filter = TransactionFilter {
        start_date: optional_date("startDate", query.start_date.as_deref())?,
        end_date: optional_date("endDate", query.end_date.as_deref())?,
        category_id: query.category_id,
        transaction_type: optional_kind(query.transaction_type.as_deref())?,
    };

    let transactions = TransactionRepository::new((*state.db).clone())
        .list(auth.user_id(), filter)
        .await?;
    Ok(ApiResponse::ok(
        "Transactions fetched successfully",
        transactions,
    ))
}

async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<transactions::Model>, ApiError> {
    let transaction = TransactionRepository::new((*state.db).clone())
        .find(auth.user_id(), id)
        .await?;
    Ok(ApiResponse::ok("Transaction fetched successfully", transaction))
}

async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<TransactionRequest>,
) -> Result<ApiResponse<transactions::Model>, ApiError> {
    let input = UpdateTransactionInput {
        name: payload
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        amount: payload.amount,
        date: optional_date("date", payload.date.as_deref())?,
        transaction_type: optional_kind(payload.transaction_type.as_deref())?,
        description: payload.description,
        category_id: payload.category_id,
        account_id: payload.account_id,
    };
    require_any_field(&[
        input.name.is_some(),
        input.amount.is_some(),
        input.date.is_some(),
        input.transaction_type.is_some(),
        input.description.is_some(),
        input.category_id.is_some(),
        input.account_id.is_some(),
    ])?;
    if let Some(amount) = input.amount {
        ensure_positive("Amount", amount)?;
    }

    let transaction = TransactionRepository::new((*state.db).clone())
        .update(auth.user_id(), id, input)
        .await?;

    info!(user_id = %auth.user_id(), transaction_id = %id, "Transaction updated");
    Ok(ApiResponse::ok("Transaction updated successfully", transaction))
}

async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<transactions::Model>, ApiError> {
    let transaction = TransactionRepository::new((*state.db).clone())
        .delete(auth.user_id(), id)
        .await?;

    info!(user_id = %auth.user_id(), transaction_id = %id, "Transaction deleted");
    Ok(ApiResponse::ok("Transaction deleted successfully", transaction))
}
