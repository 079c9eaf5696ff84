//! Budget and monthly budget routes.

use axum::{
    Router,
    extract::State,
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::optional_date;
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
    response::ApiResponse,
};
use spendwise_core::records::validation::{
    ensure_budget_amounts, ensure_non_negative, require_any_field,
};
use spendwise_db::{
    entities::{budgets, monthly_budgets},
    repositories::{
        BudgetFilter, BudgetRepository, CreateBudgetInput, MonthlyBudgetInput, UpdateBudgetInput,
    },
};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets/create-budget", post(create_budget))
        .route("/budgets/get-budgets", get(list_budgets))
        .route("/budgets/get-one-budget/{id}", get(get_budget))
        .route("/budgets/update-budget/{id}", put(update_budget))
        .route("/budgets/delete-budget/{id}", delete(delete_budget))
        .route("/budgets/monthly-budget", post(create_monthly_budget))
        .route("/budgets/monthly-budgets", get(list_monthly_budgets))
        .route(
            "/budgets/monthly-budget/{id}",
            get(get_monthly_budget)
                .put(update_monthly_budget)
                .delete(delete_monthly_budget),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating or updating a budget.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    /// Owned category; omit for an uncategorized budget.
    pub category_id: Option<Uuid>,
    /// Monthly allotment.
    pub monthly_amount: Option<Decimal>,
    /// Planned expense.
    pub expense_amount: Option<Decimal>,
    /// Period start.
    pub start_date: Option<String>,
    /// Period end.
    pub end_date: Option<String>,
}

/// Query parameters for listing budgets. Dates select overlapping periods.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBudgetsQuery {
    /// Periods ending on or after this date.
    pub start_date: Option<String>,
    /// Periods starting on or before this date.
    pub end_date: Option<String>,
    /// Only this category.
    pub category_id: Option<Uuid>,
}

/// Request body for a monthly spending ceiling.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBudgetRequest {
    /// Ceiling amount.
    pub amount: Option<Decimal>,
    /// Period start.
    pub start_date: Option<String>,
    /// Period end.
    pub end_date: Option<String>,
}

impl MonthlyBudgetRequest {
    fn into_input(self) -> Result<MonthlyBudgetInput, ApiError> {
        if let Some(amount) = self.amount {
            ensure_non_negative("Amount", amount)?;
        }
        Ok(MonthlyBudgetInput {
            amount: self.amount,
            start_date: optional_date("startDate", self.start_date.as_deref())?,
            end_date: optional_date("endDate", self.end_date.as_deref())?,
        })
    }
}

// ============================================================================
// Budgets
// ============================================================================

async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<BudgetRequest>,
) -> Result<ApiResponse<budgets::Model>, ApiError> {
    ensure_budget_amounts(payload.monthly_amount, payload.expense_amount)?;
    let start_date = optional_date("startDate", payload.start_date.as_deref())?;
    let end_date = optional_date("endDate", payload.end_date.as_deref())?;
    let (Some(start_date), Some(end_date)) = (start_date, end_date) else {
        return Err(ApiError::validation("startDate and endDate are required"));
    };

    let input = CreateBudgetInput {
        category_id: payload.category_id,
        monthly_amount: payload.monthly_amount,
        expense_amount: payload.expense_amount,
        start_date,
        end_date,
    };

    let budget = BudgetRepository::new((*state.db).clone())
        .create(auth.user_id(), input)
        .await?;

    info!(user_id = %auth.user_id(), budget_id = %budget.id, "Budget created");
    Ok(ApiResponse::created("Budget created successfully", budget))
}

async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListBudgetsQuery>,
) -> Result<ApiResponse<Vec<budgets::Model>>, ApiError> {
    let filter = BudgetFilter {
        start_date: optional_date("startDate", query.start_date.as_deref())?,
        end_date: optional_date("endDate", query.end_date.as_deref())?,
        category_id: query.category_id,
    };

    let budgets = BudgetRepository::new((*state.db).clone())
        .list(auth.user_id(), filter)
        .await?;
    Ok(ApiResponse::ok("Budgets fetched successfully", budgets))
}

async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<budgets::Model>, ApiError> {
    let budget = BudgetRepository::new((*state.db).clone())
        .find(auth.user_id(), id)
        .await?;
    Ok(ApiResponse::ok("Budget fetched successfully", budget))
}

async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<BudgetRequest>,
) -> Result<ApiResponse<budgets::Model>, ApiError> {
    let input = UpdateBudgetInput {
        category_id: payload.category_id,
        monthly_amount: payload.monthly_amount,
        expense_amount: payload.expense_amount,
        start_date: optional_date("startDate", payload.start_date.as_deref())?,
        end_date: optional_date("endDate", payload.end_date.as_deref())?,
    };
    require_any_field(&[
        input.category_id.is_some(),
        input.monthly_amount.is_some(),
        input.expense_amount.is_some(),
        input.start_date.is_some(),
        input.end_date.is_some(),
    ])?;
    if let Some(amount) = input.monthly_amount {
        ensure_non_negative("monthlyAmount", amount)?;
    }
    if let Some(amount) = input.expense_amount {
        ensure_non_negative("expenseAmount", amount)?;
    }

    let budget = BudgetRepository::new((*state.db).clone())
        .update(auth.user_id(), id, input)
        .await?;

    info!(user_id = %auth.user_id(), budget_id = %id, "Budget updated");
    Ok(ApiResponse::ok("Budget updated successfully", budget))
}

async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<budgets::Model>, ApiError> {
    let budget = BudgetRepository::new((*state.db).clone())
        .delete(auth.user_id(), id)
        .await?;

    info!(user_id = %auth.user_id(), budget_id = %id, "Budget deleted");
    Ok(ApiResponse::ok("Budget deleted successfully", budget))
}

// ============================================================================
// Monthly budgets
// ============================================================================

async fn create_monthly_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<MonthlyBudgetRequest>,
) -> Result<ApiResponse<monthly_budgets::Model>, ApiError> {
    let monthly = BudgetRepository::new((*state.db).clone())
        .create_monthly(auth.user_id(), payload.into_input()?)
        .await?;

    info!(
        user_id = %auth.user_id(),
        monthly_budget_id = %monthly.id,
        amount = %monthly.amount,
        "Monthly budget created"
    );
    Ok(ApiResponse::created(
        "Monthly budget created successfully",
        monthly,
    ))
}

async fn list_monthly_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<ApiResponse<Vec<monthly_budgets::Model>>, ApiError> {
    let monthly = BudgetRepository::new((*state.db).clone())
        .list_monthly(auth.user_id())
        .await?;
    Ok(ApiResponse::ok("Monthly budgets fetched successfully", monthly))
}

async fn get_monthly_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<monthly_budgets::Model>, ApiError> {
    let monthly = BudgetRepository::new((*state.db).clone())
        .find_monthly(auth.user_id(), id)
        .await?;
    Ok(ApiResponse::ok("Monthly budget fetched successfully", monthly))
}

async fn update_monthly_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<MonthlyBudgetRequest>,
) -> Result<ApiResponse<monthly_budgets::Model>, ApiError> {
    let input = payload.into_input()?;
    require_any_field(&[
        input.amount.is_some(),
        input.start_date.is_some(),
        input.end_date.is_some(),
    ])?;

    let monthly = BudgetRepository::new((*state.db).clone())
        .update_monthly(auth.user_id(), id, input)
        .await?;

    info!(user_id = %auth.user_id(), monthly_budget_id = %id, "Monthly budget updated");
    Ok(ApiResponse::ok("Monthly budget updated successfully", monthly))
}

async fn delete_monthly_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<monthly_budgets::Model>, ApiError> {
    let monthly = BudgetRepository::new((*state.db).clone())
        .delete_monthly(auth.user_id(), id)
        .await?;

    info!(user_id = %auth.user_id(), monthly_budget_id = %id, "Monthly budget deleted");
    Ok(ApiResponse::ok("Monthly budget deleted successfully", monthly))
}
