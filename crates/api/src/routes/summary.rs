//! Budget summary routes.
//!
//! The range may come from the query string (GET) or a JSON body (POST);
//! both resolve the same way and default to the current calendar month.

use axum::{Router, body::Bytes, extract::State, routing::get};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState, error::ApiError, extractors::ApiQuery, middleware::AuthUser, response::ApiResponse,
};
use spendwise_core::budget::{BudgetSummary, BudgetSummaryService, DateRange};
use spendwise_db::SummaryRepository;

/// Creates the summary routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/budgets/budget-summary",
            get(summary_from_query).post(summary_from_body),
        )
        .route("/budgets/public-budgets", get(summary_from_query))
}

/// Optional range bounds.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryParams {
    /// First day, `YYYY-MM-DD` or RFC 3339.
    pub start_date: Option<String>,
    /// Last day, `YYYY-MM-DD` or RFC 3339.
    pub end_date: Option<String>,
}

async fn summary_from_query(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<SummaryParams>,
) -> Result<ApiResponse<BudgetSummary>, ApiError> {
    build_summary(&state, auth.user_id(), &params).await
}

/// An empty body is the same as `{}`.
async fn summary_from_body(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Bytes,
) -> Result<ApiResponse<BudgetSummary>, ApiError> {
    let params = if body.iter().all(u8::is_ascii_whitespace) {
        SummaryParams::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::validation("Invalid request body").with_details(Value::String(e.to_string()))
        })?
    };
    build_summary(&state, auth.user_id(), &params).await
}

async fn build_summary(
    state: &AppState,
    user_id: Uuid,
    params: &SummaryParams,
) -> Result<ApiResponse<BudgetSummary>, ApiError> {
    let range = DateRange::resolve(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        Utc::now().date_naive(),
    )?;

    let inputs = SummaryRepository::new((*state.db).clone())
        .fetch_inputs(user_id, &range)
        .await?;
    let summary = BudgetSummaryService::summarize(range, &inputs);

    info!(
        %user_id,
        start = %range.start_date,
        end = %range.end_date,
        categories = summary.category_budgets.len(),
        "Budget summary computed"
    );

    Ok(ApiResponse::ok("Budget summary fetched successfully", summary))
}
