//! API route definitions.

use axum::{Router, middleware};
use chrono::NaiveDate;

use crate::{AppState, error::ApiError, middleware::auth::auth_middleware};
use spendwise_core::budget::{SummaryError, date_range::parse_date};

pub mod accounts;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod health;
pub mod summary;
pub mod transactions;

/// Creates the API router; everything except health and the token
/// endpoints sits behind the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(accounts::routes())
        .merge(categories::routes())
        .merge(transactions::routes())
        .merge(budgets::routes())
        .merge(summary::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Parses an optional date field. Blank counts as absent.
pub(crate) fn optional_date(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some).ok_or_else(|| {
            SummaryError::InvalidDate {
                field,
                value: value.to_string(),
            }
            .into()
        }),
    }
}

/// Parses an optional `income` / `expense` style field.
pub(crate) fn optional_kind<K>(raw: Option<&str>) -> Result<Option<K>, ApiError>
where
    K: std::str::FromStr<Err = spendwise_core::records::RecordError>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Ok(Some(value.parse::<K>()?)),
    }
}
