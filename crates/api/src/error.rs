//! Error envelope returned by every failing handler.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use spendwise_core::{auth::PasswordError, budget::SummaryError, records::RecordError};
use spendwise_db::repositories::{
    AccountError, BudgetError, CategoryError, TransactionError, UserError,
};
use spendwise_shared::{AppError, JwtError};

/// Message sent in place of any 5xx cause.
const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// An `AppError` on its way out of a handler, plus optional details.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    details: Option<Value>,
}

/// Wire shape of a failed response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Always false.
    pub success: bool,
    /// Numeric HTTP status.
    pub status_code: u16,
    /// Client-facing message.
    pub message: String,
    /// Stable machine-readable code.
    pub error_code: &'static str,
    /// When the error was produced.
    pub timestamp: DateTime<Utc>,
    /// Extra context, such as the reason a body failed to parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    /// 401 with the given message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into()).into()
    }

    /// 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into()).into()
    }

    /// 400 with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into()).into()
    }

    /// Attaches details to the envelope.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// The wrapped application error.
    pub const fn inner(&self) -> &AppError {
        &self.error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let (message, details) = if self.error.is_server_error() {
            error!(error = %self.error, "Request failed");
            (GENERIC_SERVER_ERROR.to_string(), None)
        } else {
            (self.error.message().to_string(), self.details)
        };

        let body = ErrorBody {
            success: false,
            status_code: status.as_u16(),
            message,
            error_code: self.error.error_code(),
            timestamp: Utc::now(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            details: None,
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        AppError::Internal(err.to_string()).into()
    }
}

macro_rules! via_app_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    AppError::from(err).into()
                }
            }
        )+
    };
}

via_app_error!(
    PasswordError,
    RecordError,
    SummaryError,
    UserError,
    AccountError,
    CategoryError,
    TransactionError,
    BudgetError,
);

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[rstest]
    #[case(ApiError::validation("Name is required"), 400, "VALIDATION_ERROR")]
    #[case(ApiError::unauthorized("Access token required"), 401, "UNAUTHORIZED")]
    #[case(ApiError::not_found("Budget not found"), 404, "NOT_FOUND")]
    #[case(ApiError::from(UserError::EmailTaken), 409, "CONFLICT")]
    #[tokio::test]
    async fn test_client_errors_keep_message(
        #[case] error: ApiError,
        #[case] status: u16,
        #[case] code: &str,
    ) {
        let expected_message = error.inner().message().to_string();
        let response = error.into_response();
        assert_eq!(response.status().as_u16(), status);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["statusCode"], status);
        assert_eq!(body["errorCode"], code);
        assert_eq!(body["message"], expected_message.as_str());
        assert!(body["timestamp"].is_string());
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_server_errors_hide_cause() {
        let error = ApiError::from(DbErr::Custom("connection reset by peer".into()))
            .with_details(serde_json::json!({"query": "select"}));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], GENERIC_SERVER_ERROR);
        assert_eq!(body["errorCode"], "DATABASE_ERROR");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_details_are_passed_through() {
        let response = ApiError::validation("Invalid request body")
            .with_details(serde_json::json!("expected value at line 1"))
            .into_response();
        let body = body_json(response).await;
        assert_eq!(body["details"], "expected value at line 1");
    }

    #[test]
    fn test_date_order_maps_to_invalid_range() {
        let start = chrono::NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let end = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let error = ApiError::from(BudgetError::from(RecordError::InvalidDateOrder { start, end }));
        assert_eq!(error.inner().error_code(), "INVALID_RANGE");
    }

    #[test]
    fn test_ownership_errors_are_not_found() {
        let error = ApiError::from(TransactionError::CategoryNotOwned);
        assert_eq!(error.inner().status_code(), 404);
        assert_eq!(
            error.inner().message(),
            "Category not found or does not belong to you"
        );
    }
}
