//! Budget summary error types.

use chrono::NaiveDate;
use spendwise_shared::AppError;
use thiserror::Error;

/// Errors raised while resolving the summary's date range.
///
/// The aggregation itself cannot fail; only its inputs can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    /// A supplied date string did not parse.
    #[error("Invalid {field}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDate {
        /// Query or body field name.
        field: &'static str,
        /// Raw value received.
        value: String,
    },

    /// Start date falls after end date.
    #[error("startDate {start} must not be after endDate {end}")]
    InvalidRange {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },
}

impl From<SummaryError> for AppError {
    fn from(err: SummaryError) -> Self {
        match err {
            SummaryError::InvalidDate { .. } => Self::Validation(err.to_string()),
            SummaryError::InvalidRange { .. } => Self::InvalidRange(err.to_string()),
        }
    }
}
