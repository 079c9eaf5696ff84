//! Field-level rules applied before anything is persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendwise_shared::AppError;
use thiserror::Error;

/// Record validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// One or more required fields are absent or blank.
    #[error("{0}")]
    MissingFields(&'static str),

    /// A partial update carried nothing to change.
    #[error("At least one field is required")]
    NoFieldsToUpdate,

    /// An enumerated field holds an unknown value.
    #[error("Invalid {field} '{value}': expected one of {expected}")]
    InvalidKind {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },

    /// Start date falls after end date.
    #[error("Start date must be before end date")]
    InvalidDateOrder {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Amount below zero.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),

    /// Amount of zero or below where a positive value is needed.
    #[error("{0} must be greater than zero")]
    NonPositiveAmount(&'static str),

    /// A budget without any amount.
    #[error("Either monthlyAmount or expenseAmount is required")]
    MissingBudgetAmount,
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::InvalidDateOrder { .. } => Self::InvalidRange(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

/// Returns true when an optional text field is absent or whitespace.
#[must_use]
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Fails with `message` unless every flag is set.
///
/// # Errors
///
/// Returns `RecordError::MissingFields` if any flag is false.
pub fn require_fields(message: &'static str, present: &[bool]) -> Result<(), RecordError> {
    if present.iter().all(|p| *p) {
        Ok(())
    } else {
        Err(RecordError::MissingFields(message))
    }
}

/// Fails unless at least one flag is set.
///
/// # Errors
///
/// Returns `RecordError::NoFieldsToUpdate` if every flag is false.
pub fn require_any_field(present: &[bool]) -> Result<(), RecordError> {
    if present.iter().any(|p| *p) {
        Ok(())
    } else {
        Err(RecordError::NoFieldsToUpdate)
    }
}

/// Requires `start <= end`. Equal dates form a one-day span.
///
/// # Errors
///
/// Returns `RecordError::InvalidDateOrder` if start is after end.
pub fn ensure_date_order(start: NaiveDate, end: NaiveDate) -> Result<(), RecordError> {
    if start > end {
        return Err(RecordError::InvalidDateOrder { start, end });
    }
    Ok(())
}

/// # Errors
///
/// Returns `RecordError::NegativeAmount` if the amount is below zero.
pub fn ensure_non_negative(field: &'static str, amount: Decimal) -> Result<(), RecordError> {
    if amount < Decimal::ZERO {
        return Err(RecordError::NegativeAmount(field));
    }
    Ok(())
}

/// # Errors
///
/// Returns `RecordError::NonPositiveAmount` if the amount is zero or below.
pub fn ensure_positive(field: &'static str, amount: Decimal) -> Result<(), RecordError> {
    if amount <= Decimal::ZERO {
        return Err(RecordError::NonPositiveAmount(field));
    }
    Ok(())
}

/// A budget carries a monthly allotment, a one-off expense figure, or both.
///
/// # Errors
///
/// Returns `RecordError::MissingBudgetAmount` when both are absent, or
/// `RecordError::NegativeAmount` when a present amount is negative.
pub fn ensure_budget_amounts(
    monthly_amount: Option<Decimal>,
    expense_amount: Option<Decimal>,
) -> Result<(), RecordError> {
    if monthly_amount.is_none() && expense_amount.is_none() {
        return Err(RecordError::MissingBudgetAmount);
    }
    if let Some(amount) = monthly_amount {
        ensure_non_negative("monthlyAmount", amount)?;
    }
    if let Some(amount) = expense_amount {
        ensure_non_negative("expenseAmount", amount)?;
    }
    Ok(())
}
