//! Resolution of the reporting window for budget summaries.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::error::SummaryError;

/// Inclusive calendar date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First day included.
    pub start_date: NaiveDate,
    /// Last day included.
    pub end_date: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting a start after the end.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidRange` if `start > end`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, SummaryError> {
        if start_date > end_date {
            return Err(SummaryError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// First through last day of the month containing `today`.
    #[must_use]
    pub fn current_month(today: NaiveDate) -> Self {
        let start_date =
            NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
        let end_date = start_date
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self {
            start_date,
            end_date,
        }
    }

    /// Resolves optional caller-supplied bounds against the server clock.
    ///
    /// Both bounds must be present to override the default; a lone bound is
    /// ignored and the month containing `today` is used. Blank strings count
    /// as absent.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidDate` if a supplied bound does not parse,
    /// or `SummaryError::InvalidRange` if the parsed start is after the end.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, SummaryError> {
        let start = parse_bound("startDate", start)?;
        let end = parse_bound("endDate", end)?;

        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Ok(Self::current_month(today)),
        }
    }

    /// True when `[start, end]` shares at least one day with this range.
    #[must_use]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end_date && end >= self.start_date
    }

    /// True when `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

fn parse_bound(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>, SummaryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value)
            .map(Some)
            .ok_or_else(|| SummaryError::InvalidDate {
                field,
                value: value.to_string(),
            }),
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, or naive ISO timestamps.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}
