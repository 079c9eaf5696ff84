//! Budget summary: date range resolution, per-category aggregation and
//! chart projections.

pub mod activity;
pub mod chart;
pub mod date_range;
pub mod error;
pub mod summary;
pub mod types;


pub use date_range::DateRange;
pub use error::SummaryError;
pub use summary::BudgetSummaryService;
pub use types::{
    BudgetRecord, BudgetSummary, CategoryBudgetAggregate, CategoryKey, CategoryRecord,
    CategorySpending, ChartData, ExpenseStatus, LimitStatus, MonthlyBudgetRecord, SummaryInputs,
    SummaryTotals, TransactionBreakdown, TransactionRecord, UNCATEGORIZED_LABEL,
};
