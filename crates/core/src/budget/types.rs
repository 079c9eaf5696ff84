//! Inputs and outputs of the budget summary.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date_range::DateRange;
use crate::records::{CategoryType, TransactionType};

/// Display name of the bucket holding records without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Grouping key for budgets and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    /// Linked to an existing category.
    Known(Uuid),
    /// No category, or one that no longer exists.
    Uncategorized,
}

impl CategoryKey {
    /// Category id, `None` for the uncategorized bucket.
    #[must_use]
    pub const fn id(self) -> Option<Uuid> {
        match self {
            Self::Known(id) => Some(id),
            Self::Uncategorized => None,
        }
    }
}

impl From<Option<Uuid>> for CategoryKey {
    fn from(id: Option<Uuid>) -> Self {
        id.map_or(Self::Uncategorized, Self::Known)
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Category label as loaded from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    /// Category id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Income or expense.
    pub category_type: CategoryType,
}

/// An overall spending ceiling for a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyBudgetRecord {
    /// Row id.
    pub id: Uuid,
    /// Ceiling amount.
    pub amount: Decimal,
    /// Period start.
    pub start_date: NaiveDate,
    /// Period end.
    pub end_date: NaiveDate,
}

/// A per-category allotment, labelled with its category when it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetRecord {
    /// Row id.
    pub id: Uuid,
    /// Linked category, `None` when unset or dangling.
    pub category: Option<CategoryRecord>,
    /// Planned monthly allotment.
    pub monthly_amount: Option<Decimal>,
    /// Planned expense amount.
    pub expense_amount: Option<Decimal>,
}

impl BudgetRecord {
    /// Grouping key for this budget.
    #[must_use]
    pub fn key(&self) -> CategoryKey {
        CategoryKey::from(self.category.as_ref().map(|c| c.id))
    }
}

/// A recorded money movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Row id.
    pub id: Uuid,
    /// Always positive; direction comes from `transaction_type`.
    pub amount: Decimal,
    /// Income or expense.
    pub transaction_type: TransactionType,
    /// Linked category id, if any.
    pub category_id: Option<Uuid>,
    /// Booking date.
    pub date: NaiveDate,
}

/// Everything the summary reads, already scoped to one owner and range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryInputs {
    /// Ceilings overlapping the range.
    pub monthly_budgets: Vec<MonthlyBudgetRecord>,
    /// Budgets overlapping the range with at least one amount.
    pub budgets: Vec<BudgetRecord>,
    /// Transactions dated inside the range.
    pub transactions: Vec<TransactionRecord>,
    /// All of the owner's categories.
    pub categories: Vec<CategoryRecord>,
}

// ============================================================================
// Outputs
// ============================================================================

/// Group allotment against the global monthly ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitStatus {
    /// Allotment at or below the ceiling.
    WithinLimit,
    /// Allotment above the ceiling.
    OverLimit,
}

/// Group expense against the group allotment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    /// Expense at or below the allotment.
    WithinBudget,
    /// Expense above the allotment.
    OverBudget,
}

/// Per-category rollup of budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBudgetAggregate {
    /// `None` for the uncategorized bucket.
    pub category_id: Option<Uuid>,
    /// Display name of the category.
    pub category_name: String,
    /// Display type of the category.
    pub category_type: CategoryType,
    /// Sum of the group's monthly amounts.
    pub total_monthly_amount: Decimal,
    /// Sum of the group's expense amounts.
    pub total_expense_amount: Decimal,
    /// Monthly amount as a percentage of the ceiling.
    pub percentage_of_monthly: Decimal,
    /// Expense amount as a percentage of the ceiling.
    pub expense_percentage_of_monthly: Decimal,
    /// Expense amount as a percentage of the group's monthly amount.
    pub expense_vs_budget_percentage: Decimal,
    /// Monthly amount minus expense amount.
    pub remaining_budget: Decimal,
    /// Monthly amount against the ceiling.
    pub status: LimitStatus,
    /// Expense amount against the monthly amount.
    pub expense_status: ExpenseStatus,
    /// Number of budgets in the group.
    pub budget_count: usize,
}

/// Top-level totals and ratios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    /// Sum of the monthly ceilings.
    pub total_monthly_budget: Decimal,
    /// Sum of every budget's monthly amount.
    pub total_budget_monthly_amount: Decimal,
    /// Sum of every budget's expense amount.
    pub total_expense_amount: Decimal,
    /// Ceiling minus allotted amount.
    pub difference: Decimal,
    /// Allotted amount at or below the ceiling.
    pub is_within_limit: bool,
    /// Allotted amount as a percentage of the ceiling.
    pub utilization_percentage: Decimal,
    /// Expense as a percentage of the ceiling.
    pub expense_percentage_of_monthly: Decimal,
    /// Expense as a percentage of the allotted amount.
    pub expense_percentage_of_budgets: Decimal,
    /// Ceiling minus expense.
    pub remaining_from_monthly: Decimal,
    /// Allotted amount minus expense.
    pub remaining_from_budgets: Decimal,
    /// Number of category groups.
    pub category_count: usize,
    /// Number of budgets read.
    pub budget_count: usize,
    /// Number of monthly ceilings read.
    pub monthly_budget_count: usize,
}

/// One pie chart slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    /// Category name.
    pub name: String,
    /// Slice amount.
    pub value: Decimal,
    /// Slice share of the ceiling.
    pub percentage: Decimal,
    /// Hex color.
    pub color: String,
}

/// One category bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBar {
    /// Category name.
    pub name: String,
    /// Monthly amount.
    pub budget: Decimal,
    /// Expense amount.
    pub expense: Decimal,
    /// Monthly amount minus expense.
    pub remaining: Decimal,
    /// Expense as a percentage of the monthly amount.
    pub percentage: Decimal,
    /// Monthly amount against the ceiling.
    pub status: LimitStatus,
    /// Expense against the monthly amount.
    pub expense_status: ExpenseStatus,
}

/// Ceiling against allotments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyComparison {
    /// Sum of the ceilings.
    pub monthly_budget: Decimal,
    /// Sum of the allotments.
    pub allocated: Decimal,
    /// Ceiling minus allotments.
    pub unallocated: Decimal,
    /// Allotments as a percentage of the ceiling.
    pub allocated_percentage: Decimal,
    /// Allotments at or below the ceiling.
    pub is_within_limit: bool,
}

/// Allotments against planned expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseComparison {
    /// Sum of the allotments.
    pub allocated: Decimal,
    /// Sum of the expense amounts.
    pub spent: Decimal,
    /// Allotments minus expense.
    pub remaining: Decimal,
    /// Expense as a percentage of the allotments.
    pub spent_percentage: Decimal,
    /// Ceiling minus expense.
    pub remaining_from_monthly: Decimal,
}

/// Chart-ready projections of the aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    /// Monthly amount per category.
    pub budget_pie: Vec<PieSlice>,
    /// Expense amount per category.
    pub expense_pie: Vec<PieSlice>,
    /// Budget, expense and remaining per category.
    pub category_bar: Vec<CategoryBar>,
    /// Ceiling against allotments.
    pub monthly_comparison: MonthlyComparison,
    /// Allotments against expenses.
    pub expense_comparison: ExpenseComparison,
}

/// Recorded expense activity for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpending {
    /// `None` for the uncategorized bucket.
    pub category_id: Option<Uuid>,
    /// Display name of the category.
    pub category_name: String,
    /// Sum of the expense transactions.
    pub amount: Decimal,
    /// Number of expense transactions.
    pub count: usize,
    /// Share of total expense.
    pub percentage: Decimal,
}

/// Recorded income and expense inside the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBreakdown {
    /// Sum of income transactions.
    pub total_income: Decimal,
    /// Sum of expense transactions.
    pub total_expense: Decimal,
    /// Income minus expense.
    pub net: Decimal,
    /// Number of transactions read.
    pub count: usize,
    /// Expense grouped by category.
    pub by_category: Vec<CategorySpending>,
}

/// The full budget summary for one owner and range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    /// Range the summary covers.
    pub date_range: DateRange,
    /// Sum of the ceilings overlapping the range.
    pub monthly_budget: Decimal,
    /// Category groups in first-appearance order.
    pub category_budgets: Vec<CategoryBudgetAggregate>,
    /// Top-level totals.
    pub summary: SummaryTotals,
    /// Chart projections.
    pub chart_data: ChartData,
    /// Recorded transaction activity.
    pub transactions: TransactionBreakdown,
}
