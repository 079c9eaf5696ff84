//! Budget summary aggregation.
//!
//! Pure arithmetic over records that were already fetched for one owner and
//! one date range. Nothing here touches storage or the clock.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};

use super::activity;
use super::chart;
use super::date_range::DateRange;
use super::types::{
    BudgetRecord, BudgetSummary, CategoryBudgetAggregate, CategoryKey, ExpenseStatus, LimitStatus,
    SummaryInputs, SummaryTotals, UNCATEGORIZED_LABEL,
};
use crate::records::CategoryType;

/// Budget summary service.
pub struct BudgetSummaryService;

impl BudgetSummaryService {
    /// Builds the summary for `range` from pre-fetched inputs.
    ///
    /// Deterministic: the same inputs always produce the same summary.
    #[must_use]
    pub fn summarize(range: DateRange, inputs: &SummaryInputs) -> BudgetSummary {
        let total_monthly_budget: Decimal = inputs.monthly_budgets.iter().map(|m| m.amount).sum();

        let category_budgets = Self::aggregate_by_category(&inputs.budgets, total_monthly_budget);
        let summary = Self::totals(
            total_monthly_budget,
            inputs,
            category_budgets.len(),
        );
        let chart_data = chart::build(&category_budgets, &summary);
        let transactions = activity::breakdown(&inputs.transactions, &inputs.categories);

        BudgetSummary {
            date_range: range,
            monthly_budget: total_monthly_budget,
            category_budgets,
            summary,
            chart_data,
            transactions,
        }
    }

    /// Groups budgets by category in first-appearance order.
    #[must_use]
    pub fn aggregate_by_category(
        budgets: &[BudgetRecord],
        total_monthly_budget: Decimal,
    ) -> Vec<CategoryBudgetAggregate> {
        let mut index: HashMap<CategoryKey, usize> = HashMap::new();
        let mut groups: Vec<Group<'_>> = Vec::new();

        for budget in budgets {
            let key = budget.key();
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Group::new(key, budget));
                groups.len() - 1
            });
            groups[slot].add(budget);
        }

        groups
            .into_iter()
            .map(|g| g.finish(total_monthly_budget))
            .collect()
    }

    fn totals(
        total_monthly_budget: Decimal,
        inputs: &SummaryInputs,
        category_count: usize,
    ) -> SummaryTotals {
        let total_budget_monthly: Decimal = inputs
            .budgets
            .iter()
            .map(|b| b.monthly_amount.unwrap_or_default())
            .sum();
        let total_expense: Decimal = inputs
            .budgets
            .iter()
            .map(|b| b.expense_amount.unwrap_or_default())
            .sum();

        SummaryTotals {
            total_monthly_budget,
            total_budget_monthly_amount: total_budget_monthly,
            total_expense_amount: total_expense,
            difference: round2(total_monthly_budget - total_budget_monthly),
            is_within_limit: total_budget_monthly <= total_monthly_budget,
            utilization_percentage: percent_of(total_budget_monthly, total_monthly_budget),
            expense_percentage_of_monthly: percent_of(total_expense, total_monthly_budget),
            expense_percentage_of_budgets: percent_of(total_expense, total_budget_monthly),
            remaining_from_monthly: round2(total_monthly_budget - total_expense),
            remaining_from_budgets: round2(total_budget_monthly - total_expense),
            category_count,
            budget_count: inputs.budgets.len(),
            monthly_budget_count: inputs.monthly_budgets.len(),
        }
    }
}

struct Group<'a> {
    key: CategoryKey,
    name: &'a str,
    category_type: CategoryType,
    monthly: Decimal,
    expense: Decimal,
    count: usize,
}

impl<'a> Group<'a> {
    fn new(key: CategoryKey, first: &'a BudgetRecord) -> Self {
        let (name, category_type) = first.category.as_ref().map_or(
            (UNCATEGORIZED_LABEL, CategoryType::Expense),
            |c| (c.name.as_str(), c.category_type),
        );
        Self {
            key,
            name,
            category_type,
            monthly: Decimal::ZERO,
            expense: Decimal::ZERO,
            count: 0,
        }
    }

    fn add(&mut self, budget: &BudgetRecord) {
        self.monthly += budget.monthly_amount.unwrap_or_default();
        self.expense += budget.expense_amount.unwrap_or_default();
        self.count += 1;
    }

    fn finish(self, total_monthly_budget: Decimal) -> CategoryBudgetAggregate {
        // Compared against the global ceiling, not a per-category share.
        let status = if self.monthly <= total_monthly_budget {
            LimitStatus::WithinLimit
        } else {
            LimitStatus::OverLimit
        };
        let expense_status = if self.expense <= self.monthly {
            ExpenseStatus::WithinBudget
        } else {
            ExpenseStatus::OverBudget
        };

        CategoryBudgetAggregate {
            category_id: self.key.id(),
            category_name: self.name.to_string(),
            category_type: self.category_type,
            total_monthly_amount: self.monthly,
            total_expense_amount: self.expense,
            percentage_of_monthly: percent_of(self.monthly, total_monthly_budget),
            expense_percentage_of_monthly: percent_of(self.expense, total_monthly_budget),
            expense_vs_budget_percentage: percent_of(self.expense, self.monthly),
            remaining_budget: round2(self.monthly - self.expense),
            status,
            expense_status,
            budget_count: self.count,
        }
    }
}

/// `part / whole * 100` rounded to 2 places; zero when `whole` is zero.
///
/// Stored amounts are NUMERIC(19,4), so the quotient always fits. An
/// overflow saturates toward the sign of the result.
#[must_use]
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or_else(
            || {
                if part.is_sign_negative() == whole.is_sign_negative() {
                    Decimal::MAX
                } else {
                    Decimal::MIN
                }
            },
            round2,
        )
}

/// Rounds to 2 decimal places with ties toward positive infinity.
///
/// `2.345` becomes `2.35` and `-2.345` becomes `-2.34`.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    value.round_dp_with_strategy(2, strategy)
}
