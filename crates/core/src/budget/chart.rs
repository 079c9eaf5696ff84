//! Chart projections over the category aggregates.

use super::types::{
    CategoryBar, CategoryBudgetAggregate, ChartData, ExpenseComparison, ExpenseStatus,
    LimitStatus, MonthlyComparison, PieSlice, SummaryTotals,
};

/// Slice color for a healthy value.
pub const GREEN: &str = "#10B981";
/// Slice color for an exceeded value.
pub const RED: &str = "#EF4444";

/// Builds every chart block from the aggregates and totals.
#[must_use]
pub fn build(aggregates: &[CategoryBudgetAggregate], totals: &SummaryTotals) -> ChartData {
    ChartData {
        budget_pie: aggregates.iter().map(budget_slice).collect(),
        expense_pie: aggregates.iter().map(expense_slice).collect(),
        category_bar: aggregates.iter().map(bar).collect(),
        monthly_comparison: MonthlyComparison {
            monthly_budget: totals.total_monthly_budget,
            allocated: totals.total_budget_monthly_amount,
            unallocated: totals.difference,
            allocated_percentage: totals.utilization_percentage,
            is_within_limit: totals.is_within_limit,
        },
        expense_comparison: ExpenseComparison {
            allocated: totals.total_budget_monthly_amount,
            spent: totals.total_expense_amount,
            remaining: totals.remaining_from_budgets,
            spent_percentage: totals.expense_percentage_of_budgets,
            remaining_from_monthly: totals.remaining_from_monthly,
        },
    }
}

fn budget_slice(agg: &CategoryBudgetAggregate) -> PieSlice {
    let color = match agg.status {
        LimitStatus::WithinLimit => GREEN,
        LimitStatus::OverLimit => RED,
    };
    PieSlice {
        name: agg.category_name.clone(),
        value: agg.total_monthly_amount,
        percentage: agg.percentage_of_monthly,
        color: color.to_string(),
    }
}

fn expense_slice(agg: &CategoryBudgetAggregate) -> PieSlice {
    let color = match agg.expense_status {
        ExpenseStatus::WithinBudget => GREEN,
        ExpenseStatus::OverBudget => RED,
    };
    PieSlice {
        name: agg.category_name.clone(),
        value: agg.total_expense_amount,
        percentage: agg.expense_percentage_of_monthly,
        color: color.to_string(),
    }
}

fn bar(agg: &CategoryBudgetAggregate) -> CategoryBar {
    CategoryBar {
        name: agg.category_name.clone(),
        budget: agg.total_monthly_amount,
        expense: agg.total_expense_amount,
        remaining: agg.remaining_budget,
        percentage: agg.expense_vs_budget_percentage,
        status: agg.status,
        expense_status: agg.expense_status,
    }
}
