//! Loads everything the budget summary reads for one owner and range.

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use spendwise_core::budget::{
    BudgetRecord, CategoryRecord, DateRange, MonthlyBudgetRecord, SummaryInputs,
    TransactionRecord,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{budgets, categories, monthly_budgets, transactions};

/// Read-only repository feeding the summary engine.
#[derive(Debug, Clone)]
pub struct SummaryRepository {
    db: DatabaseConnection,
}

impl SummaryRepository {
    /// Creates a new summary repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Runs the four summary queries concurrently and maps the rows into
    /// engine records. The first failing query fails the whole fetch.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn fetch_inputs(
        &self,
        user_id: Uuid,
        range: &DateRange,
    ) -> Result<SummaryInputs, DbErr> {
        let monthly_query = monthly_budgets::Entity::find()
            .filter(monthly_budgets::Column::UserId.eq(user_id))
            .filter(monthly_budgets::Column::StartDate.lte(range.end_date))
            .filter(monthly_budgets::Column::EndDate.gte(range.start_date))
            .order_by_asc(monthly_budgets::Column::StartDate)
            .all(&self.db);

        let budget_query = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .filter(budgets::Column::StartDate.lte(range.end_date))
            .filter(budgets::Column::EndDate.gte(range.start_date))
            .filter(
                Condition::any()
                    .add(budgets::Column::MonthlyAmount.is_not_null())
                    .add(budgets::Column::ExpenseAmount.is_not_null()),
            )
            .order_by_asc(budgets::Column::StartDate)
            .order_by_asc(budgets::Column::CreatedAt)
            .all(&self.db);

        let transaction_query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::TransactionDate.gte(range.start_date))
            .filter(transactions::Column::TransactionDate.lte(range.end_date))
            .order_by_asc(transactions::Column::TransactionDate)
            .all(&self.db);

        let category_query = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .all(&self.db);

        let (monthly_rows, budget_rows, transaction_rows, category_rows) = tokio::try_join!(
            monthly_query,
            budget_query,
            transaction_query,
            category_query
        )?;

        debug!(
            %user_id,
            start = %range.start_date,
            end = %range.end_date,
            monthly = monthly_rows.len(),
            budgets = budget_rows.len(),
            transactions = transaction_rows.len(),
            "Fetched summary inputs"
        );

        Ok(to_inputs(monthly_rows, budget_rows, transaction_rows, category_rows))
    }
}

/// Maps storage rows into engine records, labelling budgets from the
/// category rows. A budget whose category is missing counts as uncategorized.
#[must_use]
pub fn to_inputs(
    monthly_rows: Vec<monthly_budgets::Model>,
    budget_rows: Vec<budgets::Model>,
    transaction_rows: Vec<transactions::Model>,
    category_rows: Vec<categories::Model>,
) -> SummaryInputs {
    let categories: Vec<CategoryRecord> = category_rows
        .into_iter()
        .map(|c| CategoryRecord {
            id: c.id,
            name: c.name,
            category_type: c.category_type.into(),
        })
        .collect();
    let by_id: HashMap<Uuid, &CategoryRecord> = categories.iter().map(|c| (c.id, c)).collect();

    let budgets = budget_rows
        .into_iter()
        .map(|b| BudgetRecord {
            id: b.id,
            category: b
                .category_id
                .and_then(|id| by_id.get(&id).map(|c| (*c).clone())),
            monthly_amount: b.monthly_amount,
            expense_amount: b.expense_amount,
        })
        .collect();

    let monthly_budgets = monthly_rows
        .into_iter()
        .map(|m| MonthlyBudgetRecord {
            id: m.id,
            amount: m.amount,
            start_date: m.start_date,
            end_date: m.end_date,
        })
        .collect();

    let transactions = transaction_rows
        .into_iter()
        .map(|t| TransactionRecord {
            id: t.id,
            amount: t.amount,
            transaction_type: t.transaction_type.into(),
            category_id: t.category_id,
            date: t.transaction_date,
        })
        .collect();

    SummaryInputs {
        monthly_budgets,
        budgets,
        transactions,
        categories,
    }
}
