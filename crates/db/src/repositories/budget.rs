//! Per-category budgets and monthly spending ceilings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use spendwise_core::records::{RecordError, validation::ensure_date_order};
use spendwise_shared::AppError;
use uuid::Uuid;

use crate::entities::{budgets, categories, monthly_budgets};

/// Error types for budget and monthly budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Budget absent or owned by someone else.
    #[error("Budget not found")]
    NotFound,

    /// Monthly budget absent or owned by someone else.
    #[error("Monthly budget not found")]
    MonthlyNotFound,

    /// Referenced category is not the caller's.
    #[error("Category not found or does not belong to you")]
    CategoryNotOwned,

    /// The merged record breaks a field rule.
    #[error(transparent)]
    Invalid(#[from] RecordError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::Invalid(e) => e.into(),
            BudgetError::Database(e) => Self::Database(e.to_string()),
            _ => Self::NotFound(err.to_string()),
        }
    }
}

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Owned category, if any.
    pub category_id: Option<Uuid>,
    /// Monthly allotment.
    pub monthly_amount: Option<Decimal>,
    /// Planned expense.
    pub expense_amount: Option<Decimal>,
    /// Period start.
    pub start_date: NaiveDate,
    /// Period end.
    pub end_date: NaiveDate,
}

/// Input for updating a budget.
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetInput {
    /// Owned category.
    pub category_id: Option<Uuid>,
    /// Monthly allotment.
    pub monthly_amount: Option<Decimal>,
    /// Planned expense.
    pub expense_amount: Option<Decimal>,
    /// Period start.
    pub start_date: Option<NaiveDate>,
    /// Period end.
    pub end_date: Option<NaiveDate>,
}

/// Filter options for listing budgets. Dates select overlapping periods.
#[derive(Debug, Clone, Default)]
pub struct BudgetFilter {
    /// Periods ending on or after this date.
    pub start_date: Option<NaiveDate>,
    /// Periods starting on or before this date.
    pub end_date: Option<NaiveDate>,
    /// Only this category.
    pub category_id: Option<Uuid>,
}

/// Input for a monthly ceiling, used for both create and update.
#[derive(Debug, Clone, Default)]
pub struct MonthlyBudgetInput {
    /// Ceiling amount.
    pub amount: Option<Decimal>,
    /// Period start.
    pub start_date: Option<NaiveDate>,
    /// Period end.
    pub end_date: Option<NaiveDate>,
}

/// Budget repository, every call scoped to one owner.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::CategoryNotOwned` for a foreign category.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateBudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        ensure_date_order(input.start_date, input.end_date)?;
        self.check_category(user_id, input.category_id).await?;

        let now = chrono::Utc::now().into();
        let budget = budgets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            category_id: Set(input.category_id),
            monthly_amount: Set(input.monthly_amount),
            expense_amount: Set(input.expense_amount),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(budget.insert(&self.db).await?)
    }

    /// Lists the owner's budgets by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: BudgetFilter,
    ) -> Result<Vec<budgets::Model>, BudgetError> {
        let mut query = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .order_by_asc(budgets::Column::StartDate)
            .order_by_asc(budgets::Column::CreatedAt);

        if let Some(start) = filter.start_date {
            query = query.filter(budgets::Column::EndDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(budgets::Column::StartDate.lte(end));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(budgets::Column::CategoryId.eq(category_id));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Finds one of the owner's budgets.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if absent or not owned.
    pub async fn find(&self, user_id: Uuid, id: Uuid) -> Result<budgets::Model, BudgetError> {
        budgets::Entity::find_by_id(id)
            .filter(budgets::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(BudgetError::NotFound)
    }

    /// Updates the supplied fields, re-checking date order on the merged row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `CategoryNotOwned`, or `Invalid` when the merged
    /// period is reversed.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateBudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        let existing = self.find(user_id, id).await?;
        ensure_date_order(
            input.start_date.unwrap_or(existing.start_date),
            input.end_date.unwrap_or(existing.end_date),
        )?;
        self.check_category(user_id, input.category_id).await?;

        let mut active: budgets::ActiveModel = existing.into();
        if let Some(category_id) = input.category_id {
            active.category_id = Set(Some(category_id));
        }
        if let Some(amount) = input.monthly_amount {
            active.monthly_amount = Set(Some(amount));
        }
        if let Some(amount) = input.expense_amount {
            active.expense_amount = Set(Some(amount));
        }
        if let Some(start) = input.start_date {
            active.start_date = Set(start);
        }
        if let Some(end) = input.end_date {
            active.end_date = Set(end);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a budget and returns the removed row.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if absent or not owned.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<budgets::Model, BudgetError> {
        let budget = self.find(user_id, id).await?;
        budget.clone().delete(&self.db).await?;
        Ok(budget)
    }

    // ------------------------------------------------------------------
    // Monthly ceilings
    // ------------------------------------------------------------------

    /// Creates a monthly ceiling. All three fields must be present.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for a missing field or a reversed period.
    pub async fn create_monthly(
        &self,
        user_id: Uuid,
        input: MonthlyBudgetInput,
    ) -> Result<monthly_budgets::Model, BudgetError> {
        let (Some(amount), Some(start_date), Some(end_date)) =
            (input.amount, input.start_date, input.end_date)
        else {
            return Err(RecordError::MissingFields("Amount, startDate and endDate are required").into());
        };
        ensure_date_order(start_date, end_date)?;

        let now = chrono::Utc::now().into();
        let monthly = monthly_budgets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            amount: Set(amount),
            start_date: Set(start_date),
            end_date: Set(end_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(monthly.insert(&self.db).await?)
    }

    /// Lists the owner's monthly ceilings by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_monthly(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<monthly_budgets::Model>, BudgetError> {
        Ok(monthly_budgets::Entity::find()
            .filter(monthly_budgets::Column::UserId.eq(user_id))
            .order_by_asc(monthly_budgets::Column::StartDate)
            .all(&self.db)
            .await?)
    }

    /// Finds one of the owner's monthly ceilings.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::MonthlyNotFound` if absent or not owned.
    pub async fn find_monthly(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<monthly_budgets::Model, BudgetError> {
        monthly_budgets::Entity::find_by_id(id)
            .filter(monthly_budgets::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(BudgetError::MonthlyNotFound)
    }

    /// Updates a monthly ceiling, re-checking date order on the merged row.
    ///
    /// # Errors
    ///
    /// Returns `MonthlyNotFound` or `Invalid`.
    pub async fn update_monthly(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: MonthlyBudgetInput,
    ) -> Result<monthly_budgets::Model, BudgetError> {
        let existing = self.find_monthly(user_id, id).await?;
        ensure_date_order(
            input.start_date.unwrap_or(existing.start_date),
            input.end_date.unwrap_or(existing.end_date),
        )?;

        let mut active: monthly_budgets::ActiveModel = existing.into();
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(start) = input.start_date {
            active.start_date = Set(start);
        }
        if let Some(end) = input.end_date {
            active.end_date = Set(end);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a monthly ceiling and returns the removed row.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::MonthlyNotFound` if absent or not owned.
    pub async fn delete_monthly(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<monthly_budgets::Model, BudgetError> {
        let monthly = self.find_monthly(user_id, id).await?;
        monthly.clone().delete(&self.db).await?;
        Ok(monthly)
    }

    async fn check_category(
        &self,
        user_id: Uuid,
        category_id: Option<Uuid>,
    ) -> Result<(), BudgetError> {
        let Some(category_id) = category_id else {
            return Ok(());
        };
        let owned = categories::Entity::find_by_id(category_id)
            .filter(categories::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;
        if owned == 0 {
            return Err(BudgetError::CategoryNotOwned);
        }
        Ok(())
    }
}
