//! Recorded income and expense transactions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use spendwise_core::records::TransactionType;
use spendwise_shared::AppError;
use uuid::Uuid;

use crate::entities::{accounts, categories, sea_orm_active_enums, transactions};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction absent or owned by someone else.
    #[error("Transaction not found")]
    NotFound,

    /// Referenced category is not the caller's.
    #[error("Category not found or does not belong to you")]
    CategoryNotOwned,

    /// Referenced account is not the caller's.
    #[error("Account not found or does not belong to you")]
    AccountNotOwned,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::Database(e) => Self::Database(e.to_string()),
            _ => Self::NotFound(err.to_string()),
        }
    }
}

/// Input for recording a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Label.
    pub name: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Booking date.
    pub date: NaiveDate,
    /// Income or expense.
    pub transaction_type: TransactionType,
    /// Free text.
    pub description: Option<String>,
    /// Owned category, if any.
    pub category_id: Option<Uuid>,
    /// Owned account, if any.
    pub account_id: Option<Uuid>,
}

/// Input for updating a transaction.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// Label.
    pub name: Option<String>,
    /// Positive amount.
    pub amount: Option<Decimal>,
    /// Booking date.
    pub date: Option<NaiveDate>,
    /// Income or expense.
    pub transaction_type: Option<TransactionType>,
    /// Free text.
    pub description: Option<String>,
    /// Owned category.
    pub category_id: Option<Uuid>,
    /// Owned account.
    pub account_id: Option<Uuid>,
}

/// Filter options for listing transactions. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Earliest date.
    pub start_date: Option<NaiveDate>,
    /// Latest date.
    pub end_date: Option<NaiveDate>,
    /// Only this category.
    pub category_id: Option<Uuid>,
    /// Only this direction.
    pub transaction_type: Option<TransactionType>,
}

/// Transaction repository, every call scoped to one owner.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a transaction after checking linked rows belong to the owner.
    ///
    /// # Errors
    ///
    /// Returns `CategoryNotOwned` / `AccountNotOwned` for foreign references.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        self.check_links(user_id, input.category_id, input.account_id)
            .await?;

        let now = chrono::Utc::now().into();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            category_id: Set(input.category_id),
            account_id: Set(input.account_id),
            name: Set(input.name),
            amount: Set(input.amount),
            transaction_date: Set(input.date),
            transaction_type: Set(input.transaction_type.into()),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(transaction.insert(&self.db).await?)
    }

    /// Lists the owner's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: TransactionFilter,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt);

        if let Some(start) = filter.start_date {
            query = query.filter(transactions::Column::TransactionDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(transactions::Column::TransactionDate.lte(end));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(kind) = filter.transaction_type {
            query = query.filter(
                transactions::Column::TransactionType
                    .eq(sea_orm_active_enums::TransactionType::from(kind)),
            );
        }

        Ok(query.all(&self.db).await?)
    }

    /// Finds one of the owner's transactions.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if absent or not owned.
    pub async fn find(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound)
    }

    /// Updates the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `CategoryNotOwned` / `AccountNotOwned` for new
    /// foreign references.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let existing = self.find(user_id, id).await?;
        self.check_links(user_id, input.category_id, input.account_id)
            .await?;

        let mut active: transactions::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(date) = input.date {
            active.transaction_date = Set(date);
        }
        if let Some(kind) = input.transaction_type {
            active.transaction_type = Set(kind.into());
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(Some(category_id));
        }
        if let Some(account_id) = input.account_id {
            active.account_id = Set(Some(account_id));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a transaction and returns the removed row.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if absent or not owned.
    pub async fn delete(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        let transaction = self.find(user_id, id).await?;
        transaction.clone().delete(&self.db).await?;
        Ok(transaction)
    }

    async fn check_links(
        &self,
        user_id: Uuid,
        category_id: Option<Uuid>,
        account_id: Option<Uuid>,
    ) -> Result<(), TransactionError> {
        if let Some(category_id) = category_id {
            let owned = categories::Entity::find_by_id(category_id)
                .filter(categories::Column::UserId.eq(user_id))
                .count(&self.db)
                .await?;
            if owned == 0 {
                return Err(TransactionError::CategoryNotOwned);
            }
        }
        if let Some(account_id) = account_id {
            let owned = accounts::Entity::find_by_id(account_id)
                .filter(accounts::Column::UserId.eq(user_id))
                .count(&self.db)
                .await?;
            if owned == 0 {
                return Err(TransactionError::AccountNotOwned);
            }
        }
        Ok(())
    }
}
