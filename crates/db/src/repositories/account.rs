//! Money accounts (checking, savings, cash...).

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use spendwise_shared::AppError;
use uuid::Uuid;

use crate::entities::accounts;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account absent or owned by someone else.
    #[error("Account not found")]
    NotFound,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound => Self::NotFound(err.to_string()),
            AccountError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Display name.
    pub name: String,
    /// Free text kind.
    pub account_type: String,
    /// Opening balance.
    pub balance: Decimal,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Display name.
    pub name: Option<String>,
    /// Free text kind.
    pub account_type: Option<String>,
    /// Balance.
    pub balance: Option<Decimal>,
}

/// Account repository, every call scoped to one owner.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(input.name),
            account_type: Set(input.account_type),
            balance: Set(input.balance),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Lists the owner's accounts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Finds one of the owner's accounts.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if absent or not owned.
    pub async fn find(&self, user_id: Uuid, id: Uuid) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(id)
            .filter(accounts::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound)
    }

    /// Updates the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if absent or not owned.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let mut active: accounts::ActiveModel = self.find(user_id, id).await?.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type);
        }
        if let Some(balance) = input.balance {
            active.balance = Set(balance);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an account and returns the removed row.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if absent or not owned.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<accounts::Model, AccountError> {
        let account = self.find(user_id, id).await?;
        account.clone().delete(&self.db).await?;
        Ok(account)
    }
}
