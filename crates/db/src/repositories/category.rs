//! Income and expense categories.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use spendwise_core::records::CategoryType;
use spendwise_shared::AppError;
use uuid::Uuid;

use crate::entities::{categories, sea_orm_active_enums};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category absent or owned by someone else.
    #[error("Category not found")]
    NotFound,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound => Self::NotFound(err.to_string()),
            CategoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Category repository, every call scoped to one owner.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        name: String,
        category_type: CategoryType,
    ) -> Result<categories::Model, CategoryError> {
        let now = chrono::Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(name),
            category_type: Set(category_type.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Lists the owner's categories, optionally of one kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<categories::Model>, CategoryError> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Name);

        if let Some(kind) = category_type {
            query = query.filter(
                categories::Column::CategoryType.eq(sea_orm_active_enums::CategoryType::from(kind)),
            );
        }

        Ok(query.all(&self.db).await?)
    }

    /// Finds one of the owner's categories.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if absent or not owned.
    pub async fn find(&self, user_id: Uuid, id: Uuid) -> Result<categories::Model, CategoryError> {
        categories::Entity::find_by_id(id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound)
    }

    /// Updates name and/or kind.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if absent or not owned.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        name: Option<String>,
        category_type: Option<CategoryType>,
    ) -> Result<categories::Model, CategoryError> {
        let mut active: categories::ActiveModel = self.find(user_id, id).await?.into();

        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(kind) = category_type {
            active.category_type = Set(kind.into());
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a category. Linked budgets and transactions become
    /// uncategorized.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if absent or not owned.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<categories::Model, CategoryError> {
        let category = self.find(user_id, id).await?;
        category.clone().delete(&self.db).await?;
        Ok(category)
    }
}
