//! User repository for database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use spendwise_shared::AppError;
use uuid::Uuid;

use crate::entities::users;
use crate::repositories::session::SessionRepository;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email belongs to another user.
    #[error("User with this email already exists")]
    EmailTaken,

    /// User not found.
    #[error("User not found")]
    NotFound,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailTaken => Self::Conflict(err.to_string()),
            UserError::NotFound => Self::NotFound(err.to_string()),
            UserError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Profile fields to change. Email must already be normalized and the
/// password already hashed.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New argon2 hash.
    pub password_hash: Option<String>,
}

/// A user about to be registered. Email must already be normalized and the
/// password already hashed.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    /// Id chosen up front so tokens can be signed before the insert.
    pub id: Uuid,
    /// Display name.
    pub name: &'a str,
    /// Normalized email.
    pub email: &'a str,
    /// Argon2 hash.
    pub password_hash: &'a str,
}

impl NewUser<'_> {
    fn into_active_model(self) -> users::ActiveModel {
        let now = Utc::now().into();
        users::ActiveModel {
            id: Set(self.id),
            name: Set(self.name.to_string()),
            email: Set(self.email.to_string()),
            password_hash: Set(self.password_hash.to_string()),
            is_active: Set(true),
            last_login_at: Set(None),
            last_logout_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by normalized email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Registers a new, active user together with its first refresh-token
    /// session. Either both rows are stored or neither is.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmailTaken` if the email is registered already.
    pub async fn create_with_session(
        &self,
        user: NewUser<'_>,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<users::Model, UserError> {
        if self.email_exists(user.email, None).await? {
            return Err(UserError::EmailTaken);
        }

        let txn = self.db.begin().await?;

        let created = user.into_active_model().insert(&txn).await?;
        SessionRepository::new_session(created.id, refresh_token, expires_at)
            .insert(&txn)
            .await?;

        txn.commit().await?;

        Ok(created)
    }

    /// Marks the user active and stamps the login time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn record_login(&self, id: Uuid) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        users::ActiveModel {
            id: Set(id),
            is_active: Set(true),
            last_login_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&self.db)
        .await
    }

    /// Marks the user inactive and stamps the logout time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn record_logout(&self, id: Uuid) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        users::ActiveModel {
            id: Set(id),
            is_active: Set(false),
            last_logout_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&self.db)
        .await
    }

    /// Applies profile changes.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the user is gone, or
    /// `UserError::EmailTaken` if the new email belongs to someone else.
    pub async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<users::Model, UserError> {
        let user = self.find_by_id(id).await?.ok_or(UserError::NotFound)?;

        if let Some(email) = &changes.email
            && *email != user.email
            && self.email_exists(email, Some(id)).await?
        {
            return Err(UserError::EmailTaken);
        }

        let mut active: users::ActiveModel = user.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Checks whether an email is registered, optionally ignoring one user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str, except: Option<Uuid>) -> Result<bool, DbErr> {
        let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(users::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }
}
