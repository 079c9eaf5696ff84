//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// Distinguishes short-lived access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Presented on every authenticated request.
    Access,
    /// Exchanged for a new access token.
    Refresh,
}

/// JWT claims carried by both token kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User email at issue time.
    pub email: String,
    /// User display name at issue time.
    pub name: String,
    /// Token kind.
    pub kind: TokenKind,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        email: &str,
        name: &str,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_string(),
            name: name.to_string(),
            kind,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns true if this is an access token.
    #[must_use]
    pub fn is_access(&self) -> bool {
        self.kind == TokenKind::Access
    }
}

/// Token pair returned after successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}

/// Registration request payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// User email.
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// User password.
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

impl RegisterRequest {
    /// Checks presence, email format and password strength.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the first failed rule.
    pub fn check(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty()
        {
            return Err(AppError::Validation("All fields are required".into()));
        }
        let normalized = Self {
            name: self.name.clone(),
            email: normalize_email(&self.email),
            password: self.password.clone(),
        };
        normalized.validate().map_err(first_validation_error)
    }
}

/// Login request payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    /// User email.
    #[serde(default)]
    pub email: String,
    /// User password.
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    /// Checks that both credentials are present.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if either field is blank.
    pub fn check(&self) -> Result<(), AppError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".into(),
            ));
        }
        Ok(())
    }
}

/// Refresh token request. The token may instead arrive in a cookie.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Profile update request. Any subset of fields may be sent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// New password.
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: Option<String>,
    /// Must repeat `password` when a password is sent.
    pub confirm_password: Option<String>,
}

impl UpdateProfileRequest {
    /// Checks that something is being changed and that passwords agree.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` describing the problem.
    pub fn check(&self) -> Result<(), AppError> {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
        if blank(&self.name) && blank(&self.email) && blank(&self.password) {
            return Err(AppError::Validation("At least one field is required".into()));
        }
        if self.password.is_some() && self.password != self.confirm_password {
            return Err(AppError::Validation(
                "Password and confirm password do not match".into(),
            ));
        }
        let normalized = Self {
            email: self.email.as_deref().map(normalize_email),
            ..self.clone()
        };
        normalized.validate().map_err(first_validation_error)
    }
}

/// User info returned in auth and profile responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// User email.
    pub email: String,
    /// Whether the user currently holds a session.
    pub is_active: bool,
    /// Last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Last logout.
    pub last_logout_at: Option<DateTime<Utc>>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Response body for register and login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Authenticated user.
    pub user: UserInfo,
    /// Issued tokens.
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Lower-cases and trims an email address for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn first_validation_error(errors: ValidationErrors) -> AppError {
    let message = errors
        .field_errors()
        .into_values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| "Invalid request".to_string());
    AppError::Validation(message)
}
