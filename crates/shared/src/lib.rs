//! Shared errors, configuration and authentication types for Spendwise.
//!
//! This crate provides common building blocks used across all other crates:
//! - Application-wide error taxonomy with HTTP status mapping
//! - Layered configuration management
//! - JWT issuance and verification
//! - Auth request and response payloads

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

#[cfg(test)]
mod auth_tests;

pub use auth::{Claims, TokenKind, TokenPair};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
