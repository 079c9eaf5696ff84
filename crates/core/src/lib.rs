//! Core business logic for Spendwise.
//!
//! Pure logic with no web or database dependencies. Storage rows are mapped
//! into the record types defined here before any calculation runs.
//!
//! # Modules
//!
//! - `auth` - Password hashing and verification
//! - `budget` - Date range resolution and the budget summary
//! - `records` - Record kinds and field validation rules

pub mod auth;
pub mod budget;
pub mod records;
