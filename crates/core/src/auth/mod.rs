//! Credential handling.

mod password;

pub use password::{PasswordError, hash_password, verify_login, verify_password};
