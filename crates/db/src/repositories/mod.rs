//! Repository abstractions for data access.
//!
//! Every repository owns a `DatabaseConnection` clone and scopes its queries
//! to the owning user.

pub mod account;
pub mod budget;
pub mod category;
pub mod session;
pub mod summary;
pub mod transaction;
pub mod user;

#[cfg(test)]
mod account_tests;
#[cfg(test)]
mod summary_tests;
#[cfg(test)]
mod transaction_tests;
#[cfg(test)]
mod user_tests;

pub use account::{AccountError, AccountRepository, CreateAccountInput, UpdateAccountInput};
pub use budget::{
    BudgetError, BudgetFilter, BudgetRepository, CreateBudgetInput, MonthlyBudgetInput,
    UpdateBudgetInput,
};
pub use category::{CategoryError, CategoryRepository};
pub use session::SessionRepository;
pub use summary::SummaryRepository;
pub use transaction::{
    CreateTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
    UpdateTransactionInput,
};
pub use user::{NewUser, ProfileChanges, UserError, UserRepository};
