//! `SeaORM` entity definitions, one module per table.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod monthly_budgets;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod transactions;
pub mod users;
