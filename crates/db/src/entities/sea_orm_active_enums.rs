//! Postgres enum types and their mapping onto core record kinds.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use spendwise_core::records;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "category_type")]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<records::CategoryType> for CategoryType {
    fn from(kind: records::CategoryType) -> Self {
        match kind {
            records::CategoryType::Income => Self::Income,
            records::CategoryType::Expense => Self::Expense,
        }
    }
}

impl From<CategoryType> for records::CategoryType {
    fn from(kind: CategoryType) -> Self {
        match kind {
            CategoryType::Income => Self::Income,
            CategoryType::Expense => Self::Expense,
        }
    }
}

impl From<records::TransactionType> for TransactionType {
    fn from(kind: records::TransactionType) -> Self {
        match kind {
            records::TransactionType::Income => Self::Income,
            records::TransactionType::Expense => Self::Expense,
        }
    }
}

impl From<TransactionType> for records::TransactionType {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Income => Self::Income,
            TransactionType::Expense => Self::Expense,
        }
    }
}
