//! Transaction repository tests against a mock connection.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase, Value};
use spendwise_core::records::TransactionType;
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums, transactions};
use crate::repositories::transaction::{
    CreateTransactionInput, TransactionError, TransactionRepository,
};

fn count_row(n: i64) -> Vec<BTreeMap<&'static str, Value>> {
    vec![BTreeMap::from([("num_items", Value::from(n))])]
}

fn input(category_id: Option<Uuid>) -> CreateTransactionInput {
    CreateTransactionInput {
        name: "Groceries".into(),
        amount: dec!(42.50),
        date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        transaction_type: TransactionType::Expense,
        description: None,
        category_id,
        account_id: None,
    }
}

#[tokio::test]
async fn test_foreign_category_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([count_row(0)])
        .into_connection();

    let result = TransactionRepository::new(db)
        .create(Uuid::new_v4(), input(Some(Uuid::new_v4())))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, TransactionError::CategoryNotOwned));
    assert_eq!(
        err.to_string(),
        "Category not found or does not belong to you"
    );
}

#[tokio::test]
async fn test_create_with_owned_category() {
    let owner = Uuid::new_v4();
    let category_id = Uuid::new_v4();
    let row = transactions::Model {
        id: Uuid::new_v4(),
        user_id: owner,
        category_id: Some(category_id),
        account_id: None,
        name: "Groceries".into(),
        amount: dec!(42.50),
        transaction_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        transaction_type: sea_orm_active_enums::TransactionType::Expense,
        description: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([count_row(1)])
        .append_query_results([vec![row.clone()]])
        .into_connection();

    let created = TransactionRepository::new(db)
        .create(owner, input(Some(category_id)))
        .await
        .unwrap();

    assert_eq!(created, row);
}

#[tokio::test]
async fn test_missing_transaction_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<transactions::Model>::new()])
        .into_connection();

    let result = TransactionRepository::new(db)
        .delete(Uuid::new_v4(), Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(TransactionError::NotFound)));
}
