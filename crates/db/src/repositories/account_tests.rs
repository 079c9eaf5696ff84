//! Account repository tests against a mock connection.

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use crate::entities::accounts;
use crate::repositories::account::{
    AccountError, AccountRepository, CreateAccountInput, UpdateAccountInput,
};

fn account(user_id: Uuid, name: &str) -> accounts::Model {
    accounts::Model {
        id: Uuid::new_v4(),
        user_id,
        name: name.to_string(),
        account_type: "checking".to_string(),
        balance: dec!(250.00),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

#[tokio::test]
async fn test_create_returns_inserted_row() {
    let owner = Uuid::new_v4();
    let row = account(owner, "Main");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row.clone()]])
        .into_connection();

    let created = AccountRepository::new(db)
        .create(
            owner,
            CreateAccountInput {
                name: "Main".into(),
                account_type: "checking".into(),
                balance: dec!(250.00),
            },
        )
        .await
        .unwrap();

    assert_eq!(created, row);
}

#[tokio::test]
async fn test_find_foreign_account_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<accounts::Model>::new()])
        .into_connection();

    let result = AccountRepository::new(db)
        .find(Uuid::new_v4(), Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(AccountError::NotFound)));
}

#[tokio::test]
async fn test_update_applies_changes() {
    let owner = Uuid::new_v4();
    let existing = account(owner, "Main");
    let updated = accounts::Model {
        name: "Savings".into(),
        ..existing.clone()
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()], vec![updated.clone()]])
        .into_connection();

    let result = AccountRepository::new(db)
        .update(
            owner,
            existing.id,
            UpdateAccountInput {
                name: Some("Savings".into()),
                ..UpdateAccountInput::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(result.name, "Savings");
}

#[tokio::test]
async fn test_delete_returns_removed_row() {
    let owner = Uuid::new_v4();
    let existing = account(owner, "Cash");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let removed = AccountRepository::new(db)
        .delete(owner, existing.id)
        .await
        .unwrap();

    assert_eq!(removed, existing);
}
