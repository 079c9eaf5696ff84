//! User and session repository tests against a mock connection.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, Value};
use uuid::Uuid;

use crate::entities::{sessions, users};
use crate::repositories::session::SessionRepository;
use crate::repositories::user::{NewUser, ProfileChanges, UserError, UserRepository};

fn user(email: &str) -> users::Model {
    users::Model {
        id: Uuid::new_v4(),
        name: "Ada".into(),
        email: email.into(),
        password_hash: "$argon2id$v=19$stub".into(),
        is_active: true,
        last_login_at: None,
        last_logout_at: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn count_row(n: i64) -> Vec<BTreeMap<&'static str, Value>> {
    vec![BTreeMap::from([("num_items", Value::from(n))])]
}

fn session(user_id: Uuid) -> sessions::Model {
    sessions::Model {
        id: Uuid::new_v4(),
        user_id,
        refresh_token_hash: SessionRepository::hash_token("refresh-token"),
        expires_at: (Utc::now() + Duration::days(7)).into(),
        revoked_at: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn new_user(row: &users::Model) -> NewUser<'_> {
    NewUser {
        id: row.id,
        name: &row.name,
        email: &row.email,
        password_hash: &row.password_hash,
    }
}

fn logged(db: DatabaseConnection) -> String {
    format!("{:?}", db.into_transaction_log())
}

#[tokio::test]
async fn test_register_rejects_taken_email() {
    let row = user("ada@example.com");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([count_row(1)])
        .into_connection();

    let result = UserRepository::new(db)
        .create_with_session(new_user(&row), "refresh-token", Utc::now() + Duration::days(7))
        .await;

    assert!(matches!(result, Err(UserError::EmailTaken)));
}

#[tokio::test]
async fn test_register_stores_user_and_session_together() {
    let row = user("ada@example.com");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([count_row(0)])
        .append_query_results([vec![row.clone()]])
        .append_query_results([vec![session(row.id)]])
        .into_connection();

    let created = UserRepository::new(db.clone())
        .create_with_session(new_user(&row), "refresh-token", Utc::now() + Duration::days(7))
        .await
        .unwrap();

    assert!(created.is_active);
    assert_eq!(created.email, "ada@example.com");

    let log = logged(db);
    assert!(log.contains("BEGIN"));
    assert!(log.contains("INSERT INTO \\\"users\\\""));
    assert!(log.contains("INSERT INTO \\\"sessions\\\""));
    assert!(log.contains("COMMIT"));
}

#[tokio::test]
async fn test_register_session_failure_is_not_committed() {
    let row = user("ada@example.com");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([count_row(0)])
        .append_query_results([vec![row.clone()]])
        .append_query_errors([DbErr::Custom("sessions insert failed".into())])
        .into_connection();

    let result = UserRepository::new(db.clone())
        .create_with_session(new_user(&row), "refresh-token", Utc::now() + Duration::days(7))
        .await;

    assert!(matches!(result, Err(UserError::Database(_))));
    assert!(!logged(db).contains("COMMIT"));
}

#[tokio::test]
async fn test_profile_email_change_checks_other_users() {
    let existing = user("ada@example.com");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()]])
        .append_query_results([count_row(1)])
        .into_connection();

    let result = UserRepository::new(db)
        .update_profile(
            existing.id,
            ProfileChanges {
                email: Some("grace@example.com".into()),
                ..ProfileChanges::default()
            },
        )
        .await;

    assert!(matches!(result, Err(UserError::EmailTaken)));
}

#[tokio::test]
async fn test_profile_update_missing_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<users::Model>::new()])
        .into_connection();

    let result = UserRepository::new(db)
        .update_profile(Uuid::new_v4(), ProfileChanges::default())
        .await;

    assert!(matches!(result, Err(UserError::NotFound)));
}

#[test]
fn test_token_hash_is_hex_sha256() {
    let hash = SessionRepository::hash_token("refresh-token");

    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(hash, SessionRepository::hash_token("refresh-token"));
    assert_ne!(hash, SessionRepository::hash_token("refresh-token2"));
}
