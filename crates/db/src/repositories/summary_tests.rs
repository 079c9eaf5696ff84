//! Summary fetch tests against a mock connection.

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use spendwise_core::budget::{BudgetSummaryService, CategoryKey, DateRange};
use spendwise_core::records::CategoryType;
use uuid::Uuid;

use crate::entities::{
    budgets, categories, monthly_budgets, sea_orm_active_enums, transactions,
};
use crate::repositories::summary::{SummaryRepository, to_inputs};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn march() -> DateRange {
    DateRange::new(date(2025, 3, 1), date(2025, 3, 31)).unwrap()
}

fn category(user_id: Uuid, name: &str) -> categories::Model {
    categories::Model {
        id: Uuid::new_v4(),
        user_id,
        name: name.into(),
        category_type: sea_orm_active_enums::CategoryType::Expense,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn budget(user_id: Uuid, category_id: Option<Uuid>) -> budgets::Model {
    budgets::Model {
        id: Uuid::new_v4(),
        user_id,
        category_id,
        monthly_amount: Some(dec!(400)),
        expense_amount: Some(dec!(150)),
        start_date: date(2025, 3, 1),
        end_date: date(2025, 3, 31),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn ceiling(user_id: Uuid) -> monthly_budgets::Model {
    monthly_budgets::Model {
        id: Uuid::new_v4(),
        user_id,
        amount: dec!(1000),
        start_date: date(2025, 2, 15),
        end_date: date(2025, 3, 15),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn expense(user_id: Uuid, category_id: Option<Uuid>) -> transactions::Model {
    transactions::Model {
        id: Uuid::new_v4(),
        user_id,
        category_id,
        account_id: None,
        name: "Lunch".into(),
        amount: dec!(12.40),
        transaction_date: date(2025, 3, 3),
        transaction_type: sea_orm_active_enums::TransactionType::Expense,
        description: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

#[test]
fn test_budgets_labelled_from_categories() {
    let owner = Uuid::new_v4();
    let food = category(owner, "Food");
    let inputs = to_inputs(
        vec![ceiling(owner)],
        vec![
            budget(owner, Some(food.id)),
            budget(owner, None),
            budget(owner, Some(Uuid::new_v4())),
        ],
        vec![expense(owner, Some(food.id))],
        vec![food.clone()],
    );

    assert_eq!(inputs.budgets[0].key(), CategoryKey::Known(food.id));
    let label = inputs.budgets[0].category.as_ref().unwrap();
    assert_eq!(label.name, "Food");
    assert_eq!(label.category_type, CategoryType::Expense);
    assert_eq!(inputs.budgets[1].key(), CategoryKey::Uncategorized);
    // Dangling reference falls into the uncategorized bucket.
    assert_eq!(inputs.budgets[2].key(), CategoryKey::Uncategorized);
    assert_eq!(inputs.transactions[0].amount, dec!(12.40));
    assert_eq!(inputs.monthly_budgets[0].amount, dec!(1000));
}

#[tokio::test]
async fn test_fetch_runs_all_queries() {
    let owner = Uuid::new_v4();
    let food = category(owner, "Food");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![ceiling(owner)]])
        .append_query_results([vec![budget(owner, Some(food.id))]])
        .append_query_results([vec![expense(owner, Some(food.id))]])
        .append_query_results([vec![food.clone()]])
        .into_connection();

    let inputs = SummaryRepository::new(db)
        .fetch_inputs(owner, &march())
        .await
        .unwrap();
    let summary = BudgetSummaryService::summarize(march(), &inputs);

    assert_eq!(summary.monthly_budget, dec!(1000));
    assert_eq!(summary.category_budgets.len(), 1);
    assert_eq!(summary.category_budgets[0].category_name, "Food");
    assert_eq!(summary.category_budgets[0].percentage_of_monthly, dec!(40));
    assert_eq!(summary.transactions.total_expense, dec!(12.40));
}

/// Logged statements with their SQL quotes unescaped, in execution order.
fn logged_statements(db: DatabaseConnection) -> Vec<String> {
    db.into_transaction_log()
        .iter()
        .map(|t| format!("{t:?}").replace("\\\"", "\""))
        .collect()
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in {haystack}"))
}

#[tokio::test]
async fn test_fetch_filters_by_owner_and_range() {
    let owner = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<monthly_budgets::Model>::new()])
        .append_query_results([Vec::<budgets::Model>::new()])
        .append_query_results([Vec::<transactions::Model>::new()])
        .append_query_results([Vec::<categories::Model>::new()])
        .into_connection();

    SummaryRepository::new(db.clone())
        .fetch_inputs(owner, &march())
        .await
        .unwrap();

    let log = logged_statements(db);
    assert_eq!(log.len(), 4);
    let owner = owner.to_string();
    for statement in &log {
        assert!(statement.contains(&owner), "owner not bound in {statement}");
    }

    // Overlap: starts on or before the range end, ends on or after its start.
    let monthly = &log[0];
    assert!(monthly.contains(r#""monthly_budgets"."user_id" = $1"#));
    assert!(monthly.contains(r#""monthly_budgets"."start_date" <= $2"#));
    assert!(monthly.contains(r#""monthly_budgets"."end_date" >= $3"#));
    assert!(position(monthly, "2025-03-31") < position(monthly, "2025-03-01"));

    let budgets = &log[1];
    assert!(budgets.contains(r#""budgets"."user_id" = $1"#));
    assert!(budgets.contains(r#""budgets"."start_date" <= $2"#));
    assert!(budgets.contains(r#""budgets"."end_date" >= $3"#));
    assert!(budgets.contains(
        r#"("budgets"."monthly_amount" IS NOT NULL OR "budgets"."expense_amount" IS NOT NULL)"#
    ));
    assert!(position(budgets, "2025-03-31") < position(budgets, "2025-03-01"));

    // Inclusive on both ends.
    let transactions = &log[2];
    assert!(transactions.contains(r#""transactions"."user_id" = $1"#));
    assert!(transactions.contains(r#""transactions"."transaction_date" >= $2"#));
    assert!(transactions.contains(r#""transactions"."transaction_date" <= $3"#));
    assert!(position(transactions, "2025-03-01") < position(transactions, "2025-03-31"));

    let categories = &log[3];
    assert!(categories.contains(r#""categories"."user_id" = $1"#));
    assert!(!categories.contains("2025-03"));
}

#[tokio::test]
async fn test_fetch_failure_aborts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([sea_orm::DbErr::Custom("connection reset".into())])
        .into_connection();

    let result = SummaryRepository::new(db)
        .fetch_inputs(Uuid::new_v4(), &march())
        .await;

    assert!(result.is_err());
}
