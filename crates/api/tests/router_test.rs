//! Router-level tests: envelopes, auth middleware and the summary endpoint.
//!
//! Handlers that fail before touching storage run against a disconnected
//! database; the summary happy path runs against a SeaORM mock.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, Value as DbValue};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use spendwise_api::{AppState, create_router};
use spendwise_db::entities::{
    budgets, categories, monthly_budgets, sea_orm_active_enums, transactions, users,
};
use spendwise_shared::{JwtConfig, JwtService, config::CookieConfig};

fn jwt(access_ttl: i64) -> JwtService {
    JwtService::new(JwtConfig {
        secret: "router-test-secret".into(),
        access_token_ttl_secs: access_ttl,
        refresh_token_ttl_secs: 3600,
    })
}

fn app_with(db: DatabaseConnection) -> Router {
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt(900)),
        cookies: CookieConfig::default(),
    };
    create_router(state, None)
}

fn app() -> Router {
    app_with(DatabaseConnection::Disconnected)
}

fn access_token(user_id: Uuid) -> String {
    jwt(900)
        .generate_access_token(user_id, "ann@example.com", "Ann")
        .unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_is_public() {
    let (status, body) = send(app(), get("/api/v1/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let (status, body) = send(app(), get("/api/v1/accounts/get-accounts", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["errorCode"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Access token required");
}

#[tokio::test]
async fn test_refresh_token_cannot_authenticate() {
    let refresh = jwt(900)
        .generate_refresh_token(Uuid::new_v4(), "ann@example.com", "Ann")
        .unwrap();
    let (status, body) = send(
        app(),
        get("/api/v1/budgets/budget-summary", Some(&refresh)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_expired_token_message() {
    let expired = jwt(-300)
        .generate_access_token(Uuid::new_v4(), "ann@example.com", "Ann")
        .unwrap();
    let (status, body) = send(app(), get("/api/v1/auth/get-profile", Some(&expired))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token has expired");
}

#[tokio::test]
async fn test_access_token_cookie_is_accepted() {
    let token = access_token(Uuid::new_v4());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/accounts/create-account")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, format!("accessToken={token}"))
        .body(Body::from(json!({"type": "checking"}).to_string()))
        .unwrap();

    // Authenticated, so the request reaches validation.
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Name and type are required");
}

#[tokio::test]
async fn test_register_requires_all_fields() {
    let (status, body) = send(
        app(),
        json_request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            &json!({"email": "ann@example.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");
}

fn registered(email: &str) -> users::Model {
    users::Model {
        id: Uuid::new_v4(),
        name: "Ann".into(),
        email: email.into(),
        password_hash: "$argon2id$v=19$stub".into(),
        is_active: true,
        last_login_at: None,
        last_logout_at: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn no_matches() -> Vec<BTreeMap<&'static str, DbValue>> {
    vec![BTreeMap::from([("num_items", DbValue::from(0i64))])]
}

#[tokio::test]
async fn test_register_fails_whole_when_session_cannot_be_stored() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([no_matches()])
        .append_query_results([vec![registered("ann@example.com")]])
        .append_query_errors([DbErr::Custom("sessions insert failed".into())])
        .into_connection();
    let request = json_request(
        Method::POST,
        "/api/v1/auth/register",
        None,
        &json!({"name": "Ann", "email": "ann@example.com", "password": "secret1"}),
    );

    let response = app_with(db).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn test_malformed_body_is_enveloped() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request body");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_refresh_without_token() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/refresh-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Refresh token is required");
}

#[tokio::test]
async fn test_bad_path_id() {
    let token = access_token(Uuid::new_v4());
    let (status, body) = send(
        app(),
        get("/api/v1/budgets/get-one-budget/not-a-uuid", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid path parameter");
}

#[tokio::test]
async fn test_transaction_amount_must_be_positive() {
    let token = access_token(Uuid::new_v4());
    let (status, body) = send(
        app(),
        json_request(
            Method::POST,
            "/api/v1/transactions/create-transaction",
            Some(&token),
            &json!({"name": "Refund", "amount": "-5", "type": "expense"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Amount must be greater than zero");
}

#[tokio::test]
async fn test_update_without_fields() {
    let token = access_token(Uuid::new_v4());
    let uri = format!("/api/v1/budgets/update-budget/{}", Uuid::new_v4());
    let (status, body) = send(app(), json_request(Method::PUT, &uri, Some(&token), &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "At least one field is required");
}

#[tokio::test]
async fn test_budget_needs_an_amount() {
    let token = access_token(Uuid::new_v4());
    let (status, body) = send(
        app(),
        json_request(
            Method::POST,
            "/api/v1/budgets/create-budget",
            Some(&token),
            &json!({"startDate": "2025-03-01", "endDate": "2025-03-31"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Either monthlyAmount or expenseAmount is required");
}

#[tokio::test]
async fn test_summary_rejects_bad_dates() {
    let token = access_token(Uuid::new_v4());

    let (status, body) = send(
        app(),
        get(
            "/api/v1/budgets/budget-summary?startDate=yesterday&endDate=2025-03-31",
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "VALIDATION_ERROR");

    let (status, body) = send(
        app(),
        json_request(
            Method::POST,
            "/api/v1/budgets/budget-summary",
            Some(&token),
            &json!({"startDate": "2025-04-01", "endDate": "2025-03-01"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "INVALID_RANGE");
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn summary_db(user_id: Uuid) -> DatabaseConnection {
    let now = Utc::now().fixed_offset();
    let food = categories::Model {
        id: Uuid::new_v4(),
        user_id,
        name: "Food".into(),
        category_type: sea_orm_active_enums::CategoryType::Expense,
        created_at: now,
        updated_at: now,
    };
    let ceiling = monthly_budgets::Model {
        id: Uuid::new_v4(),
        user_id,
        amount: dec!(1000),
        start_date: date(2025, 3, 1),
        end_date: date(2025, 3, 31),
        created_at: now,
        updated_at: now,
    };
    let food_budget = budgets::Model {
        id: Uuid::new_v4(),
        user_id,
        category_id: Some(food.id),
        monthly_amount: Some(dec!(400)),
        expense_amount: Some(dec!(150)),
        start_date: date(2025, 3, 1),
        end_date: date(2025, 3, 31),
        created_at: now,
        updated_at: now,
    };
    let groceries = transactions::Model {
        id: Uuid::new_v4(),
        user_id,
        category_id: Some(food.id),
        account_id: None,
        name: "Groceries".into(),
        amount: dec!(42.50),
        transaction_date: date(2025, 3, 4),
        transaction_type: sea_orm_active_enums::TransactionType::Expense,
        description: None,
        created_at: now,
        updated_at: now,
    };

    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![ceiling]])
        .append_query_results([vec![food_budget]])
        .append_query_results([vec![groceries]])
        .append_query_results([vec![food]])
        .into_connection()
}

/// Money travels as decimal strings; compare by value, not by scale.
fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_summary_happy_path() {
    let user_id = Uuid::new_v4();
    let token = access_token(user_id);

    let (status, body) = send(
        app_with(summary_db(user_id)),
        get(
            "/api/v1/budgets/budget-summary?startDate=2025-03-01&endDate=2025-03-31",
            Some(&token),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Budget summary fetched successfully");

    let data = &body["data"];
    assert_eq!(data["dateRange"]["startDate"], "2025-03-01");
    assert_eq!(data["dateRange"]["endDate"], "2025-03-31");
    assert_eq!(decimal(&data["monthlyBudget"]), dec!(1000));

    let food = &data["categoryBudgets"][0];
    assert_eq!(food["categoryName"], "Food");
    assert_eq!(decimal(&food["percentageOfMonthly"]), dec!(40));
    assert_eq!(food["status"], "within_limit");
    assert_eq!(data["categoryBudgets"].as_array().unwrap().len(), 1);

    assert_eq!(data["transactions"]["count"], 1);
    assert_eq!(data["chartData"]["budgetPie"][0]["color"], "#10B981");
}

#[tokio::test]
async fn test_cors_with_frontend_url_allows_credentials() {
    let state = AppState {
        db: Arc::new(DatabaseConnection::Disconnected),
        jwt_service: Arc::new(jwt(900)),
        cookies: CookieConfig::default(),
    };
    let app = create_router(state, Some("http://localhost:5173"));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/auth/login")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}
