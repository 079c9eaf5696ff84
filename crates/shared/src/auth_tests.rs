//! Auth payload validation tests.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::{
    Claims, LoginRequest, RegisterRequest, TokenKind, TokenPair, UpdateProfileRequest,
    normalize_email,
};
use crate::error::AppError;

fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        name: name.into(),
        email: email.into(),
        password: password.into(),
    }
}

fn validation_message(result: Result<(), AppError>) -> String {
    match result {
        Err(AppError::Validation(m)) => m,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn claims_sets_expiration_and_iat() {
    let user = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::minutes(30);
    let before = Utc::now().timestamp();
    let claims = Claims::new(user, "u@x.io", "U", TokenKind::Access, expires_at);
    let after = Utc::now().timestamp();

    assert_eq!(claims.sub, user);
    assert!(claims.iat >= before);
    assert!(claims.iat <= after);
    assert_eq!(claims.exp, expires_at.timestamp());
}

#[test]
fn token_pair_serializes_camel_case() {
    let pair = TokenPair::new("a".into(), "r".into(), 900);
    let json = serde_json::to_value(&pair).unwrap();

    assert_eq!(json["accessToken"], "a");
    assert_eq!(json["refreshToken"], "r");
    assert_eq!(json["expiresIn"], 900);
}

#[test]
fn register_accepts_valid_payload() {
    assert!(register("Ada", "  Ada@Example.com ", "secret1").check().is_ok());
}

#[test]
fn register_requires_all_fields() {
    let msg = validation_message(register("", "a@b.io", "secret1").check());
    assert_eq!(msg, "All fields are required");

    let msg = validation_message(register("Ada", "a@b.io", "").check());
    assert_eq!(msg, "All fields are required");
}

#[test]
fn register_rejects_bad_email() {
    let msg = validation_message(register("Ada", "not-an-email", "secret1").check());
    assert_eq!(msg, "Invalid email format");
}

#[test]
fn register_rejects_short_password() {
    let msg = validation_message(register("Ada", "a@b.io", "12345").check());
    assert_eq!(msg, "Password must be at least 6 characters long");
}

#[test]
fn login_requires_both_fields() {
    let req = LoginRequest {
        email: "a@b.io".into(),
        password: String::new(),
    };
    let msg = validation_message(req.check());
    assert_eq!(msg, "Email and password are required");
}

#[test]
fn update_profile_requires_a_field() {
    let msg = validation_message(UpdateProfileRequest::default().check());
    assert_eq!(msg, "At least one field is required");
}

#[test]
fn update_profile_requires_matching_passwords() {
    let req = UpdateProfileRequest {
        password: Some("secret1".into()),
        confirm_password: Some("secret2".into()),
        ..UpdateProfileRequest::default()
    };
    let msg = validation_message(req.check());
    assert_eq!(msg, "Password and confirm password do not match");
}

#[test]
fn update_profile_name_only_is_fine() {
    let req = UpdateProfileRequest {
        name: Some("New Name".into()),
        ..UpdateProfileRequest::default()
    };
    assert!(req.check().is_ok());
}

#[test]
fn update_profile_deserializes_camel_case() {
    let req: UpdateProfileRequest = serde_json::from_str(
        r#"{"password":"secret1","confirmPassword":"secret1"}"#,
    )
    .unwrap();
    assert_eq!(req.confirm_password.as_deref(), Some("secret1"));
    assert!(req.check().is_ok());
}

#[test]
fn normalize_email_trims_and_lowercases() {
    assert_eq!(normalize_email("  Foo@Bar.COM "), "foo@bar.com");
}
