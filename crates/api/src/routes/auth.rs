//! Authentication routes: register, login, token refresh, logout and profile.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    routing::{get, post, put},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extractors::ApiJson,
    middleware::{ACCESS_TOKEN_COOKIE, AuthUser},
    response::ApiResponse,
};
use spendwise_core::auth::{hash_password, verify_login};
use spendwise_db::{
    SessionRepository, UserRepository,
    entities::users,
    repositories::{NewUser, ProfileChanges},
};
use spendwise_shared::{
    TokenKind, TokenPair,
    auth::{
        AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, UpdateProfileRequest,
        UserInfo, normalize_email,
    },
};

/// Cookie carrying the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Public token endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh-token", post(refresh_token))
}

/// Endpoints that need a verified access token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/get-profile", get(get_profile))
        .route("/auth/update-profile", put(update_profile))
}

/// Response body for a refreshed access token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

/// Response body for logout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    /// When the logout was recorded.
    pub logout_time: DateTime<Utc>,
    /// The user that logged out.
    pub user_id: Uuid,
}

/// POST /auth/register
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(CookieJar, ApiResponse<AuthResponse>), ApiError> {
    payload.check()?;

    let email = normalize_email(&payload.email);
    let password_hash = hash_password(&payload.password)?;

    let name = payload.name.trim();
    let user_id = Uuid::new_v4();
    let tokens = state.jwt_service.generate_pair(user_id, &email, name)?;

    let user = UserRepository::new((*state.db).clone())
        .create_with_session(
            NewUser {
                id: user_id,
                name,
                email: &email,
                password_hash: &password_hash,
            },
            &tokens.refresh_token,
            refresh_expiry(&state),
        )
        .await?;

    info!(user_id = %user.id, "User registered");

    let jar = set_token_cookies(jar, &state, &tokens);
    Ok((
        jar,
        ApiResponse::created(
            "User registered successfully",
            AuthResponse {
                user: user_info(&user),
                tokens,
            },
        ),
    ))
}

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<AuthResponse>), ApiError> {
    payload.check()?;

    let user_repo = UserRepository::new((*state.db).clone());
    let email = normalize_email(&payload.email);
    let user = user_repo.find_by_email(&email).await?;

    let password_ok = verify_login(
        &payload.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    )?;
    let Some(user) = user.filter(|_| password_ok) else {
        info!(%email, "Failed login attempt");
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    let user = user_repo.record_login(user.id).await?;
    let tokens = issue_session(&state, &user).await?;

    info!(user_id = %user.id, "User logged in");

    let jar = set_token_cookies(jar, &state, &tokens);
    Ok((
        jar,
        ApiResponse::ok(
            "Login successful",
            AuthResponse {
                user: user_info(&user),
                tokens,
            },
        ),
    ))
}

/// POST /auth/refresh-token
///
/// The token comes from the JSON body when present, else from the cookie.
async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, ApiResponse<RefreshResponse>), ApiError> {
    let from_body = serde_json::from_slice::<RefreshRequest>(&body)
        .ok()
        .and_then(|r| r.refresh_token);
    let from_cookie = jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_owned());

    let Some(token) = from_body
        .into_iter()
        .chain(from_cookie)
        .find(|t| !t.trim().is_empty())
    else {
        return Err(ApiError::unauthorized("Refresh token is required"));
    };

    let claims = state
        .jwt_service
        .validate_kind(&token, TokenKind::Refresh)
        .map_err(|_| ApiError::unauthorized("Invalid refresh token"))?;

    let session = SessionRepository::new((*state.db).clone())
        .find_live(&token)
        .await?;
    if session.is_none_or(|s| s.user_id != claims.user_id()) {
        return Err(ApiError::unauthorized("Invalid refresh token"));
    }

    let user = UserRepository::new((*state.db).clone())
        .find_by_id(claims.user_id())
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::unauthorized("User not found or inactive"))?;

    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &user.email, &user.name)?;
    let expires_in = state.jwt_service.access_token_expires_in();

    let jar = jar.add(token_cookie(
        ACCESS_TOKEN_COOKIE,
        access_token.clone(),
        expires_in,
        state.cookies.secure,
    ));
    Ok((
        jar,
        ApiResponse::ok(
            "Access token refreshed successfully",
            RefreshResponse {
                access_token,
                expires_in,
            },
        ),
    ))
}

/// POST /auth/logout
async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    auth: AuthUser,
) -> Result<(CookieJar, ApiResponse<LogoutResponse>), ApiError> {
    let user_id = auth.user_id();

    let revoked = SessionRepository::new((*state.db).clone())
        .revoke_all_for_user(user_id)
        .await?;
    let user = UserRepository::new((*state.db).clone())
        .record_logout(user_id)
        .await?;

    info!(%user_id, revoked, "User logged out");

    let jar = jar
        .remove(Cookie::build((ACCESS_TOKEN_COOKIE, "")).path("/"))
        .remove(Cookie::build((REFRESH_TOKEN_COOKIE, "")).path("/"));
    Ok((
        jar,
        ApiResponse::ok(
            "Logged out successfully",
            LogoutResponse {
                logout_time: user
                    .last_logout_at
                    .map_or_else(Utc::now, |t| t.with_timezone(&Utc)),
                user_id,
            },
        ),
    ))
}

/// GET /auth/get-profile
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<ApiResponse<UserInfo>, ApiError> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::ok("User fetched successfully", user_info(&user)))
}

/// PUT /auth/update-profile
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<ApiResponse<UserInfo>, ApiError> {
    payload.check()?;

    let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let password_hash = non_blank(payload.password)
        .map(|p| hash_password(&p))
        .transpose()?;
    let changes = ProfileChanges {
        name: non_blank(payload.name).map(|n| n.trim().to_string()),
        email: non_blank(payload.email).map(|e| normalize_email(&e)),
        password_hash,
    };

    let user = UserRepository::new((*state.db).clone())
        .update_profile(auth.user_id(), changes)
        .await?;

    info!(user_id = %user.id, "Profile updated");
    Ok(ApiResponse::ok("User updated successfully", user_info(&user)))
}

/// Issues a token pair and records the refresh token as a live session.
async fn issue_session(state: &AppState, user: &users::Model) -> Result<TokenPair, ApiError> {
    let tokens = state
        .jwt_service
        .generate_pair(user.id, &user.email, &user.name)?;

    SessionRepository::new((*state.db).clone())
        .create(user.id, &tokens.refresh_token, refresh_expiry(state))
        .await?;

    Ok(tokens)
}

fn refresh_expiry(state: &AppState) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(state.jwt_service.refresh_token_expires_in())
}

fn set_token_cookies(jar: CookieJar, state: &AppState, tokens: &TokenPair) -> CookieJar {
    let secure = state.cookies.secure;
    jar.add(token_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
        state.jwt_service.access_token_expires_in(),
        secure,
    ))
    .add(token_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token.clone(),
        state.jwt_service.refresh_token_expires_in(),
        secure,
    ))
}

fn token_cookie(
    name: &'static str,
    value: String,
    max_age_secs: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

fn user_info(user: &users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        is_active: user.is_active,
        last_login_at: user.last_login_at.map(|t| t.with_timezone(&Utc)),
        last_logout_at: user.last_logout_at.map(|t| t.with_timezone(&Utc)),
        created_at: user.created_at.with_timezone(&Utc),
    }
}
