/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/Register` - Create an account and start a session
/// - `POST /api/Login` - Start a session
/// - `POST /api/Logout` - Clear session cookies
/// - `POST /api/Refresh` - Exchange the refresh cookie for a new access token
///
/// Sessions are two sealed cookies (`accessToken`, `refreshToken`). The raw
/// tokens are also returned in the body for clients that do not keep cookies.
/// Tokens are stateless: logout clears the cookies but an already issued
/// token stays valid until it expires.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use taskman_shared::{
    auth::{
        cookies::{clear_cookie, ACCESS_COOKIE, REFRESH_COOKIE},
        password,
    },
    models::user::{CreateUser, User},
    store::{self, StoreError},
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 255, message = "Username must be 3 to 255 characters"))]
    pub username: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "Password must be 6 to 128 characters"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub message: String,
    pub access_token: String,
}

/// Plain message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Issued token pair with the matching `Set-Cookie` values
struct Session {
    access_token: String,
    refresh_token: String,
    cookies: [(header::HeaderName, String); 2],
}

fn start_session(state: &AppState, user: &User) -> ApiResult<Session> {
    let access_token = state.tokens.issue_access(user)?;
    let refresh_token = state.tokens.issue_refresh(user)?;

    let cookies = [
        (header::SET_COOKIE, state.access_cookie(&access_token)?),
        (header::SET_COOKIE, state.refresh_cookie(&refresh_token)?),
    ];

    Ok(Session {
        access_token,
        refresh_token,
        cookies,
    })
}

/// Register a new user
///
/// ```text
/// POST /api/Register
/// {"username": "bob", "email": "bob@x.com", "password": "secret1"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or email already registered
/// - `500 Internal Server Error`: Hashing, store or signing failure
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let password_hash = password::hash_password_blocking(req.password).await?;

    let user = state
        .users
        .create(CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => ApiError::Conflict("User already exists".to_string()),
            other => other.into(),
        })?;

    info!(user_id = %user.id, "User registered");

    let session = start_session(&state, &user)?;

    Ok((
        StatusCode::CREATED,
        AppendHeaders(session.cookies),
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            id: user.id,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        }),
    ))
}

/// Log in with email and password
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = store::authenticate(state.users.as_ref(), &req.email, &req.password).await?;

    info!(user_id = %user.id, "User logged in");

    let session = start_session(&state, &user)?;

    Ok((
        AppendHeaders(session.cookies),
        Json(LoginResponse {
            message: "Login successful".to_string(),
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        }),
    ))
}

/// Clear both session cookies
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let secure = state.config.auth.use_https;

    (
        AppendHeaders([
            (header::SET_COOKIE, clear_cookie(ACCESS_COOKIE, secure)),
            (header::SET_COOKIE, clear_cookie(REFRESH_COOKIE, secure)),
        ]),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

/// Issue a new access token from the refresh cookie
///
/// The user is re-resolved by id, so a deleted account cannot refresh.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing, invalid or expired refresh cookie, or unknown user
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let refresh_token = state.read_token_cookie(&headers, REFRESH_COOKIE)?;
    let claims = state.tokens.validate_refresh(&refresh_token)?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    let access_token = state.tokens.issue_access(&user)?;
    let cookie = state.access_cookie(&access_token)?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(RefreshResponse {
            message: "Token refreshed".to_string(),
            access_token,
        }),
    ))
}
