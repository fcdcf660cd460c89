/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskman_api::{app::{build_router, AppState}, config::Config};
/// use taskman_shared::store::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let store = Arc::new(MemoryStore::new(config.store.operation_timeout));
/// let state = AppState::new(config, store.clone(), store)?;
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    middleware::{logging, security::security_headers},
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::{from_fn_with_state, map_response_with_state, Next},
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Duration;
use std::sync::Arc;
use taskman_shared::{
    auth::{
        cookies::{self, CookieSealer, ACCESS_COOKIE, REFRESH_COOKIE},
        jwt::TokenService,
    },
    store::{TaskStore, UserStore},
};
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; every field
/// is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Token issuing and validation
    pub tokens: TokenService,

    /// Cookie value encryption
    pub sealer: Arc<CookieSealer>,

    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    /// Creates new application state
    ///
    /// # Errors
    ///
    /// Fails if the configured cookie key is not a valid AES key length.
    pub fn new(
        config: Config,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> anyhow::Result<Self> {
        let tokens = TokenService::new(
            config.auth.jwt_secret.clone(),
            Duration::minutes(config.auth.access_token_minutes),
            Duration::minutes(config.auth.refresh_token_minutes),
        );
        let sealer = CookieSealer::new(&config.auth.cookie_key)?;

        Ok(Self {
            config: Arc::new(config),
            tokens,
            sealer: Arc::new(sealer),
            users,
            tasks,
        })
    }

    /// `Set-Cookie` value carrying a sealed access token
    pub fn access_cookie(&self, token: &str) -> ApiResult<String> {
        Ok(cookies::session_cookie(
            ACCESS_COOKIE,
            &self.sealer.seal(token)?,
            self.tokens.access_ttl().num_seconds(),
            self.config.auth.use_https,
        ))
    }

    /// `Set-Cookie` value carrying a sealed refresh token
    pub fn refresh_cookie(&self, token: &str) -> ApiResult<String> {
        Ok(cookies::session_cookie(
            REFRESH_COOKIE,
            &self.sealer.seal(token)?,
            self.tokens.refresh_ttl().num_seconds(),
            self.config.auth.use_https,
        ))
    }

    /// Reads and unseals a token cookie
    ///
    /// Returns `Unauthorized` if the cookie is absent, empty, or fails to
    /// open. An optional `Bearer ` prefix is stripped.
    pub fn read_token_cookie(&self, headers: &HeaderMap, name: &str) -> ApiResult<String> {
        let missing = || ApiError::Unauthorized("Missing authentication token".to_string());

        let sealed = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| cookies::find_cookie(value, name))
            .filter(|value| !value.is_empty())
            .ok_or_else(missing)?;

        let opened = self.sealer.open(sealed)?;
        let token = opened.strip_prefix("Bearer ").unwrap_or(opened.as_str()).trim();

        if token.is_empty() {
            return Err(missing());
        }
        Ok(token.to_string())
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /api
/// ├── GET    /ping                 # Liveness (public)
/// ├── POST   /Register             # Create account, set session cookies
/// ├── POST   /Login                # Authenticate, set session cookies
/// ├── POST   /Logout               # Clear session cookies
/// ├── POST   /Refresh              # New access token from refresh cookie
/// └── /task                        # Cookie authenticated
///     ├── POST   /create
///     ├── GET    /get
///     ├── GET    /get/:id
///     ├── PUT    /edit
///     └── DELETE /delete/:id
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Security headers
/// 2. Request logging (tower-http TraceLayer)
/// 3. Cookie authentication (task routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let task_routes = Router::new()
        .route("/create", post(routes::tasks::create_task))
        .route("/get", get(routes::tasks::list_tasks))
        .route("/get/:id", get(routes::tasks::get_task))
        .route("/edit", put(routes::tasks::edit_task))
        .route("/delete/:id", delete(routes::tasks::delete_task))
        .layer(from_fn_with_state(state.clone(), auth_layer));

    let api_routes = Router::new()
        .route("/ping", get(routes::health::ping))
        .route("/Register", post(routes::auth::register))
        .route("/Login", post(routes::auth::login))
        .route("/Logout", post(routes::auth::logout))
        .route("/Refresh", post(routes::auth::refresh))
        .nest("/task", task_routes);

    let hsts = state.config.auth.use_https;

    Router::new()
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(logging::make_span)
                .on_response(logging::on_response),
        )
        .layer(map_response_with_state(hsts, security_headers))
        .with_state(state)
}

/// Cookie authentication middleware
///
/// Both session cookies must be present and hold valid tokens for the same
/// subject. The user is then re-resolved from the store, so a deleted account
/// loses access even while its tokens are unexpired. The resolved `User` is
/// inserted into request extensions.
pub async fn auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let refresh_token = state.read_token_cookie(req.headers(), REFRESH_COOKIE)?;
    let access_token = state.read_token_cookie(req.headers(), ACCESS_COOKIE)?;

    let access = state.tokens.validate_access(&access_token)?;
    let refresh = state.tokens.validate_refresh(&refresh_token)?;

    if refresh.sub != access.sub {
        debug!("Access and refresh tokens belong to different subjects");
        return Err(ApiError::Unauthorized("Token mismatch".to_string()));
    }

    let user = state
        .users
        .find_by_email(&access.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.id != access.sub {
        debug!(user_id = %user.id, "Token subject does not match resolved user");
        return Err(ApiError::Unauthorized("Token mismatch".to_string()));
    }

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
