/// Integration tests for the Taskman API
///
/// These tests drive the full router (middleware included) against the
/// in-memory store:
/// - Registration, login, logout and refresh
/// - Session cookie format and authentication rejection paths
/// - Request validation
/// - Task CRUD and per-user isolation

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::TestContext;
use serde_json::json;
use taskman_shared::auth::jwt::TokenService;
use taskman_shared::models::user::User;
use uuid::Uuid;

fn user_from(id: &str, username: &str, email: &str) -> User {
    User {
        id: Uuid::parse_str(id).unwrap(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: String::new(),
        created_at: Utc::now(),
    }
}

fn cookies(ctx: &TestContext, access: &str, refresh: &str) -> String {
    format!("accessToken={}; refreshToken={}", ctx.seal(access), ctx.seal(refresh))
}

// ---------------------------------------------------------------------------
// Public endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_ping() {
    let ctx = TestContext::new();

    let response = ctx.send(Method::GET, "/api/ping", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "message": "pong" }));
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let ctx = TestContext::new();

    let response = ctx.send(Method::GET, "/api/ping", None, None).await;
    assert_eq!(response.headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(response.headers.get("strict-transport-security").is_none());

    let response = ctx.send(Method::GET, "/api/task/get", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers.get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn test_https_mode_sets_secure_cookies_and_hsts() {
    let ctx = TestContext::with_vars(&[("USE_HTTPS", "true")]);

    let response = ctx.register("bob", "bob@x.com", "secret1").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.set_cookie("accessToken").unwrap().ends_with("; Secure"));
    assert!(response.set_cookie("refreshToken").unwrap().ends_with("; Secure"));
    assert!(response.headers.get("strict-transport-security").is_some());
}

// ---------------------------------------------------------------------------
// Registration and login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_register_sets_cookies_and_returns_tokens() {
    let ctx = TestContext::new();

    let response = ctx.register("bob", "bob@x.com", "secret1").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "User registered successfully");
    assert!(Uuid::parse_str(response.body["id"].as_str().unwrap()).is_ok());
    assert!(!response.body["accessToken"].as_str().unwrap().is_empty());
    assert!(!response.body["refreshToken"].as_str().unwrap().is_empty());

    let access = response.set_cookie("accessToken").unwrap();
    assert!(access.contains("Path=/"));
    assert!(access.contains("HttpOnly"));
    assert!(access.contains("SameSite=Lax"));
    assert!(access.contains("Max-Age=900"));
    assert!(!access.contains("Secure"));

    let refresh = response.set_cookie("refreshToken").unwrap();
    assert!(refresh.contains(&format!("Max-Age={}", 43200 * 60)));

    // Cookie values are sealed, not the raw tokens.
    let raw_access = response.body["accessToken"].as_str().unwrap();
    assert!(!access.contains(raw_access));
}

#[tokio::test]
async fn test_register_then_login() {
    let ctx = TestContext::new();
    assert_eq!(
        ctx.register("bob", "bob@x.com", "secret1").await.status,
        StatusCode::CREATED
    );

    let response = ctx.login("bob@x.com", "secret1").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Login successful");
    assert!(!response.body["accessToken"].as_str().unwrap().is_empty());
    assert!(!response.body["refreshToken"].as_str().unwrap().is_empty());
    assert!(response.set_cookie("accessToken").is_some());
    assert!(response.set_cookie("refreshToken").is_some());

    // The login session works on protected routes.
    let list = ctx
        .send(Method::GET, "/api/task/get", Some(&response.cookie_header()), None)
        .await;
    assert_eq!(list.status, StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let ctx = TestContext::new();
    ctx.register("bob", "bob@x.com", "secret1").await;

    let response = ctx.register("robert", "bob@x.com", "another1").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "User already exists");
    assert!(response.set_cookies().is_empty());

    // The original password still works.
    assert_eq!(ctx.login("bob@x.com", "secret1").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_validation() {
    let ctx = TestContext::new();

    let cases = [
        json!({ "username": "bo", "email": "bob@x.com", "password": "secret1" }),
        json!({ "username": "bob", "email": "not-an-email", "password": "secret1" }),
        json!({ "username": "bob", "email": "bob@x.com", "password": "12345" }),
        json!({ "username": "bob", "email": "bob@x.com", "password": "x".repeat(129) }),
        json!({ "username": "bob", "email": "bob@x.com" }),
        json!({ "username": "b".repeat(256), "email": "bob@x.com", "password": "secret1" }),
        json!({ "username": "bob", "email": long_email(), "password": "secret1" }),
    ];

    for body in cases {
        let response = ctx
            .send(Method::POST, "/api/Register", None, Some(body.clone()))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", body);
        assert!(response.body["message"].is_string());
    }
}

/// A syntactically valid address longer than the 255-character column
fn long_email() -> String {
    let label = "d".repeat(63);
    format!("{}@{}.{}.{}.com", "u".repeat(64), label, label, label)
}

#[tokio::test]
async fn test_username_at_column_limit_accepted() {
    let ctx = TestContext::new();

    let response = ctx.register(&"b".repeat(255), "bob@x.com", "secret1").await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_login_with_malformed_email_is_bad_request() {
    let ctx = TestContext::new();
    ctx.register("bob", "bob@x.com", "secret1").await;

    let response = ctx.login("not-an-email", "secret1").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "validation_error");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/Register")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"username\": \"bob\","))
        .unwrap();

    let response = ctx.send_request(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "bad_request");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new();
    ctx.register("bob", "bob@x.com", "secret1").await;

    let wrong_password = ctx.login("bob@x.com", "secret2").await;
    let unknown_email = ctx.login("alice@x.com", "secret1").await;

    for response in [wrong_password, unknown_email] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["message"], "Invalid credentials");
        assert!(response.set_cookies().is_empty());
    }
}

// ---------------------------------------------------------------------------
// Logout and refresh
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_logout_clears_cookies() {
    let ctx = TestContext::new();
    let cookie = ctx.session("bob", "bob@x.com").await;

    let response = ctx.send(Method::POST, "/api/Logout", Some(&cookie), None).await;

    assert_eq!(response.status, StatusCode::OK);
    let access = response.set_cookie("accessToken").unwrap();
    let refresh = response.set_cookie("refreshToken").unwrap();
    assert!(access.starts_with("accessToken=;"));
    assert!(access.contains("Max-Age=0"));
    assert!(refresh.starts_with("refreshToken=;"));
    assert!(refresh.contains("Max-Age=0"));

    // Replaying the cleared cookies is unauthenticated.
    let after = ctx
        .send(Method::GET, "/api/task/get", Some(&response.cookie_header()), None)
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_new_access_cookie() {
    let ctx = TestContext::new();
    let cookie = ctx.session("bob", "bob@x.com").await;

    let response = ctx.send(Method::POST, "/api/Refresh", Some(&cookie), None).await;

    assert_eq!(response.status, StatusCode::OK);
    let token = response.body["accessToken"].as_str().unwrap();
    let claims = ctx.state.tokens.validate_access(token).unwrap();
    assert_eq!(claims.email, "bob@x.com");
    assert!(response.set_cookie("accessToken").is_some());
    assert!(response.set_cookie("refreshToken").is_none());
}

#[tokio::test]
async fn test_refresh_rejections() {
    let ctx = TestContext::new();

    let none = ctx.send(Method::POST, "/api/Refresh", None, None).await;
    assert_eq!(none.status, StatusCode::UNAUTHORIZED);

    // An access token is not accepted in the refresh cookie.
    let ghost = user_from(&Uuid::new_v4().to_string(), "ghost", "ghost@x.com");
    let access = ctx.state.tokens.issue_access(&ghost).unwrap();
    let wrong_type = ctx
        .send(
            Method::POST,
            "/api/Refresh",
            Some(&format!("refreshToken={}", ctx.seal(&access))),
            None,
        )
        .await;
    assert_eq!(wrong_type.status, StatusCode::UNAUTHORIZED);

    // Valid refresh token for a user that does not exist.
    let refresh = ctx.state.tokens.issue_refresh(&ghost).unwrap();
    let unknown = ctx
        .send(
            Method::POST,
            "/api/Refresh",
            Some(&format!("refreshToken={}", ctx.seal(&refresh))),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Authentication middleware
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_missing_or_partial_cookies_rejected() {
    let ctx = TestContext::new();
    let registered = ctx.register("bob", "bob@x.com", "secret1").await;
    let access_only = registered
        .set_cookie("accessToken")
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    for cookie in [None, Some(access_only.as_str()), Some("accessToken=; refreshToken=")] {
        let response = ctx.send(Method::GET, "/api/task/get", cookie, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{:?}", cookie);
    }
}

#[tokio::test]
async fn test_unsealed_or_garbage_cookies_rejected() {
    let ctx = TestContext::new();
    let registered = ctx.register("bob", "bob@x.com", "secret1").await;
    let access = registered.body["accessToken"].as_str().unwrap();
    let refresh = registered.body["refreshToken"].as_str().unwrap();

    // Raw tokens without sealing
    let raw = format!("accessToken={}; refreshToken={}", access, refresh);
    let response = ctx.send(Method::GET, "/api/task/get", Some(&raw), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // Sealed garbage
    let garbage = cookies(&ctx, "not-a-jwt", "also-not-a-jwt");
    let response = ctx.send(Method::GET, "/api/task/get", Some(&garbage), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_prefixed_cookie_values_accepted() {
    let ctx = TestContext::new();
    let registered = ctx.register("bob", "bob@x.com", "secret1").await;
    let access = registered.body["accessToken"].as_str().unwrap();
    let refresh = registered.body["refreshToken"].as_str().unwrap();

    let cookie = cookies(&ctx, &format!("Bearer {}", access), &format!("Bearer {}", refresh));
    let response = ctx.send(Method::GET, "/api/task/get", Some(&cookie), None).await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_swapped_token_types_rejected() {
    let ctx = TestContext::new();
    let registered = ctx.register("bob", "bob@x.com", "secret1").await;
    let access = registered.body["accessToken"].as_str().unwrap();
    let refresh = registered.body["refreshToken"].as_str().unwrap();

    let swapped = cookies(&ctx, refresh, access);
    let response = ctx.send(Method::GET, "/api/task/get", Some(&swapped), None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_access_token_rejected() {
    let ctx = TestContext::new();
    let registered = ctx.register("bob", "bob@x.com", "secret1").await;
    let user = user_from(registered.body["id"].as_str().unwrap(), "bob", "bob@x.com");
    let refresh = registered.body["refreshToken"].as_str().unwrap();

    let expired_issuer = TokenService::new(
        common::JWT_SECRET,
        Duration::seconds(-5),
        Duration::days(1),
    );
    let expired = expired_issuer.issue_access(&user).unwrap();

    let response = ctx
        .send(Method::GET, "/api/task/get", Some(&cookies(&ctx, &expired, refresh)), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // Same claims with a future expiry pass.
    let fresh = TokenService::new(common::JWT_SECRET, Duration::minutes(1), Duration::days(1))
        .issue_access(&user)
        .unwrap();
    let response = ctx
        .send(Method::GET, "/api/task/get", Some(&cookies(&ctx, &fresh, refresh)), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_foreign_secret_rejected() {
    let ctx = TestContext::new();
    let registered = ctx.register("bob", "bob@x.com", "secret1").await;
    let user = user_from(registered.body["id"].as_str().unwrap(), "bob", "bob@x.com");

    let forger = TokenService::new(
        "some-other-secret-that-is-also-32-bytes-long",
        Duration::minutes(15),
        Duration::days(1),
    );
    let cookie = cookies(
        &ctx,
        &forger.issue_access(&user).unwrap(),
        &forger.issue_refresh(&user).unwrap(),
    );

    let response = ctx.send(Method::GET, "/api/task/get", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_and_access_subjects_must_match() {
    let ctx = TestContext::new();
    let bob = ctx.register("bob", "bob@x.com", "secret1").await;
    let alice = ctx.register("alice", "alice@x.com", "secret1").await;

    let mixed = cookies(
        &ctx,
        bob.body["accessToken"].as_str().unwrap(),
        alice.body["refreshToken"].as_str().unwrap(),
    );
    let response = ctx.send(Method::GET, "/api/task/get", Some(&mixed), None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_user_is_not_found() {
    let ctx = TestContext::new();
    let ghost = user_from(&Uuid::new_v4().to_string(), "ghost", "ghost@x.com");

    let cookie = cookies(
        &ctx,
        &ctx.state.tokens.issue_access(&ghost).unwrap(),
        &ctx.state.tokens.issue_refresh(&ghost).unwrap(),
    );
    let response = ctx.send(Method::GET, "/api/task/get", Some(&cookie), None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_token_subject_must_match_resolved_user() {
    let ctx = TestContext::new();
    ctx.register("bob", "bob@x.com", "secret1").await;

    // Signed tokens naming bob's email under a different subject
    let impostor = user_from(&Uuid::new_v4().to_string(), "bob", "bob@x.com");
    let cookie = cookies(
        &ctx,
        &ctx.state.tokens.issue_access(&impostor).unwrap(),
        &ctx.state.tokens.issue_refresh(&impostor).unwrap(),
    );
    let response = ctx.send(Method::GET, "/api/task/get", Some(&cookie), None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_task_lifecycle() {
    let ctx = TestContext::new();
    let cookie = ctx.session("bob", "bob@x.com").await;

    let created = ctx
        .send(
            Method::POST,
            "/api/task/create",
            Some(&cookie),
            Some(json!({
                "title": "Write report",
                "description": "Quarterly numbers",
                "status": "pending",
                "priority": "high",
                "due_date": "2030-06-01T12:00:00Z"
            })),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["message"], "Task created successfully");
    let id = created.body["id"].as_str().unwrap().to_string();

    let listed = ctx.send(Method::GET, "/api/task/get", Some(&cookie), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    let tasks = listed.body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], id.as_str());
    assert_eq!(tasks[0]["title"], "Write report");
    assert_eq!(tasks[0]["status"], "pending");
    assert_eq!(tasks[0]["priority"], "high");

    let edited = ctx
        .send(
            Method::PUT,
            "/api/task/edit",
            Some(&cookie),
            Some(json!({
                "id": id,
                "title": "Ship report",
                "status": "in_progress",
                "priority": "low"
            })),
        )
        .await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.body["message"], "Task updated successfully");

    let fetched = ctx
        .send(Method::GET, &format!("/api/task/get/{}", id), Some(&cookie), None)
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["task"]["title"], "Ship report");
    assert_eq!(fetched.body["task"]["status"], "in_progress");
    // Edit is a full replace: omitted optional fields are cleared.
    assert!(fetched.body["task"]["description"].is_null());
    assert!(fetched.body["task"]["due_date"].is_null());

    let deleted = ctx
        .send(Method::DELETE, &format!("/api/task/delete/{}", id), Some(&cookie), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Task deleted successfully");

    let listed = ctx.send(Method::GET, "/api/task/get", Some(&cookie), None).await;
    assert!(listed.body["tasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_task_validation() {
    let ctx = TestContext::new();
    let cookie = ctx.session("bob", "bob@x.com").await;

    let cases = [
        json!({ "title": "t", "status": "archived", "priority": "low" }),
        json!({ "title": "t", "status": "pending", "priority": "urgent" }),
        json!({ "title": "", "status": "pending", "priority": "low" }),
        json!({ "title": "t", "priority": "low" }),
        json!({ "status": "pending", "priority": "low" }),
        json!({ "title": "t", "status": "pending", "priority": "low", "due_date": "tomorrow" }),
    ];

    for body in cases {
        let response = ctx
            .send(Method::POST, "/api/task/create", Some(&cookie), Some(body.clone()))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", body);
    }

    let listed = ctx.send(Method::GET, "/api/task/get", Some(&cookie), None).await;
    assert!(listed.body["tasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_client_supplied_user_id_ignored() {
    let ctx = TestContext::new();
    let alice_cookie = ctx.session("alice", "alice@x.com").await;
    let bob = ctx.register("bob", "bob@x.com", "secret1").await;
    let bob_id = bob.body["id"].as_str().unwrap();

    let created = ctx
        .send(
            Method::POST,
            "/api/task/create",
            Some(&alice_cookie),
            Some(json!({
                "title": "mine",
                "status": "pending",
                "priority": "low",
                "user_id": bob_id
            })),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);

    let alice_tasks = ctx.send(Method::GET, "/api/task/get", Some(&alice_cookie), None).await;
    assert_eq!(alice_tasks.body["tasks"].as_array().unwrap().len(), 1);

    let bob_tasks = ctx
        .send(Method::GET, "/api/task/get", Some(&bob.cookie_header()), None)
        .await;
    assert!(bob_tasks.body["tasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_tasks_isolated_between_users() {
    let ctx = TestContext::new();
    let alice = ctx.session("alice", "alice@x.com").await;
    let bob = ctx.session("bob", "bob@x.com").await;

    let task_id = ctx.create_task(&alice, "alice's task").await;

    let listed = ctx.send(Method::GET, "/api/task/get", Some(&bob), None).await;
    assert!(listed.body["tasks"].as_array().unwrap().is_empty());

    let fetched = ctx
        .send(Method::GET, &format!("/api/task/get/{}", task_id), Some(&bob), None)
        .await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);

    let edited = ctx
        .send(
            Method::PUT,
            "/api/task/edit",
            Some(&bob),
            Some(json!({
                "id": task_id,
                "title": "hijacked",
                "status": "completed",
                "priority": "high"
            })),
        )
        .await;
    assert_eq!(edited.status, StatusCode::NOT_FOUND);

    let deleted = ctx
        .send(Method::DELETE, &format!("/api/task/delete/{}", task_id), Some(&bob), None)
        .await;
    assert_eq!(deleted.status, StatusCode::NOT_FOUND);

    // Alice's task is untouched.
    let fetched = ctx
        .send(Method::GET, &format!("/api/task/get/{}", task_id), Some(&alice), None)
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["task"]["title"], "alice's task");
}

#[tokio::test]
async fn test_task_id_handling() {
    let ctx = TestContext::new();
    let cookie = ctx.session("bob", "bob@x.com").await;

    let bad_get = ctx.send(Method::GET, "/api/task/get/not-a-uuid", Some(&cookie), None).await;
    assert_eq!(bad_get.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_get.body["message"], "Invalid task id");

    let bad_delete = ctx
        .send(Method::DELETE, "/api/task/delete/12345", Some(&cookie), None)
        .await;
    assert_eq!(bad_delete.status, StatusCode::BAD_REQUEST);

    let missing = Uuid::new_v4();
    let missing_delete = ctx
        .send(Method::DELETE, &format!("/api/task/delete/{}", missing), Some(&cookie), None)
        .await;
    assert_eq!(missing_delete.status, StatusCode::NOT_FOUND);

    let missing_edit = ctx
        .send(
            Method::PUT,
            "/api/task/edit",
            Some(&cookie),
            Some(json!({ "id": missing, "title": "t", "status": "pending", "priority": "low" })),
        )
        .await;
    assert_eq!(missing_edit.status, StatusCode::NOT_FOUND);

    let bad_edit_id = ctx
        .send(
            Method::PUT,
            "/api/task/edit",
            Some(&cookie),
            Some(json!({ "id": "nope", "title": "t", "status": "pending", "priority": "low" })),
        )
        .await;
    assert_eq!(bad_edit_id.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tasks_listed_in_creation_order() {
    let ctx = TestContext::new();
    let cookie = ctx.session("bob", "bob@x.com").await;

    for title in ["first", "second", "third"] {
        ctx.create_task(&cookie, title).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let listed = ctx.send(Method::GET, "/api/task/get", Some(&cookie), None).await;
    let titles: Vec<&str> = listed.body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();

    assert_eq!(titles, ["first", "second", "third"]);
}
