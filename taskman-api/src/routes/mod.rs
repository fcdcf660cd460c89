/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Liveness endpoint
/// - `auth`: Registration, login, logout and token refresh
/// - `tasks`: Per-user task CRUD (cookie authenticated)

pub mod auth;
pub mod health;
pub mod tasks;
