/// Middleware for the API server
///
/// - `logging`: Request spans and response events for `TraceLayer`
/// - `security`: Security response headers
///
/// Authentication lives in [`crate::app::auth_layer`] since it needs the
/// application state.

pub mod logging;
pub mod security;
