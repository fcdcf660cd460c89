/// Database plumbing for the PostgreSQL backend
///
/// - `pool`: connection pool lifecycle and health check
/// - `migrations`: embedded schema migrations
///
/// Queries live in [`crate::store::postgres`].

pub mod migrations;
pub mod pool;
