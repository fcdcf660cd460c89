//! # Taskman Shared Library
//!
//! Types, storage and authentication primitives used by the Taskman API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, JWT session tokens and sealed cookies
//! - `models`: Users and tasks
//! - `store`: Storage traits with PostgreSQL and in-memory backends
//! - `db`: Connection pool lifecycle and schema migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod store;
