//! # Taskman API Server Library
//!
//! HTTP layer of Taskman: cookie-authenticated personal task management.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and auth middleware
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validating JSON extractor
//! - `middleware`: Request logging and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
