/// Persistence layer for users and tasks
///
/// Handlers talk to the store through the [`UserStore`] and [`TaskStore`]
/// traits so the backend can be swapped without touching request code.
///
/// # Backends
///
/// - `postgres`: PostgreSQL via sqlx (production)
/// - `memory`: in-process maps (tests and local development)
///
/// Every operation of both backends runs under a per-operation deadline
/// (see [`bounded`]). Exceeding it yields [`StoreError::Timeout`].

pub mod memory;
pub mod postgres;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::password::verify_password_blocking;
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated (e.g. email already registered)
    #[error("Record already exists")]
    Duplicate,

    /// The operation did not finish before its deadline
    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    /// Any other backend failure
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Duplicate,
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// Account storage
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user. A taken email yields [`StoreError::Duplicate`].
    async fn create(&self, data: CreateUser) -> Result<User, StoreError>;

    /// Exact, case-sensitive email lookup
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

/// Task storage
///
/// All lookups and mutations are scoped to `user_id`; a task owned by someone
/// else behaves exactly like a task that does not exist.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, data: CreateTask) -> Result<Task, StoreError>;

    /// All tasks of a user, oldest first
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError>;

    async fn get(&self, task_id: Uuid, user_id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Replaces the settable fields. Returns the number of matched tasks (0 or 1).
    async fn update(&self, task_id: Uuid, user_id: Uuid, data: UpdateTask) -> Result<u64, StoreError>;

    /// Returns the number of deleted tasks (0 or 1).
    async fn delete(&self, task_id: Uuid, user_id: Uuid) -> Result<u64, StoreError>;
}

/// Runs a store operation under a deadline
///
/// The inner future is dropped when the deadline passes, which cancels any
/// in-flight query on it.
pub async fn bounded<T, F>(deadline: Duration, op: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(deadline, op).await {
        Ok(result) => result,
        Err(_) => {
            warn!(deadline_ms = deadline.as_millis() as u64, "Store operation timed out");
            Err(StoreError::Timeout(deadline))
        }
    }
}

/// Error type for credential checks
#[derive(Debug, thiserror::Error)]
pub enum AuthenticateError {
    /// Unknown email or wrong password (deliberately not distinguished)
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves a user by email and checks the password
///
/// A malformed stored hash is treated as a mismatch.
pub async fn authenticate(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, AuthenticateError> {
    let user = match users.find_by_email(email).await? {
        Some(user) => user,
        None => {
            debug!("Login attempt for unknown email");
            return Err(AuthenticateError::InvalidCredentials);
        }
    };

    match verify_password_blocking(password.to_string(), user.password_hash.clone()).await {
        Ok(true) => Ok(user),
        Ok(false) => {
            debug!(user_id = %user.id, "Password mismatch");
            Err(AuthenticateError::InvalidCredentials)
        }
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "Stored password hash could not be verified");
            Err(AuthenticateError::InvalidCredentials)
        }
    }
}
