/// PostgreSQL store
///
/// Owns the connection pool. Email uniqueness comes from the unique index on
/// `users.email`; a violation maps to [`StoreError::Duplicate`].

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{bounded, StoreError, TaskStore, UserStore};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, User};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";

const TASK_COLUMNS: &str =
    "id, user_id, title, description, status, priority, due_date, created_at, updated_at";

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Underlying pool, for health checks and shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create(&self, data: CreateUser) -> Result<User, StoreError> {
        bounded(self.timeout, async {
            let user = sqlx::query_as::<_, User>(&format!(
                r#"
                INSERT INTO users (username, email, password_hash)
                VALUES ($1, $2, $3)
                RETURNING {USER_COLUMNS}
                "#
            ))
            .bind(data.username)
            .bind(data.email)
            .bind(data.password_hash)
            .fetch_one(&self.pool)
            .await?;

            debug!(user_id = %user.id, "Inserted user");
            Ok(user)
        })
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        bounded(self.timeout, async {
            let user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
            Ok(user)
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        bounded(self.timeout, async {
            let user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(user)
        })
        .await
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create(&self, data: CreateTask) -> Result<Task, StoreError> {
        bounded(self.timeout, async {
            let task = sqlx::query_as::<_, Task>(&format!(
                r#"
                INSERT INTO tasks (user_id, title, description, status, priority, due_date)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {TASK_COLUMNS}
                "#
            ))
            .bind(data.user_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.priority)
            .bind(data.due_date)
            .fetch_one(&self.pool)
            .await?;

            debug!(task_id = %task.id, user_id = %task.user_id, "Inserted task");
            Ok(task)
        })
        .await
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError> {
        bounded(self.timeout, async {
            let tasks = sqlx::query_as::<_, Task>(&format!(
                r#"
                SELECT {TASK_COLUMNS}
                FROM tasks
                WHERE user_id = $1
                ORDER BY created_at ASC, id ASC
                "#
            ))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(tasks)
        })
        .await
    }

    async fn get(&self, task_id: Uuid, user_id: Uuid) -> Result<Option<Task>, StoreError> {
        bounded(self.timeout, async {
            let task = sqlx::query_as::<_, Task>(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
            ))
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(task)
        })
        .await
    }

    async fn update(&self, task_id: Uuid, user_id: Uuid, data: UpdateTask) -> Result<u64, StoreError> {
        bounded(self.timeout, async {
            let result = sqlx::query(
                r#"
                UPDATE tasks
                SET title = $3,
                    description = $4,
                    status = $5,
                    priority = $6,
                    due_date = $7,
                    updated_at = NOW()
                WHERE id = $1 AND user_id = $2
                "#,
            )
            .bind(task_id)
            .bind(user_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.priority)
            .bind(data.due_date)
            .execute(&self.pool)
            .await?;

            Ok(result.rows_affected())
        })
        .await
    }

    async fn delete(&self, task_id: Uuid, user_id: Uuid) -> Result<u64, StoreError> {
        bounded(self.timeout, async {
            let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
                .bind(task_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

            Ok(result.rows_affected())
        })
        .await
    }
}
