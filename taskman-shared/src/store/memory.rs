/// In-process store
///
/// Keeps users and tasks in maps behind tokio `RwLock`s. Data lives only as
/// long as the process. Email uniqueness is checked under the write lock, so
/// concurrent registrations with the same email cannot both succeed.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{bounded, StoreError, TaskStore, UserStore};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, User};

#[derive(Debug, Default)]
struct Users {
    by_id: HashMap<Uuid, User>,
    id_by_email: HashMap<String, Uuid>,
}

/// Store backed by in-memory maps
#[derive(Debug)]
pub struct MemoryStore {
    users: RwLock<Users>,
    tasks: RwLock<HashMap<Uuid, Task>>,
    timeout: Duration,
}

impl MemoryStore {
    pub fn new(timeout: Duration) -> Self {
        debug!("Creating in-memory store");
        Self {
            users: RwLock::new(Users::default()),
            tasks: RwLock::new(HashMap::new()),
            timeout,
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, data: CreateUser) -> Result<User, StoreError> {
        bounded(self.timeout, async {
            let mut users = self.users.write().await;
            if users.id_by_email.contains_key(&data.email) {
                return Err(StoreError::Duplicate);
            }

            let user = User {
                id: Uuid::new_v4(),
                username: data.username,
                email: data.email,
                password_hash: data.password_hash,
                created_at: Utc::now(),
            };
            users.id_by_email.insert(user.email.clone(), user.id);
            users.by_id.insert(user.id, user.clone());
            Ok(user)
        })
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        bounded(self.timeout, async {
            let users = self.users.read().await;
            Ok(users
                .id_by_email
                .get(email)
                .and_then(|id| users.by_id.get(id))
                .cloned())
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        bounded(self.timeout, async {
            Ok(self.users.read().await.by_id.get(&id).cloned())
        })
        .await
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create(&self, data: CreateTask) -> Result<Task, StoreError> {
        bounded(self.timeout, async {
            let task = Task::new(data, Utc::now());
            self.tasks.write().await.insert(task.id, task.clone());
            Ok(task)
        })
        .await
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError> {
        bounded(self.timeout, async {
            let tasks = self.tasks.read().await;
            let mut owned: Vec<Task> = tasks
                .values()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect();
            owned.sort_by_key(|t| t.created_at);
            Ok(owned)
        })
        .await
    }

    async fn get(&self, task_id: Uuid, user_id: Uuid) -> Result<Option<Task>, StoreError> {
        bounded(self.timeout, async {
            Ok(self
                .tasks
                .read()
                .await
                .get(&task_id)
                .filter(|t| t.user_id == user_id)
                .cloned())
        })
        .await
    }

    async fn update(&self, task_id: Uuid, user_id: Uuid, data: UpdateTask) -> Result<u64, StoreError> {
        bounded(self.timeout, async {
            let mut tasks = self.tasks.write().await;
            match tasks.get_mut(&task_id).filter(|t| t.user_id == user_id) {
                Some(task) => {
                    task.apply(data, Utc::now());
                    Ok(1)
                }
                None => Ok(0),
            }
        })
        .await
    }

    async fn delete(&self, task_id: Uuid, user_id: Uuid) -> Result<u64, StoreError> {
        bounded(self.timeout, async {
            let mut tasks = self.tasks.write().await;
            let owned = tasks.get(&task_id).is_some_and(|t| t.user_id == user_id);
            if owned {
                tasks.remove(&task_id);
                Ok(1)
            } else {
                Ok(0)
            }
        })
        .await
    }
}
