/// Task endpoints
///
/// All routes sit behind [`crate::app::auth_layer`] and act on the
/// authenticated user's tasks only. A task owned by someone else answers
/// exactly like a missing one (404). Any `user_id` in a request body is
/// ignored.
///
/// # Endpoints
///
/// - `POST   /api/task/create`
/// - `GET    /api/task/get`
/// - `GET    /api/task/get/:id`
/// - `PUT    /api/task/edit`
/// - `DELETE /api/task/delete/:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskman_shared::models::{
    task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
    user::User,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    pub description: Option<String>,

    pub status: TaskStatus,

    pub priority: TaskPriority,

    /// RFC 3339 timestamp
    pub due_date: Option<DateTime<Utc>>,
}

/// Edit task request (full replace of the settable fields)
#[derive(Debug, Deserialize, Validate)]
pub struct EditTaskRequest {
    pub id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    pub description: Option<String>,

    pub status: TaskStatus,

    pub priority: TaskPriority,

    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    pub message: String,
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task: Task,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_task_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid task id".to_string()))
}

fn not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

/// Create a task owned by the caller
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<Json<CreateTaskResponse>> {
    let task = state
        .tasks
        .create(CreateTask {
            user_id: user.id,
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
        })
        .await?;

    info!(
        task_id = %task.id,
        user_id = %user.id,
        status = task.status.as_str(),
        priority = task.priority.as_str(),
        "Task created"
    );

    Ok(Json(CreateTaskResponse {
        message: "Task created successfully".to_string(),
        id: task.id,
    }))
}

/// List the caller's tasks, oldest first
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<TaskListResponse>> {
    let tasks = state.tasks.list_by_user(user.id).await?;
    Ok(Json(TaskListResponse { tasks }))
}

/// Fetch one of the caller's tasks
pub async fn get_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    let task_id = parse_task_id(&id)?;

    let task = state
        .tasks
        .get(task_id, user.id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(TaskResponse { task }))
}

/// Replace the settable fields of one of the caller's tasks
pub async fn edit_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidatedJson(req): ValidatedJson<EditTaskRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let status = req.status;
    let matched = state
        .tasks
        .update(
            req.id,
            user.id,
            UpdateTask {
                title: req.title,
                description: req.description,
                status,
                priority: req.priority,
                due_date: req.due_date,
            },
        )
        .await?;

    if matched == 0 {
        return Err(not_found());
    }

    info!(
        task_id = %req.id,
        user_id = %user.id,
        status = status.as_str(),
        "Task updated"
    );

    Ok(Json(MessageResponse {
        message: "Task updated successfully".to_string(),
    }))
}

/// Delete one of the caller's tasks
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let task_id = parse_task_id(&id)?;

    if state.tasks.delete(task_id, user.id).await? == 0 {
        return Err(not_found());
    }

    info!(task_id = %task_id, user_id = %user.id, "Task deleted");

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
