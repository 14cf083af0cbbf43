//! Task API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{message, require_text, success, ApiResult, MessageResponse};
use crate::errors::AppError;
use crate::models::{CreateTaskRequest, GroupId, OneOrMany, Task, TaskId, TaskStatus};
use crate::notify::notices_for;
use crate::AppState;

/// Query string of the status update endpoint.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

/// GET /groups/{id}/tasks/ - List the tasks of a group.
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> ApiResult<Vec<Task>> {
    success(state.repo.list_tasks(group_id).await?)
}

/// POST /groups/{id}/tasks/ - Create a task.
///
/// Responds with one task for a single assignment and with an array of
/// tasks, one per member, when `assign_to_all` is set. Each assignee gets an
/// e-mail notice once the tasks are stored.
pub async fn create_task(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<OneOrMany<Task>> {
    require_text(&request.title, "Task title")?;
    let assignment = request.assignment().ok_or_else(|| {
        AppError::Validation("Either assigned_to_id or assign_to_all is required".to_string())
    })?;

    let created = state
        .repo
        .create_task(
            group_id,
            &request.title,
            request.description.as_deref(),
            assignment,
        )
        .await?;
    tracing::info!(
        "Created {} task(s) titled {:?} in group {}",
        created.len(),
        request.title,
        group_id
    );

    notify_assignees(&state, group_id, created.as_slice()).await;
    success(created)
}

/// Queue assignment notices; a failure here never fails the request.
async fn notify_assignees(state: &AppState, group_id: GroupId, tasks: &[Task]) {
    let members = match state.repo.list_members(group_id).await {
        Ok(members) => members,
        Err(e) => {
            tracing::error!("Failed to load assignees for notices: {}", e);
            return;
        }
    };

    let _ = state.notifier.dispatch(notices_for(&members, tasks));
}

/// PUT /tasks/{id}/status?status= - Change the status of a task.
pub async fn update_task_status(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Task> {
    let status = TaskStatus::parse(&query.status).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid status {:?}; expected pending, in_progress or completed",
            query.status
        ))
    })?;

    success(state.repo.update_task_status(id, status).await?)
}

/// DELETE /tasks/{id} - Delete a task.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> ApiResult<MessageResponse> {
    state.repo.delete_task(id).await?;
    message("Task deleted successfully")
}
