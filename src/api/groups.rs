//! Group API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{message, require_text, success, ApiResult, MessageResponse};
use crate::errors::AppError;
use crate::models::{CreateGroupRequest, Group, GroupId};
use crate::AppState;

/// GET /groups/ - List all groups.
pub async fn list_groups(State(state): State<AppState>) -> ApiResult<Vec<Group>> {
    success(state.repo.list_groups().await?)
}

/// POST /groups/ - Create a new group.
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> ApiResult<Group> {
    require_text(&request.name, "Group name")?;

    let group = state.repo.create_group(&request).await?;
    tracing::info!("Created group {} ({})", group.id, group.name);
    success(group)
}

/// GET /groups/{id} - Get a single group.
pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<GroupId>,
) -> ApiResult<Group> {
    match state.repo.get_group(id).await? {
        Some(group) => success(group),
        None => Err(AppError::NotFound(format!("Group {} not found", id))),
    }
}

/// DELETE /groups/{id} - Delete a group with its members and tasks.
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<GroupId>,
) -> ApiResult<MessageResponse> {
    state.repo.delete_group(id).await?;
    tracing::info!("Deleted group {}", id);
    message("Group deleted successfully")
}
