//! Member API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{message, require_email, require_text, success, ApiResult, MessageResponse};
use crate::models::{CreateMemberRequest, GroupId, Member, MemberId};
use crate::AppState;

/// GET /groups/{id}/members/ - List the members of a group.
pub async fn list_members(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> ApiResult<Vec<Member>> {
    success(state.repo.list_members(group_id).await?)
}

/// POST /groups/{id}/members/ - Add a member to a group.
pub async fn add_member(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
    Json(request): Json<CreateMemberRequest>,
) -> ApiResult<Member> {
    require_text(&request.name, "Member name")?;
    require_text(&request.email, "Member email")?;
    require_email(&request.email)?;

    let member = state.repo.add_member(group_id, &request).await?;
    tracing::info!("Added member {} to group {}", member.id, group_id);
    success(member)
}

/// DELETE /members/{id} - Remove a member.
pub async fn remove_member(
    State(state): State<AppState>,
    Path(id): Path<MemberId>,
) -> ApiResult<MessageResponse> {
    state.repo.remove_member(id).await?;
    message("Member removed successfully")
}
