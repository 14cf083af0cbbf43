//! Group workspace: one group's detail, composed with its member and task panels.

use super::{Confirm, MemberPanel, Route, TaskPanel};
use crate::errors::ClientError;
use crate::gateway::Gateway;
use crate::models::{Group, GroupId};

pub const DELETE_GROUP_PROMPT: &str = "Are you sure you want to delete this group? \
This will also delete all members and tasks associated with it.";

/// What the workspace should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkspaceView<'a> {
    Loading,
    /// Terminal: the group could not be loaded
    NotFound { back: Route },
    Loaded(&'a Group),
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Navigate(Route),
}

pub struct GroupWorkspace {
    gateway: Gateway,
    group_id: GroupId,
    group: Option<Group>,
    loading: bool,
    pub members: MemberPanel,
    pub tasks: TaskPanel,
}

impl GroupWorkspace {
    /// The child panels receive only the group identifier.
    pub fn new(gateway: Gateway, group_id: GroupId) -> Self {
        Self {
            members: MemberPanel::new(gateway.clone(), group_id),
            tasks: TaskPanel::new(gateway.clone(), group_id),
            gateway,
            group_id,
            group: None,
            loading: true,
        }
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    /// Fetch the group; failures leave the current state in place.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let result = self.gateway.get_group(self.group_id).await;
        self.loading = false;
        match result {
            Ok(group) => {
                self.group = Some(group);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error fetching group {}: {}", self.group_id, e);
                Err(e)
            }
        }
    }

    /// Load the group and let each panel fetch its own data.
    pub async fn mount(&mut self) {
        let _ = self.load().await;
        let _ = self.members.refresh().await;
        self.tasks.mount().await;
    }

    /// Delete the group after confirmation; the service cascades to its
    /// members and tasks.
    pub async fn submit_delete(
        &mut self,
        confirm: &impl Confirm,
    ) -> Result<DeleteOutcome, ClientError> {
        if !confirm.confirm(DELETE_GROUP_PROMPT) {
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.gateway.delete_group(self.group_id).await {
            Ok(()) => {
                tracing::info!("Deleted group {}", self.group_id);
                Ok(DeleteOutcome::Navigate(Route::Browser))
            }
            Err(e) => {
                tracing::error!("Error deleting group {}: {}", self.group_id, e);
                Err(e)
            }
        }
    }

    pub fn view(&self) -> WorkspaceView<'_> {
        match (&self.group, self.loading) {
            (Some(group), _) => WorkspaceView::Loaded(group),
            (None, true) => WorkspaceView::Loading,
            (None, false) => WorkspaceView::NotFound {
                back: Route::Browser,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_workspace() -> GroupWorkspace {
        GroupWorkspace::new(Gateway::new("http://127.0.0.1:9").unwrap(), GroupId(8))
    }

    #[tokio::test]
    async fn test_failed_load_is_terminal_not_found() {
        let mut workspace = offline_workspace();
        assert_eq!(workspace.view(), WorkspaceView::Loading);

        assert!(workspace.load().await.is_err());
        assert_eq!(
            workspace.view(),
            WorkspaceView::NotFound {
                back: Route::Browser
            }
        );
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_loaded_group() {
        let mut workspace = offline_workspace();
        workspace.group = Some(Group {
            id: GroupId(8),
            name: "Infra".to_string(),
            description: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        });

        assert!(workspace.load().await.is_err());
        assert!(matches!(workspace.view(), WorkspaceView::Loaded(g) if g.name == "Infra"));
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let mut workspace = offline_workspace();
        let outcome = workspace.submit_delete(&|_: &str| false).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_failed_delete_stays() {
        let mut workspace = offline_workspace();
        let err = workspace.submit_delete(&|_: &str| true).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[test]
    fn test_panels_share_group_id() {
        let workspace = offline_workspace();
        assert_eq!(workspace.members.group_id(), GroupId(8));
        assert_eq!(workspace.tasks.group_id(), GroupId(8));
    }
}
