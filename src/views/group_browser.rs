//! Group browser: every group, plus the create-group form.

use super::{apply_fetch, Generation, RefreshTicket, Route};
use crate::errors::ClientError;
use crate::gateway::Gateway;
use crate::models::{
    display_date, non_blank, optional_text, CreateGroupRequest, Group, GroupId,
};

const NO_DESCRIPTION: &str = "No description available";

/// Create-group form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDraft {
    pub name: String,
    pub description: String,
}

/// One group as presented in the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCard {
    pub id: GroupId,
    pub name: String,
    pub description: String,
    pub created_on: String,
    pub route: Route,
}

pub struct GroupBrowser {
    gateway: Gateway,
    groups: Vec<Group>,
    generation: Generation,
    creating: bool,
    pub draft: GroupDraft,
}

impl GroupBrowser {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            groups: Vec::new(),
            generation: Generation::default(),
            creating: false,
            draft: GroupDraft::default(),
        }
    }

    /// Groups in server order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }

    /// Fetch all groups and replace the cache.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let ticket = self.begin_refresh();
        let result = self.gateway.list_groups().await;
        self.apply_refresh(ticket, result)
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation.issue()
    }

    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Group>, ClientError>,
    ) -> Result<(), ClientError> {
        apply_fetch(&mut self.generation, &mut self.groups, ticket, result, "groups")
    }

    /// Create a group from the draft, then refresh.
    ///
    /// A blank name is rejected without a request and without touching the
    /// draft.
    pub async fn submit_create(&mut self) -> Result<Group, ClientError> {
        if self.draft.name.trim().is_empty() {
            return Err(ClientError::Validation("Group name is required".to_string()));
        }

        let request = CreateGroupRequest {
            name: self.draft.name.clone(),
            description: optional_text(&self.draft.description),
        };

        self.creating = true;
        let result = self.gateway.create_group(&request).await;
        self.creating = false;

        match result {
            Ok(group) => {
                tracing::info!("Created group {} ({})", group.id, group.name);
                self.draft = GroupDraft::default();
                // The write succeeded; a failed refresh is only logged.
                let _ = self.refresh().await;
                Ok(group)
            }
            Err(e) => {
                tracing::error!("Error creating group: {}", e);
                Err(e)
            }
        }
    }

    pub fn cards(&self) -> Vec<GroupCard> {
        self.groups
            .iter()
            .map(|group| GroupCard {
                id: group.id,
                name: group.name.clone(),
                description: group
                    .description
                    .as_deref()
                    .and_then(non_blank)
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                created_on: display_date(&group.created_at),
                route: Route::Workspace(group.id),
            })
            .collect()
    }
}
