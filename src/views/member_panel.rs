//! Member panel: the members of one group, with add and remove.

use super::{apply_fetch, Confirm, Generation, RefreshTicket, Removal};
use crate::errors::ClientError;
use crate::gateway::Gateway;
use crate::models::{CreateMemberRequest, GroupId, Member, MemberId};

pub const REMOVE_MEMBER_PROMPT: &str = "Are you sure you want to remove this member?";

/// Add-member form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDraft {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRow {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub initial: Option<char>,
}

pub struct MemberPanel {
    gateway: Gateway,
    group_id: GroupId,
    members: Vec<Member>,
    generation: Generation,
    form_open: bool,
    adding: bool,
    pub draft: MemberDraft,
}

impl MemberPanel {
    pub fn new(gateway: Gateway, group_id: GroupId) -> Self {
        Self {
            gateway,
            group_id,
            members: Vec::new(),
            generation: Generation::default(),
            form_open: false,
            adding: false,
            draft: MemberDraft::default(),
        }
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    pub fn is_adding(&self) -> bool {
        self.adding
    }

    pub fn toggle_form(&mut self) {
        self.form_open = !self.form_open;
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let ticket = self.begin_refresh();
        let result = self.gateway.list_members(self.group_id).await;
        self.apply_refresh(ticket, result)
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation.issue()
    }

    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Member>, ClientError>,
    ) -> Result<(), ClientError> {
        apply_fetch(&mut self.generation, &mut self.members, ticket, result, "members")
    }

    /// Add a member from the draft. Both fields are required.
    pub async fn submit_add(&mut self) -> Result<Member, ClientError> {
        if self.draft.name.trim().is_empty() || self.draft.email.trim().is_empty() {
            return Err(ClientError::Validation(
                "Member name and email are required".to_string(),
            ));
        }

        let request = CreateMemberRequest {
            name: self.draft.name.clone(),
            email: self.draft.email.clone(),
        };

        self.adding = true;
        let result = self.gateway.add_member(self.group_id, &request).await;
        self.adding = false;

        match result {
            Ok(member) => {
                tracing::info!("Added member {} to group {}", member.id, self.group_id);
                self.draft = MemberDraft::default();
                self.form_open = false;
                let _ = self.refresh().await;
                Ok(member)
            }
            Err(e) => {
                tracing::error!("Error adding member: {}", e);
                Err(e)
            }
        }
    }

    /// Remove a member after confirmation.
    ///
    /// Always re-fetches instead of splicing locally, so a stale identifier
    /// still converges to what the service holds.
    pub async fn remove(
        &mut self,
        member_id: MemberId,
        confirm: &impl Confirm,
    ) -> Result<Removal, ClientError> {
        if !confirm.confirm(REMOVE_MEMBER_PROMPT) {
            return Ok(Removal::Cancelled);
        }

        if let Err(e) = self.gateway.remove_member(member_id).await {
            tracing::error!("Error removing member {}: {}", member_id, e);
            return Err(e);
        }

        let _ = self.refresh().await;
        Ok(Removal::Removed)
    }

    pub fn rows(&self) -> Vec<MemberRow> {
        self.members
            .iter()
            .map(|member| MemberRow {
                id: member.id,
                name: member.name.clone(),
                email: member.email.clone(),
                initial: member.initial(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn offline_panel() -> MemberPanel {
        MemberPanel::new(Gateway::new("http://127.0.0.1:9").unwrap(), GroupId(1))
    }

    #[tokio::test]
    async fn test_add_requires_name_and_email() {
        let mut panel = offline_panel();
        panel.toggle_form();

        for (name, email) in [("", "a@example.com"), ("Ada", "  "), ("  ", "")] {
            panel.draft = MemberDraft {
                name: name.to_string(),
                email: email.to_string(),
            };
            let err = panel.submit_add().await.unwrap_err();
            assert!(err.is_validation(), "{:?}", err);
        }
        assert!(panel.is_form_open());
    }

    #[tokio::test]
    async fn test_failed_add_keeps_form_open() {
        let mut panel = offline_panel();
        panel.toggle_form();
        panel.draft = MemberDraft {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };

        assert!(panel.submit_add().await.is_err());
        assert!(!panel.is_adding());
        assert!(panel.is_form_open());
        assert_eq!(panel.draft.name, "Ada");
    }

    #[tokio::test]
    async fn test_declined_removal_sends_nothing() {
        let mut panel = offline_panel();
        let asked = Cell::new(0);
        let decline = |prompt: &str| {
            assert_eq!(prompt, REMOVE_MEMBER_PROMPT);
            asked.set(asked.get() + 1);
            false
        };

        let outcome = panel.remove(MemberId(3), &decline).await.unwrap();
        assert_eq!(outcome, Removal::Cancelled);
        assert_eq!(asked.get(), 1);
    }

    #[test]
    fn test_rows() {
        let mut panel = offline_panel();
        let ticket = panel.begin_refresh();
        panel
            .apply_refresh(
                ticket,
                Ok(vec![Member {
                    id: MemberId(4),
                    name: "grace".to_string(),
                    email: "grace@example.com".to_string(),
                    group_id: GroupId(1),
                    created_at: "2024-01-01T00:00:00Z".to_string(),
                }]),
            )
            .unwrap();

        let rows = panel.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].initial, Some('G'));
        assert_eq!(rows[0].email, "grace@example.com");
    }
}
