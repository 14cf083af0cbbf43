//! Task panel: the tasks of one group.
//!
//! Keeps its own member cache for assignee lookups and the assignment
//! selector, independent of the member panel.

use super::{apply_fetch, Confirm, Generation, RefreshTicket, Removal};
use crate::errors::ClientError;
use crate::gateway::Gateway;
use crate::models::{
    display_date, optional_text, CreateTaskRequest, GroupId, Member, MemberId, Task, TaskAssignment,
    TaskId, TaskStatus,
};

pub const DELETE_TASK_PROMPT: &str = "Are you sure you want to delete this task?";

const MISSING_ASSIGNMENT: &str = "Please provide task title and assign it to a member.";

/// Display style for a task's status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    Pending,
    InProgress,
    Completed,
    /// Fallback for a status outside the enumeration
    Neutral,
}

impl StatusStyle {
    pub fn for_status(status: Option<TaskStatus>) -> Self {
        match status {
            Some(TaskStatus::Pending) => StatusStyle::Pending,
            Some(TaskStatus::InProgress) => StatusStyle::InProgress,
            Some(TaskStatus::Completed) => StatusStyle::Completed,
            None => StatusStyle::Neutral,
        }
    }

    /// Style for a raw wire value.
    pub fn for_raw(status: &str) -> Self {
        Self::for_status(TaskStatus::parse(status))
    }

    pub fn classes(&self) -> &'static str {
        match self {
            StatusStyle::Pending => "bg-yellow-500/20 text-yellow-400 border-yellow-500/30",
            StatusStyle::InProgress => "bg-blue-500/20 text-blue-400 border-blue-500/30",
            StatusStyle::Completed => "bg-green-500/20 text-green-400 border-green-500/30",
            StatusStyle::Neutral => "bg-gray-500/20 text-gray-400 border-gray-500/30",
        }
    }
}

/// Create-task form fields.
///
/// `assigned_to` holds the selector's raw value; it is parsed into a
/// [`MemberId`] on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub assign_to_all: bool,
    pub assigned_to: String,
}

impl TaskDraft {
    fn to_request(&self) -> Result<CreateTaskRequest, ClientError> {
        if self.title.trim().is_empty() {
            return Err(ClientError::Validation(MISSING_ASSIGNMENT.to_string()));
        }

        let assignment = if self.assign_to_all {
            TaskAssignment::AllMembers
        } else {
            let member_id: MemberId = self
                .assigned_to
                .parse()
                .map_err(|_| ClientError::Validation(MISSING_ASSIGNMENT.to_string()))?;
            TaskAssignment::Member(member_id)
        };

        Ok(CreateTaskRequest::new(
            self.title.clone(),
            optional_text(&self.description),
            assignment,
        ))
    }
}

/// One task as presented in the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow<'a> {
    pub task: &'a Task,
    /// `None` when unassigned or when the member is no longer in the group
    pub assignee: Option<&'a Member>,
    pub status: Option<TaskStatus>,
    pub style: StatusStyle,
    pub created_on: String,
}

pub struct TaskPanel {
    gateway: Gateway,
    group_id: GroupId,
    tasks: Vec<Task>,
    members: Vec<Member>,
    task_generation: Generation,
    member_generation: Generation,
    form_open: bool,
    creating: bool,
    pub draft: TaskDraft,
}

impl TaskPanel {
    pub fn new(gateway: Gateway, group_id: GroupId) -> Self {
        Self {
            gateway,
            group_id,
            tasks: Vec::new(),
            members: Vec::new(),
            task_generation: Generation::default(),
            member_generation: Generation::default(),
            form_open: false,
            creating: false,
            draft: TaskDraft::default(),
        }
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Members available in the assignment selector.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }

    pub fn toggle_form(&mut self) {
        self.form_open = !self.form_open;
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
    }

    /// Fetch tasks and members; each fetch fails independently.
    pub async fn mount(&mut self) {
        let _ = self.refresh().await;
        let _ = self.refresh_members().await;
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let ticket = self.begin_refresh();
        let result = self.gateway.list_tasks(self.group_id).await;
        self.apply_refresh(ticket, result)
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.task_generation.issue()
    }

    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Task>, ClientError>,
    ) -> Result<(), ClientError> {
        apply_fetch(&mut self.task_generation, &mut self.tasks, ticket, result, "tasks")
    }

    pub async fn refresh_members(&mut self) -> Result<(), ClientError> {
        let ticket = self.begin_refresh_members();
        let result = self.gateway.list_members(self.group_id).await;
        self.apply_refresh_members(ticket, result)
    }

    pub fn begin_refresh_members(&mut self) -> RefreshTicket {
        self.member_generation.issue()
    }

    pub fn apply_refresh_members(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Member>, ClientError>,
    ) -> Result<(), ClientError> {
        apply_fetch(
            &mut self.member_generation,
            &mut self.members,
            ticket,
            result,
            "members",
        )
    }

    /// Create a task from the draft, then refresh.
    ///
    /// Returns whatever records the service created; a fan-out may produce
    /// any number of them.
    pub async fn submit_create(&mut self) -> Result<Vec<Task>, ClientError> {
        let request = self.draft.to_request()?;

        self.creating = true;
        let result = self.gateway.create_task(self.group_id, &request).await;
        self.creating = false;

        match result {
            Ok(created) => {
                tracing::info!(
                    "Created {} task(s) titled {:?} in group {}",
                    created.len(),
                    request.title,
                    self.group_id
                );
                self.draft = TaskDraft::default();
                self.form_open = false;
                let _ = self.refresh().await;
                Ok(created)
            }
            Err(e) => {
                tracing::error!("Error creating task: {}", e);
                Err(e)
            }
        }
    }

    /// Change a task's status from a raw selector value.
    ///
    /// Values outside [`TaskStatus`] are rejected before any request.
    pub async fn change_status(
        &mut self,
        task_id: TaskId,
        status: &str,
    ) -> Result<Task, ClientError> {
        let status = TaskStatus::parse(status).ok_or_else(|| {
            ClientError::Validation(format!("Unknown task status {:?}", status))
        })?;
        self.set_status(task_id, status).await
    }

    pub async fn set_status(
        &mut self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, ClientError> {
        match self.gateway.update_task_status(task_id, status).await {
            Ok(task) => {
                let _ = self.refresh().await;
                Ok(task)
            }
            Err(e) => {
                tracing::error!("Error updating status of task {}: {}", task_id, e);
                Err(e)
            }
        }
    }

    pub async fn remove(
        &mut self,
        task_id: TaskId,
        confirm: &impl Confirm,
    ) -> Result<Removal, ClientError> {
        if !confirm.confirm(DELETE_TASK_PROMPT) {
            return Ok(Removal::Cancelled);
        }

        if let Err(e) = self.gateway.delete_task(task_id).await {
            tracing::error!("Error deleting task {}: {}", task_id, e);
            return Err(e);
        }

        let _ = self.refresh().await;
        Ok(Removal::Removed)
    }

    /// The member a task is assigned to, if still present in the cache.
    pub fn assignee(&self, task: &Task) -> Option<&Member> {
        let member_id = task.assigned_to_id?;
        self.members.iter().find(|member| member.id == member_id)
    }

    pub fn rows(&self) -> Vec<TaskRow<'_>> {
        self.tasks
            .iter()
            .map(|task| {
                let status = task.status();
                TaskRow {
                    task,
                    assignee: self.assignee(task),
                    status,
                    style: StatusStyle::for_status(status),
                    created_on: display_date(&task.created_at),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_panel() -> TaskPanel {
        TaskPanel::new(Gateway::new("http://127.0.0.1:9").unwrap(), GroupId(1))
    }

    fn member(id: i64, name: &str) -> Member {
        Member {
            id: MemberId(id),
            name: name.to_string(),
            email: format!("{}@example.com", name),
            group_id: GroupId(1),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn task(id: i64, status: &str, assigned_to: Option<i64>) -> Task {
        Task {
            id: TaskId(id),
            title: format!("Task {}", id),
            description: None,
            raw_status: status.to_string(),
            assigned_to_id: assigned_to.map(MemberId),
            group_id: GroupId(1),
            created_at: "2024-02-02T12:00:00".to_string(),
        }
    }

    fn loaded_panel(tasks: Vec<Task>, members: Vec<Member>) -> TaskPanel {
        let mut panel = offline_panel();
        let ticket = panel.begin_refresh();
        panel.apply_refresh(ticket, Ok(tasks)).unwrap();
        let ticket = panel.begin_refresh_members();
        panel.apply_refresh_members(ticket, Ok(members)).unwrap();
        panel
    }

    #[test]
    fn test_status_style_is_total() {
        assert_eq!(StatusStyle::for_raw("pending"), StatusStyle::Pending);
        assert_eq!(StatusStyle::for_raw("in_progress"), StatusStyle::InProgress);
        assert_eq!(StatusStyle::for_raw("completed"), StatusStyle::Completed);
        assert_eq!(StatusStyle::for_raw("blocked"), StatusStyle::Neutral);
        assert!(StatusStyle::Neutral.classes().contains("gray"));
    }

    #[test]
    fn test_draft_validation() {
        let missing_title = TaskDraft {
            title: "  ".to_string(),
            assign_to_all: true,
            ..TaskDraft::default()
        };
        assert!(missing_title.to_request().unwrap_err().is_validation());

        let missing_member = TaskDraft {
            title: "Write docs".to_string(),
            ..TaskDraft::default()
        };
        assert!(missing_member.to_request().unwrap_err().is_validation());

        let garbage_member = TaskDraft {
            title: "Write docs".to_string(),
            assigned_to: "someone".to_string(),
            ..TaskDraft::default()
        };
        assert!(garbage_member.to_request().unwrap_err().is_validation());
    }

    #[test]
    fn test_draft_to_request() {
        let single = TaskDraft {
            title: "Write docs".to_string(),
            description: String::new(),
            assign_to_all: false,
            assigned_to: "7".to_string(),
        };
        let request = single.to_request().unwrap();
        assert_eq!(request.assigned_to_id, Some(MemberId(7)));
        assert!(!request.assign_to_all);
        assert_eq!(request.description, None);

        let fan_out = TaskDraft {
            assign_to_all: true,
            ..single
        };
        let request = fan_out.to_request().unwrap();
        assert!(request.assign_to_all);
        assert_eq!(request.assigned_to_id, None);

        let spaced = TaskDraft {
            description: "  ".to_string(),
            ..fan_out
        };
        let request = spaced.to_request().unwrap();
        assert_eq!(request.description.as_deref(), Some("  "));
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected_locally() {
        let mut panel = offline_panel();
        let err = panel.change_status(TaskId(1), "done").await.unwrap_err();
        // Reaching the network would have produced a transport error.
        assert!(err.is_validation(), "{:?}", err);
    }

    #[tokio::test]
    async fn test_failed_status_change_keeps_displayed_status() {
        let mut panel = loaded_panel(vec![task(1, "pending", None)], vec![]);
        let err = panel.change_status(TaskId(1), "completed").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(panel.tasks()[0].status(), Some(TaskStatus::Pending));
    }

    #[tokio::test]
    async fn test_blank_title_leaves_draft_and_form() {
        let mut panel = offline_panel();
        panel.toggle_form();
        panel.draft.assigned_to = "1".to_string();

        assert!(panel.submit_create().await.unwrap_err().is_validation());
        assert!(panel.is_form_open());
        assert_eq!(panel.draft.assigned_to, "1");
        assert!(!panel.is_creating());
    }

    #[test]
    fn test_rows_resolve_assignees() {
        let panel = loaded_panel(
            vec![
                task(1, "pending", Some(10)),
                task(2, "in_progress", Some(99)),
                task(3, "completed", None),
                task(4, "archived", Some(10)),
            ],
            vec![member(10, "linus")],
        );

        let rows = panel.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].assignee.map(|m| m.name.as_str()), Some("linus"));
        // Member 99 was removed from the group.
        assert!(rows[1].assignee.is_none());
        assert!(rows[2].assignee.is_none());
        assert_eq!(rows[3].status, None);
        assert_eq!(rows[3].style, StatusStyle::Neutral);
        assert_eq!(rows[1].style, StatusStyle::InProgress);
        assert_eq!(rows[0].created_on, "2024-02-02");
    }

    #[test]
    fn test_task_and_member_caches_are_independent() {
        let mut panel = loaded_panel(vec![task(1, "pending", Some(10))], vec![member(10, "linus")]);

        let ticket = panel.begin_refresh_members();
        panel.apply_refresh_members(ticket, Ok(vec![])).unwrap();

        assert_eq!(panel.tasks().len(), 1);
        assert!(panel.rows()[0].assignee.is_none());
    }
}
