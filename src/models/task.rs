//! Task model: a unit of work belonging to a group.

use serde::{Deserialize, Serialize};

use super::{GroupId, MemberId, TaskId};

/// Lifecycle status of a task. The set is closed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// All statuses, in selector order.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parse a wire value. Anything outside the enumeration is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    /// Human readable label for selectors.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as transferred over the wire.
///
/// `status` is kept as received so that a value outside [`TaskStatus`]
/// still decodes; use [`Task::status`] for the typed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "status")]
    pub raw_status: String,
    #[serde(default)]
    pub assigned_to_id: Option<MemberId>,
    pub group_id: GroupId,
    pub created_at: String,
}

impl Task {
    pub fn status(&self) -> Option<TaskStatus> {
        TaskStatus::parse(&self.raw_status)
    }
}

/// Who a new task is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAssignment {
    /// One specific member of the group.
    Member(MemberId),
    /// Every current member of the group; the service decides how many
    /// task records that produces.
    AllMembers,
}

/// Request body for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub assign_to_all: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<MemberId>,
}

impl CreateTaskRequest {
    pub fn new(title: String, description: Option<String>, assignment: TaskAssignment) -> Self {
        let (assign_to_all, assigned_to_id) = match assignment {
            TaskAssignment::Member(id) => (false, Some(id)),
            TaskAssignment::AllMembers => (true, None),
        };
        Self {
            title,
            description,
            assign_to_all,
            assigned_to_id,
        }
    }

    /// The assignment this request asks for, if it names one.
    ///
    /// The fan-out flag wins over a member identifier sent alongside it.
    pub fn assignment(&self) -> Option<TaskAssignment> {
        if self.assign_to_all {
            Some(TaskAssignment::AllMembers)
        } else {
            self.assigned_to_id.map(TaskAssignment::Member)
        }
    }
}
