//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    CreateGroupRequest, CreateMemberRequest, Group, GroupId, Member, MemberId, OneOrMany, Task,
    TaskAssignment, TaskId, TaskStatus,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== GROUP OPERATIONS ====================

    /// List all groups in creation order.
    pub async fn list_groups(&self) -> Result<Vec<Group>, AppError> {
        let rows =
            sqlx::query("SELECT id, name, description, created_at FROM team_groups ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.iter().map(group_from_row).collect())
    }

    /// Get a group by ID.
    pub async fn get_group(&self, id: GroupId) -> Result<Option<Group>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at FROM team_groups WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(group_from_row))
    }

    /// Create a new group.
    pub async fn create_group(&self, request: &CreateGroupRequest) -> Result<Group, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO team_groups (name, description, created_at) VALUES (?, ?, ?)",
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Group {
            id: GroupId(result.last_insert_rowid()),
            name: request.name.clone(),
            description: request.description.clone(),
            created_at: now,
        })
    }

    /// Delete a group together with its members and tasks.
    pub async fn delete_group(&self, id: GroupId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM team_groups WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(group_not_found(id));
        }
        Ok(())
    }

    async fn require_group(&self, id: GroupId) -> Result<(), AppError> {
        match self.get_group(id).await? {
            Some(_) => Ok(()),
            None => Err(group_not_found(id)),
        }
    }

    // ==================== MEMBER OPERATIONS ====================

    /// List the members of a group.
    pub async fn list_members(&self, group_id: GroupId) -> Result<Vec<Member>, AppError> {
        self.require_group(group_id).await?;

        let rows = sqlx::query(
            "SELECT id, name, email, group_id, created_at FROM members WHERE group_id = ? ORDER BY id",
        )
        .bind(group_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(member_from_row).collect())
    }

    /// Get a member by ID.
    pub async fn get_member(&self, id: MemberId) -> Result<Option<Member>, AppError> {
        let row =
            sqlx::query("SELECT id, name, email, group_id, created_at FROM members WHERE id = ?")
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.as_ref().map(member_from_row))
    }

    /// Add a member to a group.
    pub async fn add_member(
        &self,
        group_id: GroupId,
        request: &CreateMemberRequest,
    ) -> Result<Member, AppError> {
        self.require_group(group_id).await?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO members (name, email, group_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(group_id.0)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Member {
            id: MemberId(result.last_insert_rowid()),
            name: request.name.clone(),
            email: request.email.clone(),
            group_id,
            created_at: now,
        })
    }

    /// Remove a member. Their tasks stay in the group, unassigned.
    pub async fn remove_member(&self, id: MemberId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Member {} not found", id)));
        }
        Ok(())
    }

    // ==================== TASK OPERATIONS ====================

    /// List the tasks of a group.
    pub async fn list_tasks(&self, group_id: GroupId) -> Result<Vec<Task>, AppError> {
        self.require_group(group_id).await?;

        let rows = sqlx::query(
            "SELECT id, title, description, status, assigned_to_id, group_id, created_at FROM tasks WHERE group_id = ? ORDER BY id",
        )
        .bind(group_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(task_from_row).collect())
    }

    /// Get a task by ID.
    pub async fn get_task(&self, id: TaskId) -> Result<Option<Task>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, description, status, assigned_to_id, group_id, created_at FROM tasks WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(task_from_row))
    }

    /// Create a task.
    ///
    /// A single assignment yields one task. Assigning to all members fans out
    /// to one task per current member, written in a single transaction.
    pub async fn create_task(
        &self,
        group_id: GroupId,
        title: &str,
        description: Option<&str>,
        assignment: TaskAssignment,
    ) -> Result<OneOrMany<Task>, AppError> {
        self.require_group(group_id).await?;

        let mut tx = self.pool.begin().await?;

        // Assignees are read in the same transaction as the inserts.
        let assignees: Vec<MemberId> = match assignment {
            TaskAssignment::Member(member_id) => {
                let row = sqlx::query("SELECT id FROM members WHERE id = ? AND group_id = ?")
                    .bind(member_id.0)
                    .bind(group_id.0)
                    .fetch_optional(&mut *tx)
                    .await?;
                if row.is_none() {
                    return Err(AppError::NotFound(
                        "Member not found in this group".to_string(),
                    ));
                }
                vec![member_id]
            }
            TaskAssignment::AllMembers => {
                let rows = sqlx::query("SELECT id FROM members WHERE group_id = ? ORDER BY id")
                    .bind(group_id.0)
                    .fetch_all(&mut *tx)
                    .await?;
                if rows.is_empty() {
                    return Err(AppError::Validation(
                        "Group has no members to assign the task to".to_string(),
                    ));
                }
                rows.iter().map(|row| MemberId(row.get("id"))).collect()
            }
        };

        let now = Utc::now().to_rfc3339();
        let status = TaskStatus::default();
        let mut created = Vec::with_capacity(assignees.len());

        for member_id in assignees {
            let result = sqlx::query(
                "INSERT INTO tasks (title, description, status, assigned_to_id, group_id, created_at) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(title)
            .bind(description)
            .bind(status.as_str())
            .bind(member_id.0)
            .bind(group_id.0)
            .bind(&now)
            .execute(&mut *tx)
            .await?;

            created.push(Task {
                id: TaskId(result.last_insert_rowid()),
                title: title.to_string(),
                description: description.map(str::to_string),
                raw_status: status.as_str().to_string(),
                assigned_to_id: Some(member_id),
                group_id,
                created_at: now.clone(),
            });
        }

        tx.commit().await?;

        Ok(match assignment {
            TaskAssignment::AllMembers => OneOrMany::Many(created),
            TaskAssignment::Member(_) => match created.pop() {
                Some(task) => OneOrMany::One(task),
                None => return Err(AppError::Internal("Task was not created".to_string())),
            },
        })
    }

    /// Set the status of a task and return the updated task.
    pub async fn update_task_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, AppError> {
        let result = sqlx::query("UPDATE tasks SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(task_not_found(id));
        }

        self.get_task(id).await?.ok_or_else(|| task_not_found(id))
    }

    /// Delete a task.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(task_not_found(id));
        }
        Ok(())
    }
}

fn group_not_found(id: GroupId) -> AppError {
    AppError::NotFound(format!("Group {} not found", id))
}

fn task_not_found(id: TaskId) -> AppError {
    AppError::NotFound(format!("Task {} not found", id))
}

// ==================== ROW MAPPING ====================

fn group_from_row(row: &SqliteRow) -> Group {
    Group {
        id: GroupId(row.get("id")),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    }
}

fn member_from_row(row: &SqliteRow) -> Member {
    Member {
        id: MemberId(row.get("id")),
        name: row.get("name"),
        email: row.get("email"),
        group_id: GroupId(row.get("group_id")),
        created_at: row.get("created_at"),
    }
}

fn task_from_row(row: &SqliteRow) -> Task {
    Task {
        id: TaskId(row.get("id")),
        title: row.get("title"),
        description: row.get("description"),
        raw_status: row.get("status"),
        assigned_to_id: row.get::<Option<i64>, _>("assigned_to_id").map(MemberId),
        group_id: GroupId(row.get("group_id")),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn repository() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .expect("Failed to init DB");
        (Repository::new(pool), temp_dir)
    }

    async fn seed_group(repo: &Repository, name: &str) -> Group {
        repo.create_group(&CreateGroupRequest {
            name: name.to_string(),
            description: None,
        })
        .await
        .unwrap()
    }

    async fn seed_member(repo: &Repository, group_id: GroupId, name: &str) -> Member {
        repo.add_member(
            group_id,
            &CreateMemberRequest {
                name: name.to_string(),
                email: format!("{}@example.com", name),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_group_delete_cascades() {
        let (repo, _dir) = repository().await;
        let group = seed_group(&repo, "Core").await;
        let member = seed_member(&repo, group.id, "ada").await;
        let task = repo
            .create_task(group.id, "Review", None, TaskAssignment::Member(member.id))
            .await
            .unwrap()
            .into_vec()
            .remove(0);

        repo.delete_group(group.id).await.unwrap();

        assert!(repo.get_group(group.id).await.unwrap().is_none());
        assert!(repo.get_member(member.id).await.unwrap().is_none());
        assert!(repo.get_task(task.id).await.unwrap().is_none());
        assert!(matches!(
            repo.list_tasks(group.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_removing_member_unassigns_tasks() {
        let (repo, _dir) = repository().await;
        let group = seed_group(&repo, "Core").await;
        let member = seed_member(&repo, group.id, "ada").await;
        repo.create_task(group.id, "Review", None, TaskAssignment::Member(member.id))
            .await
            .unwrap();

        repo.remove_member(member.id).await.unwrap();

        let tasks = repo.list_tasks(group.id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].assigned_to_id, None);
    }

    #[tokio::test]
    async fn test_fan_out_creates_one_task_per_member() {
        let (repo, _dir) = repository().await;
        let group = seed_group(&repo, "Core").await;
        for name in ["ada", "grace", "linus"] {
            seed_member(&repo, group.id, name).await;
        }

        let created = repo
            .create_task(group.id, "Retro", Some("Friday"), TaskAssignment::AllMembers)
            .await
            .unwrap();

        assert!(matches!(created, OneOrMany::Many(ref tasks) if tasks.len() == 3));
        let tasks = repo.list_tasks(group.id).await.unwrap();
        assert_eq!(tasks.len(), 3);
        assert!(tasks
            .iter()
            .all(|t| t.title == "Retro" && t.status() == Some(TaskStatus::Pending)));
    }

    #[tokio::test]
    async fn test_assignees_reflect_removals() {
        let (repo, _dir) = repository().await;
        let group = seed_group(&repo, "Core").await;
        let ada = seed_member(&repo, group.id, "ada").await;
        let grace = seed_member(&repo, group.id, "grace").await;

        repo.remove_member(ada.id).await.unwrap();

        let created = repo
            .create_task(group.id, "Retro", None, TaskAssignment::AllMembers)
            .await
            .unwrap()
            .into_vec();
        let assignees: Vec<_> = created.iter().map(|t| t.assigned_to_id).collect();
        assert_eq!(assignees, vec![Some(grace.id)]);

        let err = repo
            .create_task(group.id, "Solo", None, TaskAssignment::Member(ada.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(repo.list_tasks(group.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fan_out_without_members_is_rejected() {
        let (repo, _dir) = repository().await;
        let group = seed_group(&repo, "Empty").await;

        let err = repo
            .create_task(group.id, "Retro", None, TaskAssignment::AllMembers)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_single_assignment_requires_member_of_group() {
        let (repo, _dir) = repository().await;
        let core = seed_group(&repo, "Core").await;
        let other = seed_group(&repo, "Other").await;
        let outsider = seed_member(&repo, other.id, "eve").await;

        let err = repo
            .create_task(core.id, "Audit", None, TaskAssignment::Member(outsider.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_identifiers_are_not_reused() {
        let (repo, _dir) = repository().await;
        let first = seed_group(&repo, "First").await;
        repo.delete_group(first.id).await.unwrap();
        let second = seed_group(&repo, "Second").await;
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_update_status_of_missing_task() {
        let (repo, _dir) = repository().await;
        let err = repo
            .update_task_status(TaskId(404), TaskStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
