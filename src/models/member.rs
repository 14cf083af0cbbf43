//! Member model: a person belonging to exactly one group.

use serde::{Deserialize, Serialize};

use super::{GroupId, MemberId};

/// A group member who can be assigned to tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub group_id: GroupId,
    pub created_at: String,
}

impl Member {
    /// Uppercased first letter of the name, used as an avatar.
    pub fn initial(&self) -> Option<char> {
        self.name.trim().chars().next().map(|c| {
            c.to_uppercase().next().unwrap_or(c)
        })
    }
}

/// Request body for adding a member to a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str) -> Member {
        Member {
            id: MemberId(1),
            name: name.to_string(),
            email: "a@example.com".to_string(),
            group_id: GroupId(1),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_initial() {
        assert_eq!(member("ada").initial(), Some('A'));
        assert_eq!(member("  émile").initial(), Some('É'));
        assert_eq!(member("").initial(), None);
    }
}
