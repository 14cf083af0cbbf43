//! Wire models shared by the entity gateway and the reference service.
//!
//! Field names are snake_case on the wire, matching the REST contract.

mod group;
mod member;
mod shape;
mod task;

pub use group::*;
pub use member::*;
pub use shape::*;
pub use task::*;

use chrono::{DateTime, NaiveDateTime};

/// Declares an opaque, server-assigned integer identifier.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map($name)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`Group`].
    GroupId
);
entity_id!(
    /// Identifier of a [`Member`].
    MemberId
);
entity_id!(
    /// Identifier of a [`Task`].
    TaskId
);

/// Format a wire timestamp as a calendar date for display.
///
/// Accepts RFC 3339 and naive ISO-8601 timestamps; anything else is shown as-is.
pub fn display_date(timestamp: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.date_naive().to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.date().to_string();
    }
    timestamp.to_string()
}

/// Treat an empty optional text field as absent; any other text is kept as typed.
pub(crate) fn optional_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Treat a whitespace-only text field as absent.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
