//! View state for the group browser, the group workspace and its panels.
//!
//! Every component owns its cache of remote entities outright and keeps it
//! consistent by re-fetching after each write it performs. Caches are
//! replaced in full, never patched.

mod group_browser;
mod group_workspace;
mod member_panel;
mod task_panel;

pub use group_browser::*;
pub use group_workspace::*;
pub use member_panel::*;
pub use task_panel::*;

use crate::models::GroupId;

/// Interactive yes/no confirmation shown before destructive operations.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Browser,
    Workspace(GroupId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Browser => "/".to_string(),
            Route::Workspace(id) => format!("/groups/{}", id),
        }
    }
}

/// Result of an operation gated by [`Confirm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The user declined; nothing was sent
    Cancelled,
    Removed,
}

/// Identifies one issued fetch for a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// Monotonic request counter guarding one cache against stale responses.
///
/// A response is applied only if its ticket is newer than the last applied
/// one, so a slow older fetch can never overwrite a newer result.
#[derive(Debug, Default)]
pub struct Generation {
    issued: u64,
    applied: u64,
}

impl Generation {
    pub fn issue(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Record `ticket` as applied if it is not stale.
    pub fn accept(&mut self, ticket: RefreshTicket) -> bool {
        if ticket.0 <= self.applied {
            return false;
        }
        self.applied = ticket.0;
        true
    }
}

/// Store a fetch result into `cache` unless `ticket` is stale.
///
/// Failures leave the cache untouched and are logged.
pub(crate) fn apply_fetch<T>(
    generation: &mut Generation,
    cache: &mut Vec<T>,
    ticket: RefreshTicket,
    result: Result<Vec<T>, crate::errors::ClientError>,
    what: &str,
) -> Result<(), crate::errors::ClientError> {
    match result {
        Ok(items) => {
            if generation.accept(ticket) {
                *cache = items;
            } else {
                tracing::debug!("Discarding stale {} response", what);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Error fetching {}: {}", what, e);
            Err(e)
        }
    }
}
