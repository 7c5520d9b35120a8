//! Assignment of users to tasks in a given role.

use super::{ParseLinkActionError, ParseRoleError, TaskId, UserAlias};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capacity in which a user works on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Implements the task.
    Developer,
    /// Verifies the task.
    Tester,
    /// Provides infrastructure for the task.
    Infra,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::Tester => "tester",
            Self::Infra => "infra",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "developer" => Ok(Self::Developer),
            "tester" => Ok(Self::Tester),
            "infra" => Ok(Self::Infra),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(user, task, role)` triple; all three fields form the key.
///
/// One user may hold several roles on the same task, each as its own
/// assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    alias: UserAlias,
    task_id: TaskId,
    role: Role,
}

impl Assignment {
    /// Creates an assignment triple.
    #[must_use]
    pub const fn new(alias: UserAlias, task_id: TaskId, role: Role) -> Self {
        Self {
            alias,
            task_id,
            role,
        }
    }

    /// Returns the assigned user's alias.
    #[must_use]
    pub const fn alias(&self) -> &UserAlias {
        &self.alias
    }

    /// Returns the task the user is assigned to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the role held on the task.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} as {} on task {}", self.alias, self.role, self.task_id)
    }
}

/// Mutation requested on a membership or edge set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkAction {
    /// Insert the link.
    Add,
    /// Delete the link.
    Remove,
}

impl LinkAction {
    /// Returns the keyword accepted by [`LinkAction::try_from`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

impl TryFrom<&str> for LinkAction {
    type Error = ParseLinkActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            _ => Err(ParseLinkActionError(value.to_owned())),
        }
    }
}

impl fmt::Display for LinkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
