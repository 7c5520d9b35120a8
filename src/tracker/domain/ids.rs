//! Identifier types for the tracker domain.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier of a task.
///
/// Identifiers are handed out by the entity store on insert and are never
/// reused. Values that were never issued simply fail lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wraps a raw task identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique, user-chosen handle that keys a registered user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserAlias(String);

impl UserAlias {
    /// Creates a validated alias.
    ///
    /// Surrounding whitespace is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyAlias`] when nothing remains after
    /// trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyAlias);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the alias as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserAlias {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
