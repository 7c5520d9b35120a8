//! Task aggregate and its lifecycle status.

use super::{ParseTaskStatusError, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    New,
    /// Task is being worked on.
    InProgress,
    /// Task has been finished.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Returns `true` when the transition table permits moving to `target`.
    ///
    /// The permitted moves are `NEW -> IN_PROGRESS`, `IN_PROGRESS -> DONE`
    /// and `IN_PROGRESS -> NEW`. Every other pair, including self-transitions,
    /// is rejected.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::New, Self::InProgress)
                | (Self::InProgress, Self::Done | Self::New)
        )
    }

    /// Returns `true` when no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "NEW" => Ok(Self::New),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task that has not been stored yet and therefore has no identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    name: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Prepares a task for insertion, timestamped by `clock`.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            created_at: clock.utc(),
        }
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Binds the store-assigned identifier, producing a task in status `NEW`.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            name: self.name,
            description: self.description,
            status: TaskStatus::New,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: String,
    description: String,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted task name.
    pub name: String,
    /// Persisted task description.
    pub description: String,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the task to `target` when the transition table allows it.
    ///
    /// This only consults the transition table. The dependency gate on
    /// `DONE` needs the dependency set and is enforced by the lifecycle
    /// service before calling this.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the move is
    /// not permitted; the task is left unchanged.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = clock.utc();
        Ok(())
    }
}
