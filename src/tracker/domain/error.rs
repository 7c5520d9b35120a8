//! Error types for tracker domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The user alias is empty after trimming.
    #[error("user alias must not be empty")]
    EmptyAlias,

    /// A task was asked to depend on itself.
    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    /// The requested status change is not in the transition table.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStateTransition {
        /// Task whose status change was rejected.
        task_id: TaskId,
        /// Status the task currently holds.
        from: TaskStatus,
        /// Status that was requested.
        to: TaskStatus,
    },
}

/// Error returned when a task status string is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned when an assignment role string is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown assignment role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned when a link action keyword is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown action '{0}', expected add or remove")]
pub struct ParseLinkActionError(pub String);
