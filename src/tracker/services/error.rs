//! Failure taxonomy shared by every tracker operation.
//!
//! Each failure maps to exactly one [`TrackerErrorKind`]; the boundary layer
//! translates kinds to transport status codes without inspecting payloads.

use crate::tracker::{
    domain::{
        Assignment, DependencyEdge, ParseLinkActionError, ParseRoleError, ParseTaskStatusError,
        TaskDomainError, TaskId, TaskStatus, UserAlias,
    },
    ports::TrackerStoreError,
};
use thiserror::Error;

/// Result type for tracker service operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Entity a request referred to that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Missing {
    /// No user is registered under the alias.
    #[error("user '{0}' not found")]
    User(String),
    /// No task has the identifier.
    #[error("task {0} not found")]
    Task(TaskId),
    /// The assignment triple does not exist.
    #[error("assignment {0} not found")]
    Assignment(Assignment),
    /// The dependency edge does not exist.
    #[error("dependency {0} not found")]
    Dependency(DependencyEdge),
}

/// Input that is not an acceptable value or combination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// The alias is blank.
    #[error("user alias must not be empty")]
    EmptyAlias,
    /// The status keyword is unknown.
    #[error(transparent)]
    Status(#[from] ParseTaskStatusError),
    /// The role keyword is unknown.
    #[error(transparent)]
    Role(#[from] ParseRoleError),
    /// The action keyword is unknown.
    #[error(transparent)]
    Action(#[from] ParseLinkActionError),
    /// A task was asked to depend on itself.
    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),
}

/// Domain rule blocking an otherwise well-formed request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Blocked {
    /// Some direct dependencies are not `DONE`.
    #[error("task {task_id} has unfinished dependencies: {}", format_ids(.pending))]
    UnfinishedDependencies {
        /// Task that was asked to finish.
        task_id: TaskId,
        /// Direct dependencies not yet `DONE`, ascending.
        pending: Vec<TaskId>,
    },
    /// Removing the assignment would leave the task with no assignees.
    #[error("task {task_id} must keep at least one assigned user")]
    LastAssignment {
        /// Task whose last assignment was targeted.
        task_id: TaskId,
    },
}

/// Link that already exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Duplicate {
    /// The assignment triple already exists.
    #[error("assignment {0} already exists")]
    Assignment(Assignment),
    /// The dependency edge already exists.
    #[error("dependency {0} already exists")]
    Dependency(DependencyEdge),
}

/// Service-level errors for tracker operations.
#[derive(Debug, Clone, Error)]
pub enum TrackerError {
    /// A referenced entity does not exist.
    #[error(transparent)]
    NotFound(Missing),

    /// An input value or combination is not acceptable.
    #[error(transparent)]
    InvalidValue(InvalidInput),

    /// The status change is not in the transition table.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Task whose status change was rejected.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// A domain rule blocks the request.
    #[error(transparent)]
    PreconditionFailed(Blocked),

    /// The request would create a duplicate link.
    #[error(transparent)]
    Conflict(Duplicate),

    /// The alias is already registered.
    #[error("alias '{0}' is already registered")]
    DuplicateKey(UserAlias),

    /// The dependency would close a cycle.
    #[error("dependency {0} would create a cycle")]
    CycleDetected(DependencyEdge),

    /// The entity store failed.
    #[error(transparent)]
    Store(TrackerStoreError),
}

/// Flat classification of [`TrackerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerErrorKind {
    /// See [`TrackerError::NotFound`].
    NotFound,
    /// See [`TrackerError::InvalidValue`].
    InvalidValue,
    /// See [`TrackerError::InvalidTransition`].
    InvalidTransition,
    /// See [`TrackerError::PreconditionFailed`].
    PreconditionFailed,
    /// See [`TrackerError::Conflict`].
    Conflict,
    /// See [`TrackerError::DuplicateKey`].
    DuplicateKey,
    /// See [`TrackerError::CycleDetected`].
    CycleDetected,
    /// See [`TrackerError::Store`].
    Store,
}

impl TrackerError {
    /// Returns the flat classification of this error.
    #[must_use]
    pub const fn kind(&self) -> TrackerErrorKind {
        match self {
            Self::NotFound(_) => TrackerErrorKind::NotFound,
            Self::InvalidValue(_) => TrackerErrorKind::InvalidValue,
            Self::InvalidTransition { .. } => TrackerErrorKind::InvalidTransition,
            Self::PreconditionFailed(_) => TrackerErrorKind::PreconditionFailed,
            Self::Conflict(_) => TrackerErrorKind::Conflict,
            Self::DuplicateKey(_) => TrackerErrorKind::DuplicateKey,
            Self::CycleDetected(_) => TrackerErrorKind::CycleDetected,
            Self::Store(_) => TrackerErrorKind::Store,
        }
    }
}

impl From<TrackerStoreError> for TrackerError {
    fn from(err: TrackerStoreError) -> Self {
        match err {
            TrackerStoreError::DuplicateUser(alias) => Self::DuplicateKey(alias),
            TrackerStoreError::DuplicateAssignment(assignment) => {
                Self::Conflict(Duplicate::Assignment(assignment))
            }
            TrackerStoreError::DuplicateDependency(edge) => {
                Self::Conflict(Duplicate::Dependency(edge))
            }
            TrackerStoreError::TaskNotFound(task_id) => Self::NotFound(Missing::Task(task_id)),
            TrackerStoreError::Persistence(_) => Self::Store(err),
        }
    }
}

impl From<TaskDomainError> for TrackerError {
    fn from(err: TaskDomainError) -> Self {
        match err {
            TaskDomainError::EmptyAlias => Self::InvalidValue(InvalidInput::EmptyAlias),
            TaskDomainError::SelfDependency(task_id) => {
                Self::InvalidValue(InvalidInput::SelfDependency(task_id))
            }
            TaskDomainError::InvalidStateTransition { task_id, from, to } => {
                Self::InvalidTransition { task_id, from, to }
            }
        }
    }
}

impl From<ParseTaskStatusError> for TrackerError {
    fn from(err: ParseTaskStatusError) -> Self {
        Self::InvalidValue(err.into())
    }
}

impl From<ParseRoleError> for TrackerError {
    fn from(err: ParseRoleError) -> Self {
        Self::InvalidValue(err.into())
    }
}

impl From<ParseLinkActionError> for TrackerError {
    fn from(err: ParseLinkActionError) -> Self {
        Self::InvalidValue(err.into())
    }
}

fn format_ids(ids: &[TaskId]) -> String {
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}
