//! Response shapes returned by tracker operations.
//!
//! Views serialize to the field names the boundary layer renders.

use crate::tracker::domain::{Assignment, Role, Task, TaskId, TaskStatus, User, UserAlias};
use serde::Serialize;

/// Identifier of a freshly created task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreatedTask {
    /// Store-assigned identifier.
    pub id: TaskId,
}

/// Compact task listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    /// Task identifier.
    pub id: TaskId,
    /// Task name.
    pub name: String,
    /// Current status.
    pub status: TaskStatus,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            name: task.name().to_owned(),
            status: task.status(),
        }
    }
}

/// A user together with every task they are assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserTasks {
    /// User alias.
    pub alias: UserAlias,
    /// User display name.
    pub name: String,
    /// Assigned tasks, once each, ascending by identifier.
    pub tasks: Vec<TaskSummary>,
}

impl UserTasks {
    pub(super) fn new(user: &User, tasks: &[Task]) -> Self {
        Self {
            alias: user.alias().clone(),
            name: user.name().to_owned(),
            tasks: tasks.iter().map(TaskSummary::from).collect(),
        }
    }
}

/// Outcome of a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    /// Task identifier.
    pub id: TaskId,
    /// Status after the change.
    pub status: TaskStatus,
}

/// One assignee of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignee {
    /// Assigned user.
    pub alias: UserAlias,
    /// Role held on the task.
    pub role: Role,
}

/// A task's assignment list in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskAssignments {
    /// Task identifier.
    pub task_id: TaskId,
    /// Current assignees.
    pub users: Vec<Assignee>,
}

impl TaskAssignments {
    pub(super) fn new(task_id: TaskId, assignments: Vec<Assignment>) -> Self {
        let users = assignments
            .into_iter()
            .map(|assignment| Assignee {
                role: assignment.role(),
                alias: assignment.alias().clone(),
            })
            .collect();
        Self { task_id, users }
    }
}

/// A task's direct dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDependencies {
    /// Task identifier.
    pub task_id: TaskId,
    /// Identifiers the task directly depends on, ascending.
    pub dependencies: Vec<TaskId>,
}
