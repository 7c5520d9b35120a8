//! Assignment manager: adding and removing (user, task, role) links.

use super::{
    Blocked, Duplicate, Missing, TaskAssignments, TrackerError, TrackerResult,
    lookup::{require_task, require_user},
};
use crate::tracker::{
    domain::{Assignment, LinkAction, Role, TaskId},
    ports::TrackerStore,
};
use std::sync::Arc;
use tracing::Level;

/// Request payload for adding or removing an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageAssignmentRequest {
    task_id: TaskId,
    alias: String,
    role: String,
    action: String,
}

impl ManageAssignmentRequest {
    /// Creates an assignment request.
    #[must_use]
    pub fn new(
        task_id: impl Into<TaskId>,
        alias: impl Into<String>,
        role: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            alias: alias.into(),
            role: role.into(),
            action: action.into(),
        }
    }
}

/// Maintains the assignee list of each task.
///
/// Every task keeps at least one assignment: the last one can never be
/// removed.
#[derive(Clone)]
pub struct AssignmentService<S>
where
    S: TrackerStore,
{
    store: Arc<S>,
}

impl<S> AssignmentService<S>
where
    S: TrackerStore,
{
    /// Creates a new assignment service.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Applies an `add` or `remove` to a task's assignments and returns the
    /// resulting list.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::NotFound`] for an unknown task or user, or when
    ///   removing a triple that does not exist.
    /// - [`TrackerError::InvalidValue`] for an unknown role or action.
    /// - [`TrackerError::Conflict`] when adding an existing triple.
    /// - [`TrackerError::PreconditionFailed`] when removing the task's last
    ///   assignment.
    #[tracing::instrument(
        skip_all,
        fields(
            task_id = %request.task_id,
            alias = %request.alias,
            role = %request.role,
            action = %request.action,
        ),
        err(level = Level::DEBUG)
    )]
    pub async fn manage(&self, request: ManageAssignmentRequest) -> TrackerResult<TaskAssignments> {
        let ManageAssignmentRequest {
            task_id,
            alias: raw_alias,
            role: raw_role,
            action: raw_action,
        } = request;
        let (action, assignments) = self
            .store
            .atomically(move |tx| -> TrackerResult<(LinkAction, TaskAssignments)> {
                require_task(tx, task_id)?;
                let user = require_user(tx, &raw_alias)?;
                let role = Role::try_from(raw_role.as_str())?;
                let action = LinkAction::try_from(raw_action.as_str())?;
                let assignment = Assignment::new(user.alias().clone(), task_id, role);
                match action {
                    LinkAction::Add => {
                        if tx.find_assignment(user.alias(), task_id, role)?.is_some() {
                            return Err(TrackerError::Conflict(Duplicate::Assignment(assignment)));
                        }
                        tx.insert_assignment(&assignment)?;
                    }
                    LinkAction::Remove => {
                        if tx.find_assignment(user.alias(), task_id, role)?.is_none() {
                            return Err(TrackerError::NotFound(Missing::Assignment(assignment)));
                        }
                        if tx.assignments_for_task(task_id)?.len() <= 1 {
                            return Err(TrackerError::PreconditionFailed(
                                Blocked::LastAssignment { task_id },
                            ));
                        }
                        tx.delete_assignment(&assignment)?;
                    }
                }
                let current = tx.assignments_for_task(task_id)?;
                Ok((action, TaskAssignments::new(task_id, current)))
            })
            .await?;
        tracing::info!(
            task_id = %task_id,
            action = %action,
            assignees = assignments.users.len(),
            "task assignments updated"
        );
        Ok(assignments)
    }

    /// Returns a task's current assignments in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for an unknown task.
    #[tracing::instrument(skip_all, fields(task_id = %task_id), err(level = Level::DEBUG))]
    pub async fn task_assignments(&self, task_id: TaskId) -> TrackerResult<TaskAssignments> {
        self.store
            .read_only(move |tx| -> TrackerResult<TaskAssignments> {
                require_task(tx, task_id)?;
                let current = tx.assignments_for_task(task_id)?;
                Ok(TaskAssignments::new(task_id, current))
            })
            .await
    }
}
