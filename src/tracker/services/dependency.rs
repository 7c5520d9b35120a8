//! Dependency graph manager: adding and removing "depends on" edges while
//! keeping the graph acyclic.

use super::{
    Duplicate, Missing, TaskDependencies, TrackerError, TrackerResult, lookup::require_task,
};
use crate::tracker::{
    domain::{DependencyEdge, LinkAction, TaskId},
    ports::TrackerStore,
};
use std::sync::Arc;
use tracing::Level;

/// Request payload for adding or removing a dependency edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageDependencyRequest {
    task_id: TaskId,
    depends_on: TaskId,
    action: String,
}

impl ManageDependencyRequest {
    /// Creates a request about the edge `task_id -> depends_on`.
    #[must_use]
    pub fn new(
        task_id: impl Into<TaskId>,
        depends_on: impl Into<TaskId>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            depends_on: depends_on.into(),
            action: action.into(),
        }
    }
}

/// Maintains the acyclic dependency edge set.
#[derive(Clone)]
pub struct DependencyService<S>
where
    S: TrackerStore,
{
    store: Arc<S>,
}

impl<S> DependencyService<S>
where
    S: TrackerStore,
{
    /// Creates a new dependency service.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Applies an `add` or `remove` to a task's dependencies and returns the
    /// task's direct dependencies afterwards.
    ///
    /// The cycle search runs for both actions, so removing `A -> B` is
    /// refused while `B` reaches `A`.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::InvalidValue`] for a self-dependency, before any
    ///   lookup.
    /// - [`TrackerError::NotFound`] for an unknown task.
    /// - [`TrackerError::CycleDetected`] when `depends_on` already reaches
    ///   `task_id`, whatever the action.
    /// - [`TrackerError::InvalidValue`] for an unknown action.
    /// - [`TrackerError::NotFound`] when removing an edge that does not
    ///   exist.
    /// - [`TrackerError::Conflict`] when adding an existing edge.
    #[tracing::instrument(
        skip_all,
        fields(
            task_id = %request.task_id,
            depends_on = %request.depends_on,
            action = %request.action,
        ),
        err(level = Level::DEBUG)
    )]
    pub async fn manage(
        &self,
        request: ManageDependencyRequest,
    ) -> TrackerResult<TaskDependencies> {
        let edge = DependencyEdge::new(request.task_id, request.depends_on)?;
        let raw_action = request.action;
        let (action, dependencies) = self
            .store
            .atomically(move |tx| -> TrackerResult<(LinkAction, TaskDependencies)> {
                require_task(tx, edge.task_id())?;
                require_task(tx, edge.depends_on())?;
                if tx.would_close_cycle(edge)? {
                    return Err(TrackerError::CycleDetected(edge));
                }
                let action = LinkAction::try_from(raw_action.as_str())?;
                match action {
                    LinkAction::Add => {
                        if tx.has_dependency(edge)? {
                            return Err(TrackerError::Conflict(Duplicate::Dependency(edge)));
                        }
                        tx.insert_dependency(edge)?;
                    }
                    LinkAction::Remove => {
                        if !tx.delete_dependency(edge)? {
                            return Err(TrackerError::NotFound(Missing::Dependency(edge)));
                        }
                    }
                }
                let dependencies = tx.dependency_ids(edge.task_id())?;
                Ok((
                    action,
                    TaskDependencies {
                        task_id: edge.task_id(),
                        dependencies,
                    },
                ))
            })
            .await?;
        tracing::info!(%edge, action = %action, "task dependencies updated");
        Ok(dependencies)
    }

    /// Returns a task's direct dependencies, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for an unknown task.
    #[tracing::instrument(skip_all, fields(task_id = %task_id), err(level = Level::DEBUG))]
    pub async fn task_dependencies(&self, task_id: TaskId) -> TrackerResult<TaskDependencies> {
        self.store
            .read_only(move |tx| -> TrackerResult<TaskDependencies> {
                require_task(tx, task_id)?;
                let dependencies = tx.dependency_ids(task_id)?;
                Ok(TaskDependencies {
                    task_id,
                    dependencies,
                })
            })
            .await
    }
}
