//! Task creation, reads and the status state machine.

use super::{
    Blocked, CreatedTask, StatusChange, TaskSummary, TrackerError, TrackerResult, UserTasks,
    lookup::{require_task, require_user},
};
use crate::tracker::{
    domain::{Assignment, NewTask, Role, Task, TaskId, TaskStatus},
    ports::TrackerStore,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::Level;

/// Request payload for creating a task with its first assignee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    name: String,
    description: String,
    owner_alias: String,
    role: String,
}

impl CreateTaskRequest {
    /// Creates a task creation request.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        owner_alias: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            owner_alias: owner_alias.into(),
            role: role.into(),
        }
    }
}

/// Request payload for moving a task to another status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeStatusRequest {
    task_id: TaskId,
    target_status: String,
}

impl ChangeStatusRequest {
    /// Creates a status change request.
    #[must_use]
    pub fn new(task_id: impl Into<TaskId>, target_status: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            target_status: target_status.into(),
        }
    }
}

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync + 'static,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a `NEW` task and assigns its owner in one atomic step.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] when the owner is not registered
    /// and [`TrackerError::InvalidValue`] when the role is unknown. Nothing
    /// is stored on failure.
    #[tracing::instrument(
        skip(self, request),
        fields(owner = %request.owner_alias, role = %request.role),
        err(level = Level::DEBUG)
    )]
    pub async fn create_task(&self, request: CreateTaskRequest) -> TrackerResult<CreatedTask> {
        let CreateTaskRequest {
            name,
            description,
            owner_alias,
            role: raw_role,
        } = request;
        let new_task = NewTask::new(name, description, &*self.clock);
        let task = self
            .store
            .atomically(move |tx| -> TrackerResult<Task> {
                let owner = require_user(tx, &owner_alias)?;
                let role = Role::try_from(raw_role.as_str())?;
                let task = tx.insert_task(&new_task)?;
                tx.insert_assignment(&Assignment::new(owner.alias().clone(), task.id(), role))?;
                Ok(task)
            })
            .await?;
        tracing::info!(task_id = %task.id(), "task created");
        Ok(CreatedTask { id: task.id() })
    }

    /// Returns a task's compact listing.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for an unknown task.
    #[tracing::instrument(skip_all, fields(task_id = %task_id), err(level = Level::DEBUG))]
    pub async fn get_task(&self, task_id: TaskId) -> TrackerResult<TaskSummary> {
        let task = self
            .store
            .read_only(move |tx| require_task(tx, task_id))
            .await?;
        Ok(TaskSummary::from(&task))
    }

    /// Returns a user together with every task they are assigned to.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] when the alias is not registered.
    #[tracing::instrument(skip_all, fields(alias = %alias), err(level = Level::DEBUG))]
    pub async fn user_tasks(&self, alias: &str) -> TrackerResult<UserTasks> {
        let raw_alias = alias.to_owned();
        self.store
            .read_only(move |tx| -> TrackerResult<UserTasks> {
                let user = require_user(tx, &raw_alias)?;
                let tasks = tx.tasks_for_user(user.alias())?;
                Ok(UserTasks::new(&user, &tasks))
            })
            .await
    }

    /// Moves a task along the status transition table.
    ///
    /// A move to `DONE` additionally requires every direct dependency to be
    /// `DONE` already.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for an unknown task,
    /// [`TrackerError::InvalidValue`] for an unknown status,
    /// [`TrackerError::InvalidTransition`] when the move is not in the table
    /// and [`TrackerError::PreconditionFailed`] listing the unfinished
    /// dependencies. The task is unchanged on failure.
    #[tracing::instrument(
        skip(self, request),
        fields(task_id = %request.task_id, target = %request.target_status),
        err(level = Level::DEBUG)
    )]
    pub async fn change_status(&self, request: ChangeStatusRequest) -> TrackerResult<StatusChange> {
        let ChangeStatusRequest {
            task_id,
            target_status,
        } = request;
        let clock = Arc::clone(&self.clock);
        let change = self
            .store
            .atomically(move |tx| -> TrackerResult<StatusChange> {
                let mut task = require_task(tx, task_id)?;
                let target = TaskStatus::try_from(target_status.as_str())?;
                if target == TaskStatus::Done && task.status().can_transition_to(target) {
                    let pending: Vec<TaskId> = tx
                        .dependencies_of(task_id)?
                        .iter()
                        .filter(|dependency| dependency.status() != TaskStatus::Done)
                        .map(Task::id)
                        .collect();
                    if !pending.is_empty() {
                        return Err(TrackerError::PreconditionFailed(
                            Blocked::UnfinishedDependencies { task_id, pending },
                        ));
                    }
                }
                task.transition_to(target, &*clock)?;
                tx.update_task(&task)?;
                Ok(StatusChange {
                    id: task.id(),
                    status: task.status(),
                })
            })
            .await?;
        tracing::info!(task_id = %change.id, status = %change.status, "task status changed");
        Ok(change)
    }
}
