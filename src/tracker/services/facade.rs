//! Single entry point bundling the tracker services over one store.

use super::{
    AssignmentService, ChangeStatusRequest, CreateTaskRequest, CreatedTask, DependencyService,
    ManageAssignmentRequest, ManageDependencyRequest, RegisterUserRequest, StatusChange,
    TaskAssignments, TaskDependencies, TaskLifecycleService, TaskSummary, TrackerResult,
    UserRegistrationService, UserTasks,
};
use crate::tracker::{
    domain::{TaskId, User},
    ports::TrackerStore,
};
use mockable::Clock;
use std::sync::Arc;

/// Facade over the registration, lifecycle, assignment and dependency
/// services, all sharing one store and clock.
///
/// This is what a transport layer holds; each method is one request.
#[derive(Clone)]
pub struct TaskTracker<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync + 'static,
{
    registration: UserRegistrationService<S>,
    lifecycle: TaskLifecycleService<S, C>,
    assignments: AssignmentService<S>,
    dependencies: DependencyService<S>,
}

impl<S, C> TaskTracker<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a tracker over `store`, timestamping with `clock`.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            registration: UserRegistrationService::new(Arc::clone(&store)),
            lifecycle: TaskLifecycleService::new(Arc::clone(&store), clock),
            assignments: AssignmentService::new(Arc::clone(&store)),
            dependencies: DependencyService::new(store),
        }
    }

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// See [`UserRegistrationService::register`].
    pub async fn register_user(&self, request: RegisterUserRequest) -> TrackerResult<User> {
        self.registration.register(request).await
    }

    /// Creates a task owned by a registered user.
    ///
    /// # Errors
    ///
    /// See [`TaskLifecycleService::create_task`].
    pub async fn create_task(&self, request: CreateTaskRequest) -> TrackerResult<CreatedTask> {
        self.lifecycle.create_task(request).await
    }

    /// Returns one task.
    ///
    /// # Errors
    ///
    /// See [`TaskLifecycleService::get_task`].
    pub async fn get_task(&self, task_id: impl Into<TaskId>) -> TrackerResult<TaskSummary> {
        self.lifecycle.get_task(task_id.into()).await
    }

    /// Lists a user's tasks.
    ///
    /// # Errors
    ///
    /// See [`TaskLifecycleService::user_tasks`].
    pub async fn user_tasks(&self, alias: &str) -> TrackerResult<UserTasks> {
        self.lifecycle.user_tasks(alias).await
    }

    /// Changes a task's status.
    ///
    /// # Errors
    ///
    /// See [`TaskLifecycleService::change_status`].
    pub async fn change_status(&self, request: ChangeStatusRequest) -> TrackerResult<StatusChange> {
        self.lifecycle.change_status(request).await
    }

    /// Adds or removes an assignment.
    ///
    /// # Errors
    ///
    /// See [`AssignmentService::manage`].
    pub async fn manage_assignment(
        &self,
        request: ManageAssignmentRequest,
    ) -> TrackerResult<TaskAssignments> {
        self.assignments.manage(request).await
    }

    /// Adds or removes a dependency edge.
    ///
    /// # Errors
    ///
    /// See [`DependencyService::manage`].
    pub async fn manage_dependency(
        &self,
        request: ManageDependencyRequest,
    ) -> TrackerResult<TaskDependencies> {
        self.dependencies.manage(request).await
    }

    /// Returns a task's assignments.
    ///
    /// # Errors
    ///
    /// See [`AssignmentService::task_assignments`].
    pub async fn task_assignments(
        &self,
        task_id: impl Into<TaskId>,
    ) -> TrackerResult<TaskAssignments> {
        self.assignments.task_assignments(task_id.into()).await
    }

    /// Returns a task's direct dependencies.
    ///
    /// # Errors
    ///
    /// See [`DependencyService::task_dependencies`].
    pub async fn task_dependencies(
        &self,
        task_id: impl Into<TaskId>,
    ) -> TrackerResult<TaskDependencies> {
        self.dependencies.task_dependencies(task_id.into()).await
    }
}
