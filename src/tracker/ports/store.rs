//! Entity store port: storage primitives executed as atomic units of work.
//!
//! The store holds users, tasks, assignments and dependency edges. It offers
//! lookups and insert/delete primitives only; every rule lives in the
//! services. Compound check-then-act operations are expressed as a closure
//! handed to [`TrackerStore::atomically`], which runs it against a
//! [`TrackerTransaction`] and commits all of its writes or none of them.
//! Pure lookups go through [`TrackerStore::read_only`] and see only the
//! [`TrackerReader`] half.

use crate::tracker::domain::{
    Assignment, DependencyEdge, DependencyGraph, NewTask, Role, Task, TaskId, User, UserAlias,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for entity store operations.
pub type TrackerStoreResult<T> = Result<T, TrackerStoreError>;

/// Runner for atomic units of work against the entity store.
#[async_trait]
pub trait TrackerStore: Send + Sync {
    /// Runs `work` as a single atomic unit.
    ///
    /// Writes made through the transaction become visible only if `work`
    /// returns `Ok`; on `Err` the store is left exactly as it was. Units of
    /// work touching the same entities never interleave in a way that lets
    /// one observe another's partial state.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or a
    /// [`TrackerStoreError`] converted into `E` when the unit cannot be
    /// started or committed.
    async fn atomically<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn TrackerTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<TrackerStoreError> + Send + 'static;

    /// Runs `work` against one consistent snapshot without write access.
    ///
    /// Read units may run alongside each other and never block on one
    /// another, only on writers.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or a
    /// [`TrackerStoreError`] converted into `E` when the snapshot cannot be
    /// opened.
    async fn read_only<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn TrackerReader) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<TrackerStoreError> + Send + 'static;
}

/// Lookups available inside any unit of work.
pub trait TrackerReader {
    /// Finds a user by alias.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the lookup fails.
    fn find_user(&mut self, alias: &UserAlias) -> TrackerStoreResult<Option<User>>;

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the lookup fails.
    fn find_task(&mut self, id: TaskId) -> TrackerStoreResult<Option<Task>>;

    /// Returns every task the user is assigned to, once each, by ascending
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the query fails.
    fn tasks_for_user(&mut self, alias: &UserAlias) -> TrackerStoreResult<Vec<Task>>;

    /// Finds the assignment keyed by the given triple.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the lookup fails.
    fn find_assignment(
        &mut self,
        alias: &UserAlias,
        task_id: TaskId,
        role: Role,
    ) -> TrackerStoreResult<Option<Assignment>>;

    /// Returns the task's assignments in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the query fails.
    fn assignments_for_task(&mut self, task_id: TaskId) -> TrackerStoreResult<Vec<Assignment>>;

    /// Returns the identifiers the task directly depends on, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the query fails.
    fn dependency_ids(&mut self, task_id: TaskId) -> TrackerStoreResult<Vec<TaskId>>;

    /// Returns the tasks the task directly depends on, by ascending
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the query fails.
    fn dependencies_of(&mut self, task_id: TaskId) -> TrackerStoreResult<Vec<Task>>;

    /// Returns `true` when the edge exists.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the lookup fails.
    fn has_dependency(&mut self, edge: DependencyEdge) -> TrackerStoreResult<bool>;

    /// Loads the whole dependency edge set.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the query fails.
    fn dependency_graph(&mut self) -> TrackerStoreResult<DependencyGraph>;

    /// Returns `true` when storing `edge` would close a cycle.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the edge set cannot
    /// be loaded.
    fn would_close_cycle(&mut self, edge: DependencyEdge) -> TrackerStoreResult<bool> {
        Ok(self.dependency_graph()?.would_close_cycle(edge))
    }
}

/// Storage primitives available inside one atomic unit of work.
pub trait TrackerTransaction: TrackerReader {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::DuplicateUser`] when the alias is taken.
    fn insert_user(&mut self, user: &User) -> TrackerStoreResult<()>;

    /// Stores a new task and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the insert fails.
    fn insert_task(&mut self, task: &NewTask) -> TrackerStoreResult<Task>;

    /// Persists the status and timestamps of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::TaskNotFound`] when the task does not
    /// exist.
    fn update_task(&mut self, task: &Task) -> TrackerStoreResult<()>;

    /// Stores a new assignment.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::DuplicateAssignment`] when the triple
    /// already exists.
    fn insert_assignment(&mut self, assignment: &Assignment) -> TrackerStoreResult<()>;

    /// Deletes an assignment. Returns `false` when nothing was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the delete fails.
    fn delete_assignment(&mut self, assignment: &Assignment) -> TrackerStoreResult<bool>;

    /// Stores a new edge.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::DuplicateDependency`] when the edge
    /// already exists.
    fn insert_dependency(&mut self, edge: DependencyEdge) -> TrackerStoreResult<()>;

    /// Deletes an edge. Returns `false` when nothing was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the delete fails.
    fn delete_dependency(&mut self, edge: DependencyEdge) -> TrackerStoreResult<bool>;
}

/// Errors returned by entity store implementations.
#[derive(Debug, Clone, Error)]
pub enum TrackerStoreError {
    /// A user with the same alias already exists.
    #[error("duplicate user alias: {0}")]
    DuplicateUser(UserAlias),

    /// The assignment triple already exists.
    #[error("duplicate assignment: {0}")]
    DuplicateAssignment(Assignment),

    /// The dependency edge already exists.
    #[error("duplicate dependency: {0}")]
    DuplicateDependency(DependencyEdge),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TrackerStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
