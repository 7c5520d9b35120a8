//! In-memory entity store backed by a staged copy-on-write state.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::tracker::{
    domain::{
        Assignment, DependencyEdge, DependencyGraph, NewTask, Role, Task, TaskId, User, UserAlias,
    },
    ports::{
        TrackerReader, TrackerStore, TrackerStoreError, TrackerStoreResult, TrackerTransaction,
    },
};

/// Thread-safe in-memory entity store.
///
/// Atomic units are fully serialized behind one write lock. Each runs
/// against a staged copy of the state, which replaces the live state only
/// when the unit succeeds. Read-only units share the read lock and borrow
/// the live state directly.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackerStore {
    state: Arc<RwLock<InMemoryTrackerState>>,
}

#[derive(Debug, Clone, Default)]
struct InMemoryTrackerState {
    users: HashMap<UserAlias, User>,
    tasks: BTreeMap<TaskId, Task>,
    last_task_id: i64,
    assignments: Vec<Assignment>,
    dependencies: DependencyGraph,
}

impl InMemoryTrackerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the committed dependency edge set.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the lock is poisoned.
    pub fn dependency_graph(&self) -> TrackerStoreResult<DependencyGraph> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.dependencies.clone())
    }

    /// Returns the number of committed assignments on `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerStoreError::Persistence`] when the lock is poisoned.
    pub fn assignment_count(&self, task_id: TaskId) -> TrackerStoreResult<usize> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .assignments
            .iter()
            .filter(|assignment| assignment.task_id() == task_id)
            .count())
    }
}

fn poisoned(err: impl std::fmt::Display) -> TrackerStoreError {
    TrackerStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TrackerStore for InMemoryTrackerStore {
    async fn atomically<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn TrackerTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<TrackerStoreError> + Send + 'static,
    {
        let mut state = self.state.write().map_err(poisoned)?;
        let mut staged = state.clone();
        let outcome = work(&mut staged)?;
        *state = staged;
        Ok(outcome)
    }

    async fn read_only<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn TrackerReader) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<TrackerStoreError> + Send + 'static,
    {
        let state = self.state.read().map_err(poisoned)?;
        work(&mut Snapshot { state: &*state })
    }
}

/// Read-only view of the live state held under the read lock.
struct Snapshot<'s> {
    state: &'s InMemoryTrackerState,
}

impl TrackerReader for Snapshot<'_> {
    fn find_user(&mut self, alias: &UserAlias) -> TrackerStoreResult<Option<User>> {
        Ok(self.state.users.get(alias).cloned())
    }

    fn find_task(&mut self, id: TaskId) -> TrackerStoreResult<Option<Task>> {
        Ok(self.state.tasks.get(&id).cloned())
    }

    fn tasks_for_user(&mut self, alias: &UserAlias) -> TrackerStoreResult<Vec<Task>> {
        let task_ids: BTreeSet<TaskId> = self
            .state
            .assignments
            .iter()
            .filter(|assignment| assignment.alias() == alias)
            .map(Assignment::task_id)
            .collect();
        Ok(task_ids
            .into_iter()
            .filter_map(|id| self.state.tasks.get(&id).cloned())
            .collect())
    }

    fn find_assignment(
        &mut self,
        alias: &UserAlias,
        task_id: TaskId,
        role: Role,
    ) -> TrackerStoreResult<Option<Assignment>> {
        Ok(self
            .state
            .assignments
            .iter()
            .find(|assignment| {
                assignment.alias() == alias
                    && assignment.task_id() == task_id
                    && assignment.role() == role
            })
            .cloned())
    }

    fn assignments_for_task(&mut self, task_id: TaskId) -> TrackerStoreResult<Vec<Assignment>> {
        Ok(self
            .state
            .assignments
            .iter()
            .filter(|assignment| assignment.task_id() == task_id)
            .cloned()
            .collect())
    }

    fn dependency_ids(&mut self, task_id: TaskId) -> TrackerStoreResult<Vec<TaskId>> {
        Ok(self.state.dependencies.dependencies_of(task_id))
    }

    fn dependencies_of(&mut self, task_id: TaskId) -> TrackerStoreResult<Vec<Task>> {
        Ok(self
            .state
            .dependencies
            .dependencies_of(task_id)
            .into_iter()
            .filter_map(|id| self.state.tasks.get(&id).cloned())
            .collect())
    }

    fn has_dependency(&mut self, edge: DependencyEdge) -> TrackerStoreResult<bool> {
        Ok(self.state.dependencies.contains(edge))
    }

    fn dependency_graph(&mut self) -> TrackerStoreResult<DependencyGraph> {
        Ok(self.state.dependencies.clone())
    }

    fn would_close_cycle(&mut self, edge: DependencyEdge) -> TrackerStoreResult<bool> {
        Ok(self.state.dependencies.would_close_cycle(edge))
    }
}

impl InMemoryTrackerState {
    const fn snapshot(&self) -> Snapshot<'_> {
        Snapshot { state: self }
    }
}

impl TrackerReader for InMemoryTrackerState {
    fn find_user(&mut self, alias: &UserAlias) -> TrackerStoreResult<Option<User>> {
        self.snapshot().find_user(alias)
    }

    fn find_task(&mut self, id: TaskId) -> TrackerStoreResult<Option<Task>> {
        self.snapshot().find_task(id)
    }

    fn tasks_for_user(&mut self, alias: &UserAlias) -> TrackerStoreResult<Vec<Task>> {
        self.snapshot().tasks_for_user(alias)
    }

    fn find_assignment(
        &mut self,
        alias: &UserAlias,
        task_id: TaskId,
        role: Role,
    ) -> TrackerStoreResult<Option<Assignment>> {
        self.snapshot().find_assignment(alias, task_id, role)
    }

    fn assignments_for_task(&mut self, task_id: TaskId) -> TrackerStoreResult<Vec<Assignment>> {
        self.snapshot().assignments_for_task(task_id)
    }

    fn dependency_ids(&mut self, task_id: TaskId) -> TrackerStoreResult<Vec<TaskId>> {
        self.snapshot().dependency_ids(task_id)
    }

    fn dependencies_of(&mut self, task_id: TaskId) -> TrackerStoreResult<Vec<Task>> {
        self.snapshot().dependencies_of(task_id)
    }

    fn has_dependency(&mut self, edge: DependencyEdge) -> TrackerStoreResult<bool> {
        self.snapshot().has_dependency(edge)
    }

    fn dependency_graph(&mut self) -> TrackerStoreResult<DependencyGraph> {
        self.snapshot().dependency_graph()
    }

    fn would_close_cycle(&mut self, edge: DependencyEdge) -> TrackerStoreResult<bool> {
        self.snapshot().would_close_cycle(edge)
    }
}

impl TrackerTransaction for InMemoryTrackerState {
    fn insert_user(&mut self, user: &User) -> TrackerStoreResult<()> {
        if self.users.contains_key(user.alias()) {
            return Err(TrackerStoreError::DuplicateUser(user.alias().clone()));
        }
        self.users.insert(user.alias().clone(), user.clone());
        Ok(())
    }

    fn insert_task(&mut self, task: &NewTask) -> TrackerStoreResult<Task> {
        self.last_task_id += 1;
        let stored = task.clone().into_task(TaskId::new(self.last_task_id));
        self.tasks.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    fn update_task(&mut self, task: &Task) -> TrackerStoreResult<()> {
        let slot = self
            .tasks
            .get_mut(&task.id())
            .ok_or(TrackerStoreError::TaskNotFound(task.id()))?;
        *slot = task.clone();
        Ok(())
    }

    fn insert_assignment(&mut self, assignment: &Assignment) -> TrackerStoreResult<()> {
        if self.assignments.contains(assignment) {
            return Err(TrackerStoreError::DuplicateAssignment(assignment.clone()));
        }
        self.assignments.push(assignment.clone());
        Ok(())
    }

    fn delete_assignment(&mut self, assignment: &Assignment) -> TrackerStoreResult<bool> {
        let before = self.assignments.len();
        self.assignments.retain(|existing| existing != assignment);
        Ok(self.assignments.len() != before)
    }

    fn insert_dependency(&mut self, edge: DependencyEdge) -> TrackerStoreResult<()> {
        if !self.dependencies.insert(edge) {
            return Err(TrackerStoreError::DuplicateDependency(edge));
        }
        Ok(())
    }

    fn delete_dependency(&mut self, edge: DependencyEdge) -> TrackerStoreResult<bool> {
        Ok(self.dependencies.remove(edge))
    }
}
