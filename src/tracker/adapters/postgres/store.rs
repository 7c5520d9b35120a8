//! `PostgreSQL` entity store.

use super::{
    models::{AssignmentRow, DependencyRow, NewTaskRow, TaskRow, UserRow},
    schema::{task_assignments, task_dependencies, tasks, users},
};
use crate::tracker::{
    domain::{
        Assignment, DependencyEdge, DependencyGraph, NewTask, PersistedTaskData, Role, Task,
        TaskId, TaskStatus, User, UserAlias,
    },
    ports::{
        TrackerReader, TrackerStore, TrackerStoreError, TrackerStoreResult, TrackerTransaction,
    },
};
use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the tracker store.
pub type TrackerPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed entity store.
///
/// Every unit of work runs inside one `SERIALIZABLE` transaction on a
/// pooled connection, offloaded to the blocking thread pool; read-only
/// units open it `READ ONLY`. Concurrent units that would observe each
/// other's partial state fail with a serialization error, surfaced as
/// [`TrackerStoreError::Persistence`]; nothing is retried here.
///
/// The cycle check loads the whole edge set inside the unit, so two
/// concurrent inserts that together close a cycle cannot both commit.
#[derive(Debug, Clone)]
pub struct PostgresTrackerStore {
    pool: TrackerPgPool,
}

impl PostgresTrackerStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TrackerPgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &TrackerPgPool {
        &self.pool
    }
}

/// Failure of a unit of work: either the work itself or the database
/// around it.
enum UnitFailure<E> {
    Work(E),
    Database(DieselError),
}

impl<E> From<DieselError> for UnitFailure<E> {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

#[async_trait]
impl TrackerStore for PostgresTrackerStore {
    async fn atomically<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn TrackerTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<TrackerStoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            run_unit(&pool, UnitMode::ReadWrite, |transaction| work(transaction))
        })
        .await
        .map_err(|err| E::from(TrackerStoreError::persistence(err)))?
    }

    async fn read_only<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn TrackerReader) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<TrackerStoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            run_unit(&pool, UnitMode::ReadOnly, |transaction| work(transaction))
        })
        .await
        .map_err(|err| E::from(TrackerStoreError::persistence(err)))?
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitMode {
    ReadWrite,
    ReadOnly,
}

/// Runs `work` inside one `SERIALIZABLE` transaction on a pooled
/// connection.
fn run_unit<T, E, F>(pool: &TrackerPgPool, mode: UnitMode, work: F) -> Result<T, E>
where
    F: FnOnce(&mut PgTrackerTransaction<'_>) -> Result<T, E>,
    E: From<TrackerStoreError>,
{
    let mut connection = pool.get().map_err(TrackerStoreError::persistence)?;
    let mut builder = connection.build_transaction().serializable();
    if mode == UnitMode::ReadOnly {
        builder = builder.read_only();
    }
    builder
        .run(|conn| {
            let mut transaction = PgTrackerTransaction { conn };
            work(&mut transaction).map_err(UnitFailure::Work)
        })
        .map_err(|failure| match failure {
            UnitFailure::Work(err) => err,
            UnitFailure::Database(err) => E::from(TrackerStoreError::persistence(err)),
        })
}

/// Storage primitives bound to one open transaction.
struct PgTrackerTransaction<'c> {
    conn: &'c mut PgConnection,
}

impl TrackerReader for PgTrackerTransaction<'_> {
    fn find_user(&mut self, alias: &UserAlias) -> TrackerStoreResult<Option<User>> {
        let row = users::table
            .find(alias.as_str())
            .select(UserRow::as_select())
            .first::<UserRow>(self.conn)
            .optional()
            .map_err(TrackerStoreError::persistence)?;
        row.map(row_to_user).transpose()
    }

    fn find_task(&mut self, id: TaskId) -> TrackerStoreResult<Option<Task>> {
        let row = tasks::table
            .find(id.value())
            .select(TaskRow::as_select())
            .first::<TaskRow>(self.conn)
            .optional()
            .map_err(TrackerStoreError::persistence)?;
        row.map(row_to_task).transpose()
    }

    fn tasks_for_user(&mut self, alias: &UserAlias) -> TrackerStoreResult<Vec<Task>> {
        let assigned = task_assignments::table
            .filter(task_assignments::user_alias.eq(alias.as_str()))
            .select(task_assignments::task_id);
        let rows = tasks::table
            .filter(tasks::id.eq_any(assigned))
            .order(tasks::id.asc())
            .select(TaskRow::as_select())
            .load::<TaskRow>(self.conn)
            .map_err(TrackerStoreError::persistence)?;
        rows.into_iter().map(row_to_task).collect()
    }

    fn find_assignment(
        &mut self,
        alias: &UserAlias,
        task_id: TaskId,
        role: Role,
    ) -> TrackerStoreResult<Option<Assignment>> {
        let row = task_assignments::table
            .filter(task_assignments::user_alias.eq(alias.as_str()))
            .filter(task_assignments::task_id.eq(task_id.value()))
            .filter(task_assignments::role.eq(role.as_str()))
            .select(AssignmentRow::as_select())
            .first::<AssignmentRow>(self.conn)
            .optional()
            .map_err(TrackerStoreError::persistence)?;
        row.map(row_to_assignment).transpose()
    }

    fn assignments_for_task(&mut self, task_id: TaskId) -> TrackerStoreResult<Vec<Assignment>> {
        let rows = task_assignments::table
            .filter(task_assignments::task_id.eq(task_id.value()))
            .order(task_assignments::position.asc())
            .select(AssignmentRow::as_select())
            .load::<AssignmentRow>(self.conn)
            .map_err(TrackerStoreError::persistence)?;
        rows.into_iter().map(row_to_assignment).collect()
    }

    fn dependency_ids(&mut self, task_id: TaskId) -> TrackerStoreResult<Vec<TaskId>> {
        let ids = task_dependencies::table
            .filter(task_dependencies::task_id.eq(task_id.value()))
            .order(task_dependencies::depends_on_id.asc())
            .select(task_dependencies::depends_on_id)
            .load::<i64>(self.conn)
            .map_err(TrackerStoreError::persistence)?;
        Ok(ids.into_iter().map(TaskId::new).collect())
    }

    fn dependencies_of(&mut self, task_id: TaskId) -> TrackerStoreResult<Vec<Task>> {
        let targets = task_dependencies::table
            .filter(task_dependencies::task_id.eq(task_id.value()))
            .select(task_dependencies::depends_on_id);
        let rows = tasks::table
            .filter(tasks::id.eq_any(targets))
            .order(tasks::id.asc())
            .select(TaskRow::as_select())
            .load::<TaskRow>(self.conn)
            .map_err(TrackerStoreError::persistence)?;
        rows.into_iter().map(row_to_task).collect()
    }

    fn has_dependency(&mut self, edge: DependencyEdge) -> TrackerStoreResult<bool> {
        diesel::select(exists(
            task_dependencies::table
                .filter(task_dependencies::task_id.eq(edge.task_id().value()))
                .filter(task_dependencies::depends_on_id.eq(edge.depends_on().value())),
        ))
        .get_result::<bool>(self.conn)
        .map_err(TrackerStoreError::persistence)
    }

    fn dependency_graph(&mut self) -> TrackerStoreResult<DependencyGraph> {
        let rows = task_dependencies::table
            .select(DependencyRow::as_select())
            .load::<DependencyRow>(self.conn)
            .map_err(TrackerStoreError::persistence)?;
        rows.into_iter().map(row_to_edge).collect()
    }
}

impl TrackerTransaction for PgTrackerTransaction<'_> {
    fn insert_user(&mut self, user: &User) -> TrackerStoreResult<()> {
        let row = UserRow {
            alias: user.alias().as_str().to_owned(),
            name: user.name().to_owned(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(self.conn)
            .map_err(|err| {
                if is_unique_violation(&err) {
                    TrackerStoreError::DuplicateUser(user.alias().clone())
                } else {
                    TrackerStoreError::persistence(err)
                }
            })?;
        Ok(())
    }

    fn insert_task(&mut self, task: &NewTask) -> TrackerStoreResult<Task> {
        let row = NewTaskRow {
            name: task.name().to_owned(),
            description: task.description().to_owned(),
            status: TaskStatus::New.as_str().to_owned(),
            created_at: task.created_at(),
            updated_at: task.created_at(),
        };
        let stored = diesel::insert_into(tasks::table)
            .values(&row)
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(self.conn)
            .map_err(TrackerStoreError::persistence)?;
        row_to_task(stored)
    }

    fn update_task(&mut self, task: &Task) -> TrackerStoreResult<()> {
        let updated = diesel::update(tasks::table.find(task.id().value()))
            .set((
                tasks::status.eq(task.status().as_str()),
                tasks::updated_at.eq(task.updated_at()),
            ))
            .execute(self.conn)
            .map_err(TrackerStoreError::persistence)?;
        if updated == 0 {
            return Err(TrackerStoreError::TaskNotFound(task.id()));
        }
        Ok(())
    }

    fn insert_assignment(&mut self, assignment: &Assignment) -> TrackerStoreResult<()> {
        let row = AssignmentRow {
            user_alias: assignment.alias().as_str().to_owned(),
            task_id: assignment.task_id().value(),
            role: assignment.role().as_str().to_owned(),
        };
        diesel::insert_into(task_assignments::table)
            .values(&row)
            .execute(self.conn)
            .map_err(|err| {
                if is_unique_violation(&err) {
                    TrackerStoreError::DuplicateAssignment(assignment.clone())
                } else {
                    TrackerStoreError::persistence(err)
                }
            })?;
        Ok(())
    }

    fn delete_assignment(&mut self, assignment: &Assignment) -> TrackerStoreResult<bool> {
        let deleted = diesel::delete(
            task_assignments::table
                .filter(task_assignments::user_alias.eq(assignment.alias().as_str()))
                .filter(task_assignments::task_id.eq(assignment.task_id().value()))
                .filter(task_assignments::role.eq(assignment.role().as_str())),
        )
        .execute(self.conn)
        .map_err(TrackerStoreError::persistence)?;
        Ok(deleted > 0)
    }

    fn insert_dependency(&mut self, edge: DependencyEdge) -> TrackerStoreResult<()> {
        let row = DependencyRow {
            task_id: edge.task_id().value(),
            depends_on_id: edge.depends_on().value(),
        };
        diesel::insert_into(task_dependencies::table)
            .values(&row)
            .execute(self.conn)
            .map_err(|err| {
                if is_unique_violation(&err) {
                    TrackerStoreError::DuplicateDependency(edge)
                } else {
                    TrackerStoreError::persistence(err)
                }
            })?;
        Ok(())
    }

    fn delete_dependency(&mut self, edge: DependencyEdge) -> TrackerStoreResult<bool> {
        let deleted = diesel::delete(
            task_dependencies::table
                .filter(task_dependencies::task_id.eq(edge.task_id().value()))
                .filter(task_dependencies::depends_on_id.eq(edge.depends_on().value())),
        )
        .execute(self.conn)
        .map_err(TrackerStoreError::persistence)?;
        Ok(deleted > 0)
    }
}

const fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

fn row_to_user(row: UserRow) -> TrackerStoreResult<User> {
    let alias = UserAlias::new(row.alias).map_err(TrackerStoreError::persistence)?;
    Ok(User::new(alias, row.name))
}

fn row_to_task(row: TaskRow) -> TrackerStoreResult<Task> {
    let TaskRow {
        id,
        name,
        description,
        status: persisted_status,
        created_at,
        updated_at,
    } = row;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TrackerStoreError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(id),
        name,
        description,
        status,
        created_at,
        updated_at,
    }))
}

fn row_to_assignment(row: AssignmentRow) -> TrackerStoreResult<Assignment> {
    let alias = UserAlias::new(row.user_alias).map_err(TrackerStoreError::persistence)?;
    let role = Role::try_from(row.role.as_str()).map_err(TrackerStoreError::persistence)?;
    Ok(Assignment::new(alias, TaskId::new(row.task_id), role))
}

fn row_to_edge(row: DependencyRow) -> TrackerStoreResult<DependencyEdge> {
    DependencyEdge::new(TaskId::new(row.task_id), TaskId::new(row.depends_on_id))
        .map_err(TrackerStoreError::persistence)
}
