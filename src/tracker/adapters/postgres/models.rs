//! Diesel row models for tracker persistence.

use super::schema::{task_assignments, task_dependencies, tasks, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for user records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Unique user alias.
    pub alias: String,
    /// Display name.
    pub name: String,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Store-assigned task identifier.
    pub id: i64,
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status change timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records; the identifier comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status change timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for assignment triples; `position` is left to its sequence.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssignmentRow {
    /// Assigned user.
    pub user_alias: String,
    /// Task the user is assigned to.
    pub task_id: i64,
    /// Role held on the task.
    pub role: String,
}

/// Row model for dependency edges.
#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_dependencies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DependencyRow {
    /// Dependent task.
    pub task_id: i64,
    /// Task depended upon.
    pub depends_on_id: i64,
}
