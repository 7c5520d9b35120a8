//! Existence checks shared by the services.

use super::{Missing, TrackerError, TrackerResult};
use crate::tracker::{
    domain::{Task, TaskId, User, UserAlias},
    ports::TrackerReader,
};

/// Loads a task or fails with `NotFound`.
pub(super) fn require_task<R>(tx: &mut R, task_id: TaskId) -> TrackerResult<Task>
where
    R: TrackerReader + ?Sized,
{
    tx.find_task(task_id)?
        .ok_or(TrackerError::NotFound(Missing::Task(task_id)))
}

/// Loads a registered user or fails with `NotFound`.
///
/// A blank alias can never have been registered, so it is reported as
/// missing rather than malformed.
pub(super) fn require_user<R>(tx: &mut R, raw_alias: &str) -> TrackerResult<User>
where
    R: TrackerReader + ?Sized,
{
    let missing = || TrackerError::NotFound(Missing::User(raw_alias.to_owned()));
    let alias = UserAlias::new(raw_alias).map_err(|_| missing())?;
    tx.find_user(&alias)?.ok_or_else(missing)
}
