//! Tracker services: the operations a transport layer invokes.
//!
//! Every mutating operation runs its checks and writes inside one
//! [`TrackerStore::atomically`](crate::tracker::ports::TrackerStore::atomically)
//! unit, so a rejected request leaves the store untouched. Plain reads use
//! [`TrackerStore::read_only`](crate::tracker::ports::TrackerStore::read_only).

mod assignment;
mod dependency;
mod error;
mod facade;
mod lifecycle;
mod lookup;
mod registration;
mod views;

pub use assignment::{AssignmentService, ManageAssignmentRequest};
pub use dependency::{DependencyService, ManageDependencyRequest};
pub use error::{
    Blocked, Duplicate, InvalidInput, Missing, TrackerError, TrackerErrorKind, TrackerResult,
};
pub use lifecycle::{ChangeStatusRequest, CreateTaskRequest, TaskLifecycleService};
pub use registration::{RegisterUserRequest, UserRegistrationService};
pub use facade::TaskTracker;
pub use views::{
    Assignee, CreatedTask, StatusChange, TaskAssignments, TaskDependencies, TaskSummary, UserTasks,
};
