//! Domain model for users, tasks, assignments and task dependencies.
//!
//! Everything here is pure: values validate themselves on construction and
//! rules operate on plain data. Storage and orchestration live outside the
//! domain boundary.

mod assignment;
mod dependency;
mod error;
mod ids;
mod task;
mod user;

pub use assignment::{Assignment, LinkAction, Role};
pub use dependency::{DependencyEdge, DependencyGraph};
pub use error::{ParseLinkActionError, ParseRoleError, ParseTaskStatusError, TaskDomainError};
pub use ids::{TaskId, UserAlias};
pub use task::{NewTask, PersistedTaskData, Task, TaskStatus};
pub use user::User;
