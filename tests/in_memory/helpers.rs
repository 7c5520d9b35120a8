//! Shared test helpers for in-memory store integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use std::io;
use std::sync::Arc;
use tasktrack::tracker::{
    adapters::memory::InMemoryTrackerStore,
    domain::{NewTask, User, UserAlias},
    services::TaskTracker,
};
use tokio::runtime::Runtime;

/// Tracker over the in-memory store.
pub type TestTracker = TaskTracker<InMemoryTrackerStore, DefaultClock>;

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a fresh in-memory store for each test.
#[fixture]
pub fn store() -> Arc<InMemoryTrackerStore> {
    Arc::new(InMemoryTrackerStore::new())
}

/// Provides a clock for task creation.
#[fixture]
pub fn clock() -> DefaultClock {
    DefaultClock
}

/// Builds a tracker sharing `store`.
#[must_use]
pub fn tracker_over(store: &Arc<InMemoryTrackerStore>) -> TestTracker {
    TaskTracker::new(Arc::clone(store), Arc::new(DefaultClock))
}

/// Builds a user with a display name derived from the alias.
///
/// # Panics
///
/// Panics when `alias` is blank.
#[must_use]
pub fn user(alias: &str) -> User {
    User::new(
        UserAlias::new(alias).expect("test aliases are never blank"),
        format!("{alias} name"),
    )
}

/// Builds an unsaved task.
#[must_use]
pub fn new_task(name: &str, clock: &DefaultClock) -> NewTask {
    NewTask::new(name, format!("{name} description"), clock)
}
