//! Unit tests for the tracker bounded context.


use std::sync::Arc;

use crate::tracker::{
    adapters::memory::InMemoryTrackerStore,
    domain::TaskId,
    services::{CreateTaskRequest, RegisterUserRequest, TaskTracker, TrackerResult},
};
use mockable::DefaultClock;

type TestTracker = TaskTracker<InMemoryTrackerStore, DefaultClock>;

fn tracker_over(store: &Arc<InMemoryTrackerStore>) -> TestTracker {
    TaskTracker::new(Arc::clone(store), Arc::new(DefaultClock))
}

async fn register(tracker: &TestTracker, alias: &str) -> TrackerResult<()> {
    tracker
        .register_user(RegisterUserRequest::new(alias, format!("{alias} name")))
        .await
        .map(|_| ())
}

async fn create_task(tracker: &TestTracker, name: &str, owner: &str) -> TrackerResult<TaskId> {
    tracker
        .create_task(CreateTaskRequest::new(name, "", owner, "developer"))
        .await
        .map(|created| created.id)
}
