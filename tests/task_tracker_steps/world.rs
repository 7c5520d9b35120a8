//! Shared world state for task tracker BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use tasktrack::tracker::{
    adapters::memory::InMemoryTrackerStore,
    domain::TaskId,
    services::{TaskTracker, TrackerError},
};

/// Tracker type used by the BDD world.
pub type TestTracker = TaskTracker<InMemoryTrackerStore, DefaultClock>;

/// Scenario world for task tracker behaviour tests.
pub struct TrackerWorld {
    pub tracker: TestTracker,
    pub tasks: HashMap<String, TaskId>,
    pub last_result: Option<Result<(), TrackerError>>,
}

impl TrackerWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tracker: TaskTracker::new(
                Arc::new(InMemoryTrackerStore::new()),
                Arc::new(DefaultClock),
            ),
            tasks: HashMap::new(),
            last_result: None,
        }
    }

    /// Resolves a scenario task label to its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when no task was created under `label`.
    pub fn task(&self, label: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(label)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task labelled {label} in scenario world"))
    }

    /// Resolves a comma-separated list of task labels.
    ///
    /// # Errors
    ///
    /// Returns an error when any label is unknown.
    pub fn task_ids(&self, labels: &str) -> Result<Vec<TaskId>, eyre::Report> {
        labels
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(|label| self.task(label))
            .collect()
    }

    /// Records the outcome of the step under test.
    pub fn record<T>(&mut self, result: Result<T, TrackerError>) {
        self.last_result = Some(result.map(|_| ()));
    }
}

impl Default for TrackerWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TrackerWorld {
    TrackerWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
