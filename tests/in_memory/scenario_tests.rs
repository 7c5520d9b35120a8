//! End-to-end tracker flows over the in-memory store.

use crate::in_memory::helpers::{runtime, store, tracker_over};
use rstest::rstest;
use std::io;
use std::sync::Arc;
use tasktrack::tracker::{
    adapters::memory::InMemoryTrackerStore,
    domain::{Role, TaskId, TaskStatus},
    services::{
        Blocked, ChangeStatusRequest, CreateTaskRequest, ManageDependencyRequest,
        RegisterUserRequest, TrackerError, TrackerErrorKind,
    },
};
use tokio::runtime::Runtime;

/// Walks the dependency lifecycle of two tasks owned by one user.
#[rstest]
fn dependency_lifecycle_for_two_tasks(
    runtime: io::Result<Runtime>,
    store: Arc<InMemoryTrackerStore>,
) -> eyre::Result<()> {
    let rt = runtime?;
    let tracker = tracker_over(&store);

    rt.block_on(tracker.register_user(RegisterUserRequest::new("eva", "Eva Lu")))?;
    let t1 = rt
        .block_on(tracker.create_task(CreateTaskRequest::new("T1", "", "eva", "developer")))?
        .id;
    let t2 = rt
        .block_on(tracker.create_task(CreateTaskRequest::new("T2", "", "eva", "developer")))?
        .id;

    let linked =
        rt.block_on(tracker.manage_dependency(ManageDependencyRequest::new(t2, t1, "add")))?;
    eyre::ensure!(linked.dependencies == vec![t1], "T2 should depend on T1 only");

    let kind_of = |request: ManageDependencyRequest| {
        rt.block_on(tracker.manage_dependency(request))
            .map(|_| ())
            .map_err(|err| err.kind())
    };
    let expectations = [
        (t2, t1, TrackerErrorKind::Conflict),
        (t1, t1, TrackerErrorKind::InvalidValue),
        (t1, t2, TrackerErrorKind::CycleDetected),
    ];
    for (task_id, depends_on, expected) in expectations {
        let outcome = kind_of(ManageDependencyRequest::new(task_id, depends_on, "add"));
        eyre::ensure!(
            outcome == Err(expected),
            "{task_id} -> {depends_on}: expected {expected:?}, got {outcome:?}"
        );
    }

    let move_to = |task: TaskId, status: &str| {
        rt.block_on(tracker.change_status(ChangeStatusRequest::new(task, status)))
    };
    move_to(t2, "IN_PROGRESS")?;
    match move_to(t2, "DONE") {
        Err(TrackerError::PreconditionFailed(Blocked::UnfinishedDependencies { pending, .. })) => {
            eyre::ensure!(pending == vec![t1], "only T1 should block T2");
        }
        other => eyre::bail!("expected T2 to be blocked, got {other:?}"),
    }

    move_to(t1, "IN_PROGRESS")?;
    move_to(t1, "DONE")?;
    let finished = move_to(t2, "DONE")?;
    eyre::ensure!(finished.status == TaskStatus::Done);

    let listing = rt.block_on(tracker.user_tasks("eva"))?;
    let statuses: Vec<TaskStatus> = listing.tasks.iter().map(|task| task.status).collect();
    eyre::ensure!(statuses == vec![TaskStatus::Done, TaskStatus::Done]);

    let assignments = rt.block_on(tracker.task_assignments(t2))?;
    eyre::ensure!(assignments.users.len() == 1);
    eyre::ensure!(
        assignments.users.iter().all(|assignee| assignee.role == Role::Developer),
        "the owner keeps the creation role"
    );
    Ok(())
}
