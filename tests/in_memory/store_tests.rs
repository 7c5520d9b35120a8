//! Storage primitive tests for [`InMemoryTrackerStore`].
//!
//! Units of work are driven through the [`TrackerStore`] port directly so the
//! all-or-nothing behaviour is observed without service rules in between.

use crate::in_memory::helpers::{clock, new_task, runtime, store, user};
use mockable::DefaultClock;
use rstest::rstest;
use std::io;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;
use tasktrack::tracker::{
    adapters::memory::InMemoryTrackerStore,
    domain::{Assignment, DependencyEdge, Role, TaskId, TaskStatus},
    ports::{TrackerStore, TrackerStoreError},
};
use tokio::runtime::Runtime;

/// Tests that a failing unit of work leaves no trace.
#[rstest]
fn failed_unit_of_work_rolls_back_every_write(
    runtime: io::Result<Runtime>,
    store: Arc<InMemoryTrackerStore>,
    clock: DefaultClock,
) {
    let rt = runtime.expect("runtime creation");
    let task = new_task("T1", &clock);
    let eva = user("eva");

    let outcome: Result<(), TrackerStoreError> = rt.block_on(store.atomically(move |tx| {
        tx.insert_user(&eva)?;
        let stored = tx.insert_task(&task)?;
        tx.insert_assignment(&Assignment::new(
            eva.alias().clone(),
            stored.id(),
            Role::Developer,
        ))?;
        Err(TrackerStoreError::TaskNotFound(TaskId::new(404)))
    }));
    assert!(matches!(outcome, Err(TrackerStoreError::TaskNotFound(_))));

    let lookup = rt.block_on(store.atomically(|tx| {
        let alias = user("eva").alias().clone();
        Ok::<_, TrackerStoreError>((tx.find_user(&alias)?, tx.find_task(TaskId::new(1))?))
    }));
    let (found_user, found_task) = lookup.expect("lookup should succeed");
    assert!(found_user.is_none(), "user insert must be rolled back");
    assert!(found_task.is_none(), "task insert must be rolled back");
    assert_eq!(
        store.assignment_count(TaskId::new(1)).expect("count"),
        0,
        "assignment insert must be rolled back"
    );
}

/// Tests that task identifiers are issued in increasing order.
#[rstest]
fn task_ids_increase_and_tasks_start_new(
    runtime: io::Result<Runtime>,
    store: Arc<InMemoryTrackerStore>,
    clock: DefaultClock,
) {
    let rt = runtime.expect("runtime creation");
    let first = new_task("T1", &clock);
    let second = new_task("T2", &clock);

    let (a, b) = rt
        .block_on(store.atomically(move |tx| {
            Ok::<_, TrackerStoreError>((tx.insert_task(&first)?, tx.insert_task(&second)?))
        }))
        .expect("inserts should succeed");

    assert!(b.id() > a.id());
    assert_eq!(a.status(), TaskStatus::New);
    assert_eq!(a.name(), "T1");
    assert_eq!(b.description(), "T2 description");
}

/// Tests duplicate detection for every keyed entity.
#[rstest]
fn duplicate_keys_are_rejected(
    runtime: io::Result<Runtime>,
    store: Arc<InMemoryTrackerStore>,
    clock: DefaultClock,
) {
    let rt = runtime.expect("runtime creation");
    let first = new_task("T1", &clock);
    let second = new_task("T2", &clock);

    let outcome = rt.block_on(store.atomically(move |tx| {
        let eva = user("eva");
        tx.insert_user(&eva)?;
        let duplicate_user = tx.insert_user(&user("eva"));

        let a = tx.insert_task(&first)?;
        let b = tx.insert_task(&second)?;
        let assignment = Assignment::new(eva.alias().clone(), a.id(), Role::Tester);
        tx.insert_assignment(&assignment)?;
        let duplicate_assignment = tx.insert_assignment(&assignment);

        let edge = DependencyEdge::new(b.id(), a.id()).map_err(TrackerStoreError::persistence)?;
        tx.insert_dependency(edge)?;
        let duplicate_edge = tx.insert_dependency(edge);

        Ok::<_, TrackerStoreError>((duplicate_user, duplicate_assignment, duplicate_edge))
    }));

    let (duplicate_user, duplicate_assignment, duplicate_edge) =
        outcome.expect("unit of work should succeed");
    assert!(matches!(duplicate_user, Err(TrackerStoreError::DuplicateUser(_))));
    assert!(matches!(
        duplicate_assignment,
        Err(TrackerStoreError::DuplicateAssignment(_))
    ));
    assert!(matches!(
        duplicate_edge,
        Err(TrackerStoreError::DuplicateDependency(_))
    ));
}

/// Tests assignment listing order and deletion.
#[rstest]
fn assignments_keep_insertion_order(
    runtime: io::Result<Runtime>,
    store: Arc<InMemoryTrackerStore>,
    clock: DefaultClock,
) {
    let rt = runtime.expect("runtime creation");
    let task = new_task("T1", &clock);

    let (listed, deleted, deleted_again, remaining, eva_tasks) = rt
        .block_on(store.atomically(move |tx| {
            let (eva, kai) = (user("eva"), user("kai"));
            tx.insert_user(&eva)?;
            tx.insert_user(&kai)?;
            let stored = tx.insert_task(&task)?;
            let roles = [
                (kai.alias(), Role::Infra),
                (eva.alias(), Role::Developer),
                (eva.alias(), Role::Tester),
            ];
            for (alias, role) in roles {
                tx.insert_assignment(&Assignment::new(alias.clone(), stored.id(), role))?;
            }
            let listed = tx.assignments_for_task(stored.id())?;
            let target = Assignment::new(eva.alias().clone(), stored.id(), Role::Developer);
            let deleted = tx.delete_assignment(&target)?;
            let deleted_again = tx.delete_assignment(&target)?;
            let remaining = tx.assignments_for_task(stored.id())?;
            let eva_tasks = tx.tasks_for_user(eva.alias())?;
            Ok::<_, TrackerStoreError>((listed, deleted, deleted_again, remaining, eva_tasks))
        }))
        .expect("unit of work should succeed");

    let roles: Vec<Role> = listed.iter().map(Assignment::role).collect();
    assert_eq!(roles, vec![Role::Infra, Role::Developer, Role::Tester]);
    assert!(deleted);
    assert!(!deleted_again);
    assert_eq!(remaining.len(), 2);
    assert_eq!(eva_tasks.len(), 1, "a user's task is listed once");
}

/// Tests dependency lookups by identifier and by task.
#[rstest]
fn dependencies_are_listed_ascending(
    runtime: io::Result<Runtime>,
    store: Arc<InMemoryTrackerStore>,
    clock: DefaultClock,
) {
    let rt = runtime.expect("runtime creation");
    let names = ["T1", "T2", "T3"].map(|name| new_task(name, &clock));

    let (top, ids, tasks, removed, has_after) = rt
        .block_on(store.atomically(move |tx| {
            let mut stored = Vec::new();
            for task in &names {
                stored.push(tx.insert_task(task)?.id());
            }
            let [first, second, top] = stored.as_slice() else {
                return Err(TrackerStoreError::TaskNotFound(TaskId::new(0)));
            };
            let link = |from, to| {
                DependencyEdge::new(from, to).map_err(TrackerStoreError::persistence)
            };
            tx.insert_dependency(link(*top, *second)?)?;
            tx.insert_dependency(link(*top, *first)?)?;
            let ids = tx.dependency_ids(*top)?;
            let tasks = tx.dependencies_of(*top)?;
            let removed = tx.delete_dependency(link(*top, *second)?)?;
            let has_after = tx.has_dependency(link(*top, *second)?)?;
            Ok((*top, ids, tasks, removed, has_after))
        }))
        .expect("unit of work should succeed");

    assert_eq!(ids, vec![TaskId::new(1), TaskId::new(2)]);
    let names: Vec<&str> = tasks.iter().map(|task| task.name()).collect();
    assert_eq!(names, vec!["T1", "T2"]);
    assert!(removed);
    assert!(!has_after);
    let graph = store.dependency_graph().expect("graph");
    assert_eq!(graph.dependencies_of(top), vec![TaskId::new(1)]);
}

/// Tests that updating an unknown task is reported.
#[rstest]
fn update_of_unknown_task_is_not_found(
    runtime: io::Result<Runtime>,
    store: Arc<InMemoryTrackerStore>,
    clock: DefaultClock,
) {
    let rt = runtime.expect("runtime creation");
    let ghost = new_task("ghost", &clock).into_task(TaskId::new(42));

    let outcome = rt.block_on(store.atomically(move |tx| tx.update_task(&ghost)));

    assert!(matches!(
        outcome,
        Err(TrackerStoreError::TaskNotFound(id)) if id == TaskId::new(42)
    ));
}

/// Tests that a read-only unit does not lock out other readers.
#[rstest]
fn read_only_units_do_not_block_other_readers(
    runtime: io::Result<Runtime>,
    store: Arc<InMemoryTrackerStore>,
    clock: DefaultClock,
) {
    let rt = runtime.expect("runtime creation");
    let task = new_task("T1", &clock);
    let stored = rt
        .block_on(store.atomically(move |tx| tx.insert_task(&task)))
        .expect("insert should succeed");

    let reader = Arc::clone(&store);
    let task_id = stored.id();
    let (found, concurrent) = rt
        .block_on(store.read_only(move |tx| {
            let found = tx.find_task(task_id)?;
            let (sender, receiver) = mpsc::channel();
            thread::spawn(move || {
                sender
                    .send(reader.assignment_count(task_id))
                    .unwrap_or_default();
            });
            let concurrent = receiver.recv_timeout(Duration::from_secs(5)).ok();
            Ok::<_, TrackerStoreError>((found, concurrent))
        }))
        .expect("read-only unit should succeed");

    assert_eq!(found.map(|task| task.name().to_owned()), Some("T1".to_owned()));
    assert!(
        matches!(concurrent, Some(Ok(0))),
        "a second reader must get in while the first unit is open"
    );
}

/// Tests that the cycle check sees edges staged earlier in the same unit.
#[rstest]
fn cycle_check_sees_staged_edges(
    runtime: io::Result<Runtime>,
    store: Arc<InMemoryTrackerStore>,
    clock: DefaultClock,
) {
    let rt = runtime.expect("runtime creation");
    let [first_task, second_task] = ["T1", "T2"].map(|name| new_task(name, &clock));

    let (before, after, loaded) = rt
        .block_on(store.atomically(move |tx| {
            let first = tx.insert_task(&first_task)?.id();
            let second = tx.insert_task(&second_task)?.id();
            let forward =
                DependencyEdge::new(second, first).map_err(TrackerStoreError::persistence)?;
            let backward =
                DependencyEdge::new(first, second).map_err(TrackerStoreError::persistence)?;
            let before = tx.would_close_cycle(backward)?;
            tx.insert_dependency(forward)?;
            let after = tx.would_close_cycle(backward)?;
            Ok::<_, TrackerStoreError>((before, after, tx.dependency_graph()?.len()))
        }))
        .expect("unit of work should succeed");

    assert!(!before);
    assert!(after);
    assert_eq!(loaded, 1);
}
