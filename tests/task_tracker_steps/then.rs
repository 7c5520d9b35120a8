//! Then steps for task tracker BDD scenarios.

use super::world::{TrackerWorld, run_async};
use rstest_bdd_macros::then;
use tasktrack::tracker::services::{Blocked, TrackerError};

fn last_result(world: &TrackerWorld) -> Result<&Result<(), TrackerError>, eyre::Report> {
    world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no request was made in this scenario"))
}

#[then("the request succeeds")]
fn request_succeeds(world: &TrackerWorld) -> Result<(), eyre::Report> {
    match last_result(world)? {
        Ok(()) => Ok(()),
        Err(err) => Err(eyre::eyre!("expected success, got {err:?}")),
    }
}

#[then(r#"the request fails with "{kind}""#)]
fn request_fails_with(world: &TrackerWorld, kind: String) -> Result<(), eyre::Report> {
    match last_result(world)? {
        Err(err) if format!("{:?}", err.kind()) == kind => Ok(()),
        other => Err(eyre::eyre!("expected a {kind} failure, got {other:?}")),
    }
}

#[then(r#"the unfinished dependencies are "{labels}""#)]
fn unfinished_dependencies_are(world: &TrackerWorld, labels: String) -> Result<(), eyre::Report> {
    let expected = world.task_ids(&labels)?;
    match last_result(world)? {
        Err(TrackerError::PreconditionFailed(Blocked::UnfinishedDependencies {
            pending, ..
        })) if *pending == expected => Ok(()),
        other => Err(eyre::eyre!(
            "expected unfinished dependencies {expected:?}, got {other:?}"
        )),
    }
}

#[then(r#"the direct dependencies of "{label}" are "{labels}""#)]
fn direct_dependencies_are(
    world: &TrackerWorld,
    label: String,
    labels: String,
) -> Result<(), eyre::Report> {
    let expected = world.task_ids(&labels)?;
    let found = run_async(world.tracker.task_dependencies(world.task(&label)?))?;
    eyre::ensure!(
        found.dependencies == expected,
        "expected dependencies {expected:?}, found {:?}",
        found.dependencies
    );
    Ok(())
}

#[then(r#""{label}" has no dependencies"#)]
fn has_no_dependencies(world: &TrackerWorld, label: String) -> Result<(), eyre::Report> {
    let found = run_async(world.tracker.task_dependencies(world.task(&label)?))?;
    eyre::ensure!(
        found.dependencies.is_empty(),
        "expected no dependencies, found {:?}",
        found.dependencies
    );
    Ok(())
}

#[then(r#""{label}" has status "{status}""#)]
fn has_status(world: &TrackerWorld, label: String, status: String) -> Result<(), eyre::Report> {
    let task = run_async(world.tracker.get_task(world.task(&label)?))?;
    eyre::ensure!(
        task.status.as_str() == status,
        "expected status {status}, found {}",
        task.status
    );
    Ok(())
}

#[then(r#"the assignees of "{label}" are "{assignees}""#)]
fn assignees_are(
    world: &TrackerWorld,
    label: String,
    assignees: String,
) -> Result<(), eyre::Report> {
    let found = run_async(world.tracker.task_assignments(world.task(&label)?))?;
    let rendered: Vec<String> = found
        .users
        .iter()
        .map(|assignee| format!("{}:{}", assignee.alias, assignee.role))
        .collect();
    let expected: Vec<&str> = assignees.split(',').map(str::trim).collect();
    eyre::ensure!(
        rendered == expected,
        "expected assignees {expected:?}, found {rendered:?}"
    );
    Ok(())
}
