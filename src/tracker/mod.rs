//! Task tracking: users, tasks, assignments and task dependencies.
//!
//! Tasks move through `NEW -> IN_PROGRESS -> DONE` (with a step back from
//! `IN_PROGRESS` to `NEW`). Every task keeps at least one assignee, and the
//! "depends on" relation between tasks stays acyclic. A task can only be
//! finished once everything it directly depends on is finished. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
