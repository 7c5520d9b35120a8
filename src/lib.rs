//! Tasktrack: the core of a small task tracker.
//!
//! Users register under unique aliases, create tasks, assign each other to
//! tasks in a role, link tasks with "depends on" edges and drive tasks
//! through a small status state machine. The crate holds the rules and the
//! storage; transport decoding is left to the embedding service.
//!
//! # Architecture
//!
//! Tasktrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`tracker`]: Users, tasks, assignments and dependencies

pub mod tracker;
