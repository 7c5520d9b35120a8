//! Step definitions shared by the task tracker behaviour scenarios.

mod then;
pub mod world;
