//! In-memory adapters for tests and embedding.

mod store;

pub use store::InMemoryTrackerStore;
