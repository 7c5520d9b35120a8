//! Port contracts for the tracker.
//!
//! Ports define infrastructure-agnostic interfaces used by tracker services.

pub mod store;

pub use store::{
    TrackerReader, TrackerStore, TrackerStoreError, TrackerStoreResult, TrackerTransaction,
};
