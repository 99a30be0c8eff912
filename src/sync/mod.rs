//! The synchronization core: mapping, lookup tables and create-or-update.
//!
//! Everything here talks to the destination through `DestinationTracker`
//! and reads shared data only through an immutable `SyncContext`.

pub mod context;
pub mod engine;
pub mod import;
pub mod mapper;
pub mod project;
pub mod tags;
pub mod tracker;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use context::SyncContext;
pub use engine::{SyncEngine, SyncOutcome};
pub use project::ProjectSelector;
