//! Persistence gateway contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define the snapshot load/save contract the board service depends on.
//! - Keep SQL details behind that contract.
//!
//! # Invariants
//! - Saves replace the whole snapshot; partial snapshots are never visible.
//! - Loaded snapshots pass `AssignmentState::validate()`.

pub mod snapshot_repo;
