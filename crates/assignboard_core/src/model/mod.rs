//! Board domain model: items, groups and the assignment partition.
//!
//! # Responsibility
//! - Define the records the engine relocates and the containers it moves
//!   them between.
//! - Provide local validation for the partition invariant.
//!
//! # Invariants
//! - Every movable item lives in exactly one place: the pool or one group.
//! - Group identity (`GroupId`) is stable for the lifetime of a board.

pub mod group;
pub mod item;
pub mod state;
