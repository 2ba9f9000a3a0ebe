//! Session-owned board state.
//!
//! # Responsibility
//! - Own the authoritative `AssignmentState` and its undo history.
//! - Apply engine transitions by whole-value replacement.
//!
//! # See also
//! - `crate::engine::transition` for the transition rules.

pub mod assignment_store;
