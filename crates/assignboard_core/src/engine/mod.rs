//! Assignment engine: pure board transitions and their undo bookkeeping.
//!
//! # Responsibility
//! - Validate and apply pool-to-group moves.
//! - Reverse the most recent move using identity-keyed undo steps.
//!
//! # Invariants
//! - Transitions never mutate the caller's state; they return a new value.
//! - The partition invariant holds before and after every transition.
//! - Groups are never created, removed or reordered by transitions.

pub mod history;
pub mod transition;
