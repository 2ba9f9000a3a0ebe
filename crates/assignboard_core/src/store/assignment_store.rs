//! Assignment store: current board plus undo history.
//!
//! # Invariants
//! - `state` only changes through engine transitions or `toggle_expanded`.
//! - A successful move pushes exactly one undo step.
//! - Every undo call with a non-empty history pops exactly one step.

use crate::engine::history::{UndoHistory, UndoStep};
use crate::engine::transition::{self, InvalidMove, MoveCommand};
use crate::model::group::GroupId;
use crate::model::state::AssignmentState;
use log::{debug, info, warn};

/// Result of one undo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    /// History was empty; nothing happened.
    Empty,
    /// The step was reverted and its item returned to the pool.
    Reverted(UndoStep),
    /// The step no longer matched the board and was discarded.
    Stale(UndoStep),
}

/// Owner of one board session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentStore {
    state: AssignmentState,
    history: UndoHistory,
}

impl AssignmentStore {
    /// Wraps `state` with an empty history bounded by `history_limit`.
    pub fn new(state: AssignmentState, history_limit: usize) -> Self {
        Self {
            state,
            history: UndoHistory::with_limit(history_limit),
        }
    }

    pub fn current_state(&self) -> &AssignmentState {
        &self.state
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    /// Applies one move and records its undo step.
    ///
    /// # Errors
    /// Returns the engine's `InvalidMove` unchanged; state and history are
    /// untouched in that case.
    pub fn move_item(&mut self, command: &MoveCommand) -> Result<UndoStep, InvalidMove> {
        match transition::move_item(&self.state, command) {
            Ok((next, step)) => {
                self.state = next;
                self.history.push(step);
                info!(
                    "event=item_move module=store status=ok item_id={} group_uuid={} history_len={}",
                    step.item_id,
                    step.group_uuid,
                    self.history.len()
                );
                Ok(step)
            }
            Err(err) => {
                warn!(
                    "event=item_move module=store status=rejected item_id={} error={}",
                    command.item_id, err
                );
                Err(err)
            }
        }
    }

    /// Reverts the most recent move, if any.
    ///
    /// A stale step is still popped; the state stays as it was.
    pub fn undo(&mut self) -> UndoOutcome {
        let Some(step) = self.history.pop() else {
            debug!("event=undo module=store status=empty");
            return UndoOutcome::Empty;
        };

        match transition::revert(&self.state, &step) {
            Some(next) => {
                self.state = next;
                info!(
                    "event=undo module=store status=ok item_id={} group_uuid={} history_len={}",
                    step.item_id,
                    step.group_uuid,
                    self.history.len()
                );
                UndoOutcome::Reverted(step)
            }
            None => UndoOutcome::Stale(step),
        }
    }

    /// Flips the display-only expanded flag of one group.
    ///
    /// Returns `false` when no group has `group_uuid`.
    pub fn toggle_expanded(&mut self, group_uuid: GroupId) -> bool {
        match self.state.group_mut(group_uuid) {
            Some(group) => {
                group.is_expanded = !group.is_expanded;
                true
            }
            None => false,
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{AssignmentStore, UndoOutcome};
    use crate::engine::transition::{InvalidMove, MoveCommand};
    use crate::model::item::Catalog;
    use crate::model::state::AssignmentState;
    use uuid::Uuid;

    fn store() -> AssignmentStore {
        AssignmentStore::new(AssignmentState::from_catalog(&Catalog::placeholder(6)), 10)
    }

    #[test]
    fn move_and_undo_update_history() {
        let mut store = store();
        let step = store.move_item(&MoveCommand::from_pool(4, 0, 0)).unwrap();
        assert_eq!(store.history().len(), 1);

        assert_eq!(store.undo(), UndoOutcome::Reverted(step));
        assert!(store.history().is_empty());
        assert_eq!(store.undo(), UndoOutcome::Empty);
    }

    #[test]
    fn rejected_move_keeps_store_unchanged() {
        let mut store = store();
        let before = store.clone();

        let err = store.move_item(&MoveCommand::from_pool(999, 0, 0)).unwrap_err();
        assert_eq!(
            err,
            InvalidMove::ItemNotAtPosition {
                item_id: 999,
                index: 0
            }
        );
        assert_eq!(store, before);
    }

    #[test]
    fn toggle_expanded_flips_flag_without_touching_history() {
        let mut store = store();
        let group_uuid = store.current_state().groups[1].uuid;

        assert!(store.toggle_expanded(group_uuid));
        assert!(store.current_state().groups[1].is_expanded);
        assert!(store.toggle_expanded(group_uuid));
        assert!(!store.current_state().groups[1].is_expanded);
        assert!(store.history().is_empty());

        assert!(!store.toggle_expanded(Uuid::new_v4()));
    }

    #[test]
    fn undo_of_missing_child_reports_stale_and_pops_step() {
        let mut store = store();
        let first = store.move_item(&MoveCommand::from_pool(4, 0, 0)).unwrap();
        let second = store.move_item(&MoveCommand::from_pool(5, 0, 1)).unwrap();
        store
            .state
            .group_mut(second.group_uuid)
            .unwrap()
            .children
            .clear();
        let before = store.current_state().clone();

        assert_eq!(store.undo(), UndoOutcome::Stale(second));
        assert_eq!(store.current_state(), &before);
        assert_eq!(store.history().len(), 1);

        assert_eq!(store.undo(), UndoOutcome::Reverted(first));
        assert_eq!(store.current_state().pool_ids(), vec![4, 6]);
    }
}
