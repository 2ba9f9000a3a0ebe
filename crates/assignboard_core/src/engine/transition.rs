//! Move and undo transitions.
//!
//! # Responsibility
//! - Move one pool item into a group chosen by drop position.
//! - Reverse the top undo step by group identity.
//!
//! # Invariants
//! - Only pool-to-group moves are accepted.
//! - Moved records are appended to the target group, never inserted.
//! - Undo never fails: stale steps are consumed without changing state.

use super::history::{UndoHistory, UndoStep};
use crate::model::group::GroupId;
use crate::model::item::ItemId;
use crate::model::state::AssignmentState;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Container an item is dragged out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    /// Position inside the unassigned pool.
    Pool { index: usize },
    /// Position inside one group's children.
    Group { group_uuid: GroupId, index: usize },
}

/// Resolved drag/drop event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCommand {
    pub item_id: ItemId,
    pub source: MoveSource,
    /// Drop slot among groups; values past the end target the last group.
    pub dest_index: usize,
}

impl MoveCommand {
    /// Builds a pool-to-group move.
    pub fn from_pool(item_id: ItemId, pool_index: usize, dest_index: usize) -> Self {
        Self {
            item_id,
            source: MoveSource::Pool { index: pool_index },
            dest_index,
        }
    }
}

/// Rejected move. The input state is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMove {
    /// Moves out of a group are not supported.
    SourceNotPool(GroupId),
    /// Pool slot is empty or holds a different item.
    ItemNotAtPosition { item_id: ItemId, index: usize },
    /// Board has no group to drop into.
    NoTargetGroup,
}

impl Display for InvalidMove {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceNotPool(group_uuid) => {
                write!(f, "invalid move: source group {group_uuid} is not the pool")
            }
            Self::ItemNotAtPosition { item_id, index } => {
                write!(f, "invalid move: item {item_id} is not at pool index {index}")
            }
            Self::NoTargetGroup => write!(f, "invalid move: board has no groups"),
        }
    }
}

impl Error for InvalidMove {}

/// Moves one pool item to the end of the group at `dest_index`.
///
/// # Errors
/// - `SourceNotPool` when the command drags out of a group.
/// - `ItemNotAtPosition` when `pool[index]` is missing or holds another id.
/// - `NoTargetGroup` when the board has no groups.
pub fn move_item(
    state: &AssignmentState,
    command: &MoveCommand,
) -> Result<(AssignmentState, UndoStep), InvalidMove> {
    let index = match command.source {
        MoveSource::Pool { index } => index,
        MoveSource::Group { group_uuid, .. } => return Err(InvalidMove::SourceNotPool(group_uuid)),
    };

    match state.pool.get(index) {
        Some(item) if item.id == command.item_id => {}
        _ => {
            return Err(InvalidMove::ItemNotAtPosition {
                item_id: command.item_id,
                index,
            })
        }
    }

    let target_index = resolve_target_group(state.groups.len(), command.dest_index)?;

    let mut next = state.clone();
    let item = next.pool.remove(index);
    let target = &mut next.groups[target_index];
    target.children.push(item);

    let step = UndoStep {
        group_uuid: target.uuid,
        item_id: command.item_id,
    };
    Ok((next, step))
}

/// Reverses the top step of `history`.
///
/// Returns the inputs unchanged when `history` is empty. A step whose group
/// or item can no longer be found is consumed without touching the state.
/// A restored item goes back into the pool, which is then sorted by id.
pub fn undo(state: &AssignmentState, history: &UndoHistory) -> (AssignmentState, UndoHistory) {
    let mut next_history = history.clone();
    let Some(step) = next_history.pop() else {
        return (state.clone(), next_history);
    };

    let next = revert(state, &step).unwrap_or_else(|| state.clone());
    (next, next_history)
}

/// Returns `state` with `step` reverted, or `None` when the step is stale.
///
/// A stale step names a group that no longer exists or an item that is no
/// longer among that group's children.
pub fn revert(state: &AssignmentState, step: &UndoStep) -> Option<AssignmentState> {
    let reverted = revert_step(state, step);
    if reverted.is_none() {
        debug!(
            "event=undo module=engine status=stale group_uuid={} item_id={}",
            step.group_uuid, step.item_id
        );
    }
    reverted
}

fn resolve_target_group(group_count: usize, dest_index: usize) -> Result<usize, InvalidMove> {
    if group_count == 0 {
        return Err(InvalidMove::NoTargetGroup);
    }
    Ok(dest_index.min(group_count - 1))
}

fn revert_step(state: &AssignmentState, step: &UndoStep) -> Option<AssignmentState> {
    let mut next = state.clone();
    let group = next.group_mut(step.group_uuid)?;
    let position = group
        .children
        .iter()
        .position(|child| child.id == step.item_id)?;
    let item = group.children.remove(position);

    next.pool.push(item);
    next.pool.sort_by_key(|item| item.id);
    Some(next)
}
