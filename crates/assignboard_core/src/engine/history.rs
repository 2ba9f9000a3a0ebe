//! Bounded LIFO undo history.
//!
//! # Invariants
//! - Steps are only pushed on top or popped from the top.
//! - Length never exceeds `limit`; the oldest step is dropped first.

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::model::group::GroupId;
use crate::model::item::ItemId;
use serde::{Deserialize, Serialize};

/// Record that `item_id` was appended to the group `group_uuid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoStep {
    pub group_uuid: GroupId,
    pub item_id: ItemId,
}

/// Undo stack for one board session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoHistory {
    steps: Vec<UndoStep>,
    limit: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl UndoHistory {
    /// Creates an empty history holding at most `limit` steps.
    ///
    /// A zero limit falls back to [`DEFAULT_HISTORY_LIMIT`].
    pub fn with_limit(limit: usize) -> Self {
        let limit = if limit == 0 {
            DEFAULT_HISTORY_LIMIT
        } else {
            limit
        };
        Self {
            steps: Vec::new(),
            limit,
        }
    }

    pub fn push(&mut self, step: UndoStep) {
        self.steps.push(step);
        if self.steps.len() > self.limit {
            let overflow = self.steps.len() - self.limit;
            self.steps.drain(0..overflow);
        }
    }

    pub fn pop(&mut self) -> Option<UndoStep> {
        self.steps.pop()
    }

    pub fn peek(&self) -> Option<&UndoStep> {
        self.steps.last()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Steps from oldest to newest.
    pub fn steps(&self) -> &[UndoStep] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::{UndoHistory, UndoStep};
    use crate::config::DEFAULT_HISTORY_LIMIT;
    use uuid::Uuid;

    fn step(item_id: i64) -> UndoStep {
        UndoStep {
            group_uuid: Uuid::nil(),
            item_id,
        }
    }

    #[test]
    fn pop_returns_most_recent_step() {
        let mut history = UndoHistory::default();
        history.push(step(1));
        history.push(step(2));

        assert_eq!(history.pop(), Some(step(2)));
        assert_eq!(history.pop(), Some(step(1)));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn push_past_limit_drops_oldest() {
        let mut history = UndoHistory::with_limit(2);
        history.push(step(1));
        history.push(step(2));
        history.push(step(3));

        assert_eq!(history.steps(), &[step(2), step(3)]);
    }

    #[test]
    fn zero_limit_uses_default() {
        assert_eq!(UndoHistory::with_limit(0).limit(), DEFAULT_HISTORY_LIMIT);
    }
}
