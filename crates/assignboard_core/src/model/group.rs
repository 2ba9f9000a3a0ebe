//! Group container model.
//!
//! # Invariants
//! - `uuid` is assigned once and never rewritten.
//! - `children` order is move order; transitions only append or remove.
//! - `is_expanded` is display state with no invariant obligations.

use super::item::{Item, ItemId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable group identifier, independent of display position.
pub type GroupId = Uuid;

/// Ordered container of assigned items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub uuid: GroupId,
    /// Catalog record shown as the group row.
    pub header: Item,
    /// Assigned item records in move order.
    #[serde(default)]
    pub children: Vec<Item>,
    #[serde(default)]
    pub is_expanded: bool,
}

impl Group {
    /// Creates an empty, collapsed group with a generated stable id.
    pub fn new(header: Item) -> Self {
        Self::with_id(Uuid::new_v4(), header)
    }

    /// Creates an empty, collapsed group with a caller-provided id.
    ///
    /// Used by snapshot loading where identity already exists.
    pub fn with_id(uuid: GroupId, header: Item) -> Self {
        Self {
            uuid,
            header,
            children: Vec::new(),
            is_expanded: false,
        }
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.children.iter().any(|child| child.id == item_id)
    }

    pub fn child_ids(&self) -> Vec<ItemId> {
        self.children.iter().map(|child| child.id).collect()
    }
}
