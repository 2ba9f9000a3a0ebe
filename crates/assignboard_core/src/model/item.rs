//! Item records and the closed item catalog.
//!
//! # Responsibility
//! - Define the immutable `Item` record shared by pool and groups.
//! - Provide the catalog used to seed a fresh board.
//!
//! # Invariants
//! - Item ids are unique inside one catalog.
//! - Items are never created or destroyed by board transitions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Stable numeric identifier of one catalog item.
pub type ItemId = i64;

/// Immutable catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub description: String,
}

impl Item {
    pub fn new(id: ItemId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }
}

/// Ordered, read-only item universe a board is split from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Builds a catalog from caller-provided records.
    ///
    /// Later duplicates of an already seen id are dropped so the catalog
    /// stays a set keyed by `Item::id`.
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| seen.insert(item.id))
            .collect();
        Self { items }
    }

    /// Generates `Item 1..=count` placeholder records.
    pub fn placeholder(count: usize) -> Self {
        let items = (1..=count as ItemId)
            .map(|id| Item::new(id, format!("Item {id}")))
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index where the header half ends and the pool half begins.
    ///
    /// The header half is rounded up so any non-empty catalog yields at
    /// least one group.
    pub fn split_point(&self) -> usize {
        self.items.len().div_ceil(2)
    }
}
