//! Assignment partition state.
//!
//! # Responsibility
//! - Hold the ordered pool and the ordered group list as one value.
//! - Validate the partition invariant for states entering the core from
//!   outside (snapshots, host-provided boards).
//!
//! # Invariants
//! - An item id appears at most once across `pool` and all `children`.
//! - Group uuids are unique; a group header is never also a movable item.
//!
//! # See also
//! - `crate::engine` for the transitions that preserve these invariants.

use super::group::{Group, GroupId};
use super::item::{Catalog, Item, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Partition invariant violations found by [`AssignmentState::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValidationError {
    /// The same item id occurs twice across pool and group children.
    DuplicateItem(ItemId),
    /// Two groups share one uuid.
    DuplicateGroup(GroupId),
    /// Two groups share one header item.
    DuplicateHeader(ItemId),
    /// A group header id also appears as a movable item.
    HeaderReused { group_uuid: GroupId, item_id: ItemId },
}

impl Display for StateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateItem(id) => write!(f, "item {id} appears more than once"),
            Self::DuplicateGroup(id) => write!(f, "group {id} appears more than once"),
            Self::DuplicateHeader(id) => write!(f, "header item {id} heads more than one group"),
            Self::HeaderReused {
                group_uuid,
                item_id,
            } => write!(
                f,
                "group {group_uuid} header item {item_id} is also a movable item"
            ),
        }
    }
}

impl Error for StateValidationError {}

/// Current split of movable items between the pool and groups.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssignmentState {
    /// Unassigned items in display order.
    #[serde(default)]
    pub pool: Vec<Item>,
    /// Groups in display order.
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl AssignmentState {
    pub fn new(pool: Vec<Item>, groups: Vec<Group>) -> Self {
        Self { pool, groups }
    }

    /// Splits a catalog into a fresh board.
    ///
    /// The first half (rounded up) becomes empty group headers, the rest
    /// becomes the pool. Catalog order is preserved on both sides.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let (headers, pool) = catalog.items().split_at(catalog.split_point());
        Self {
            pool: pool.to_vec(),
            groups: headers.iter().cloned().map(Group::new).collect(),
        }
    }

    pub fn group(&self, group_uuid: GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| group.uuid == group_uuid)
    }

    pub fn group_mut(&mut self, group_uuid: GroupId) -> Option<&mut Group> {
        self.groups.iter_mut().find(|group| group.uuid == group_uuid)
    }

    pub fn pool_ids(&self) -> Vec<ItemId> {
        self.pool.iter().map(|item| item.id).collect()
    }

    /// Assigned item ids in group display order, then move order.
    pub fn assigned_ids(&self) -> Vec<ItemId> {
        self.groups
            .iter()
            .flat_map(|group| group.children.iter().map(|child| child.id))
            .collect()
    }

    /// All movable item ids, sorted ascending.
    ///
    /// Two states over the same universe return equal vectors; this is the
    /// multiset check used for the partition invariant.
    pub fn item_ids(&self) -> Vec<ItemId> {
        let mut ids = self.pool_ids();
        ids.extend(self.assigned_ids());
        ids.sort_unstable();
        ids
    }

    /// Checks the partition invariant on this state alone.
    ///
    /// # Errors
    /// - `DuplicateGroup` when two groups share a uuid.
    /// - `DuplicateHeader` when two groups share a header id.
    /// - `DuplicateItem` when one item id is placed twice.
    /// - `HeaderReused` when a header id is also a pool/child item.
    pub fn validate(&self) -> Result<(), StateValidationError> {
        let mut group_ids = HashSet::new();
        let mut header_ids = HashSet::new();
        for group in &self.groups {
            if !group_ids.insert(group.uuid) {
                return Err(StateValidationError::DuplicateGroup(group.uuid));
            }
            if !header_ids.insert(group.header.id) {
                return Err(StateValidationError::DuplicateHeader(group.header.id));
            }
        }

        let mut item_ids = HashSet::new();
        let placed = self
            .pool
            .iter()
            .chain(self.groups.iter().flat_map(|group| group.children.iter()));
        for item in placed {
            if !item_ids.insert(item.id) {
                return Err(StateValidationError::DuplicateItem(item.id));
            }
        }

        for group in &self.groups {
            if item_ids.contains(&group.header.id) {
                return Err(StateValidationError::HeaderReused {
                    group_uuid: group.uuid,
                    item_id: group.header.id,
                });
            }
        }

        Ok(())
    }
}
