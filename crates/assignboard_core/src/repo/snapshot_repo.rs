//! Board snapshot repository.
//!
//! # Responsibility
//! - Persist the full `AssignmentState` (items, groups, placements).
//! - Rebuild pool order, group order and child order on load.
//!
//! # Invariants
//! - A snapshot exists iff `snapshot_meta` holds its single row.
//! - Write paths validate the state before any SQL mutation.

use crate::db::migrations::{schema_version, SCHEMA_VERSION};
use crate::db::DbError;
use crate::model::group::Group;
use crate::model::item::{Item, ItemId};
use crate::model::state::{AssignmentState, StateValidationError};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type SnapshotRepoResult<T> = Result<T, SnapshotRepoError>;

/// Errors from snapshot persistence.
#[derive(Debug)]
pub enum SnapshotRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// State violates the partition invariant.
    Validation(StateValidationError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted rows cannot be turned into a board.
    InvalidData(String),
}

impl Display for SnapshotRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "snapshot repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid snapshot data: {message}"),
        }
    }
}

impl Error for SnapshotRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for SnapshotRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SnapshotRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<StateValidationError> for SnapshotRepoError {
    fn from(value: StateValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Persistence gateway for whole-board snapshots.
pub trait SnapshotRepository {
    /// Loads the last saved board, or `None` when nothing was saved yet.
    fn load_snapshot(&self) -> SnapshotRepoResult<Option<AssignmentState>>;
    /// Replaces the stored board with `state`.
    fn save_snapshot(&self, state: &AssignmentState) -> SnapshotRepoResult<()>;
}

impl<R: SnapshotRepository + ?Sized> SnapshotRepository for &R {
    fn load_snapshot(&self) -> SnapshotRepoResult<Option<AssignmentState>> {
        (**self).load_snapshot()
    }

    fn save_snapshot(&self, state: &AssignmentState) -> SnapshotRepoResult<()> {
        (**self).save_snapshot(state)
    }
}

/// SQLite-backed snapshot repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Creates repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> SnapshotRepoResult<Self> {
        let actual_version = schema_version(conn)?;
        if actual_version != SCHEMA_VERSION {
            return Err(SnapshotRepoError::UninitializedConnection {
                expected_version: SCHEMA_VERSION,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    /// Epoch ms of the last successful save.
    pub fn last_saved_at(&self) -> SnapshotRepoResult<Option<i64>> {
        let saved_at = self
            .conn
            .query_row("SELECT saved_at FROM snapshot_meta WHERE id = 1;", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(saved_at)
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn load_snapshot(&self) -> SnapshotRepoResult<Option<AssignmentState>> {
        if self.last_saved_at()?.is_none() {
            return Ok(None);
        }

        let descriptions = load_descriptions(self.conn)?;
        let lookup = |item_id: ItemId| -> SnapshotRepoResult<Item> {
            descriptions
                .get(&item_id)
                .map(|description| Item::new(item_id, description.clone()))
                .ok_or_else(|| {
                    SnapshotRepoError::InvalidData(format!("unknown item id `{item_id}`"))
                })
        };

        let mut groups = Vec::new();
        {
            let mut stmt = self.conn.prepare(
                "SELECT group_uuid, header_item_id, is_expanded
                 FROM board_groups
                 ORDER BY sort_order ASC, group_uuid ASC;",
            )?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let uuid_text: String = row.get(0)?;
                let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
                    SnapshotRepoError::InvalidData(format!(
                        "invalid uuid value `{uuid_text}` in board_groups.group_uuid"
                    ))
                })?;
                let mut group = Group::with_id(uuid, lookup(row.get(1)?)?);
                group.is_expanded = parse_bool(row.get(2)?, "board_groups.is_expanded")?;
                groups.push(group);
            }
        }

        for group in &mut groups {
            group.children = load_placement_ids(self.conn, Some(group.uuid))?
                .into_iter()
                .map(lookup)
                .collect::<SnapshotRepoResult<Vec<_>>>()?;
        }
        let pool = load_placement_ids(self.conn, None)?
            .into_iter()
            .map(lookup)
            .collect::<SnapshotRepoResult<Vec<_>>>()?;

        let state = AssignmentState::new(pool, groups);
        state.validate()?;
        Ok(Some(state))
    }

    fn save_snapshot(&self, state: &AssignmentState) -> SnapshotRepoResult<()> {
        state.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute_batch(
            "DELETE FROM placements;
             DELETE FROM board_groups;
             DELETE FROM items;",
        )?;

        for group in &state.groups {
            insert_item(&tx, &group.header)?;
        }
        for item in state
            .pool
            .iter()
            .chain(state.groups.iter().flat_map(|group| group.children.iter()))
        {
            insert_item(&tx, item)?;
        }

        for (sort_order, group) in state.groups.iter().enumerate() {
            tx.execute(
                "INSERT INTO board_groups (group_uuid, header_item_id, sort_order, is_expanded)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    group.uuid.to_string(),
                    group.header.id,
                    sort_order as i64,
                    bool_to_int(group.is_expanded),
                ],
            )?;
            for (position, child) in group.children.iter().enumerate() {
                insert_placement(&tx, child.id, Some(group.uuid.to_string()), position)?;
            }
        }
        for (position, item) in state.pool.iter().enumerate() {
            insert_placement(&tx, item.id, None, position)?;
        }

        tx.execute(
            "INSERT INTO snapshot_meta (id, saved_at)
             VALUES (1, strftime('%s', 'now') * 1000)
             ON CONFLICT(id) DO UPDATE SET saved_at = excluded.saved_at;",
            [],
        )?;
        tx.commit()?;
        Ok(())
    }
}

fn load_descriptions(conn: &Connection) -> SnapshotRepoResult<HashMap<ItemId, String>> {
    let mut stmt = conn.prepare("SELECT item_id, description FROM items;")?;
    let mut rows = stmt.query([])?;
    let mut descriptions = HashMap::new();
    while let Some(row) = rows.next()? {
        descriptions.insert(row.get(0)?, row.get(1)?);
    }
    Ok(descriptions)
}

fn load_placement_ids(
    conn: &Connection,
    group_uuid: Option<Uuid>,
) -> SnapshotRepoResult<Vec<ItemId>> {
    let mut stmt = conn.prepare(
        "SELECT item_id
         FROM placements
         WHERE group_uuid IS ?1
         ORDER BY position ASC, item_id ASC;",
    )?;
    let mut rows = stmt.query([group_uuid.map(|value| value.to_string())])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        ids.push(row.get(0)?);
    }
    Ok(ids)
}

fn insert_item(tx: &Transaction<'_>, item: &Item) -> SnapshotRepoResult<()> {
    tx.execute(
        "INSERT INTO items (item_id, description) VALUES (?1, ?2);",
        params![item.id, item.description.as_str()],
    )?;
    Ok(())
}

fn insert_placement(
    tx: &Transaction<'_>,
    item_id: ItemId,
    group_uuid: Option<String>,
    position: usize,
) -> SnapshotRepoResult<()> {
    tx.execute(
        "INSERT INTO placements (item_id, group_uuid, position) VALUES (?1, ?2, ?3);",
        params![item_id, group_uuid, position as i64],
    )?;
    Ok(())
}

fn parse_bool(value: i64, column: &str) -> SnapshotRepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(SnapshotRepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
