//! Board use-case service.
//!
//! # Responsibility
//! - Load a board from the last snapshot or a fresh catalog split.
//! - Route move/undo/toggle commands to the session store.
//! - Save snapshots and clear undo history on acknowledged success.
//!
//! # Invariants
//! - History always starts empty after load.
//! - A failed save leaves state and history untouched.

use crate::config::BoardConfig;
use crate::engine::history::{UndoHistory, UndoStep};
use crate::engine::transition::{InvalidMove, MoveCommand};
use crate::model::group::GroupId;
use crate::model::item::Catalog;
use crate::model::state::AssignmentState;
use crate::repo::snapshot_repo::{SnapshotRepoError, SnapshotRepository};
use crate::store::assignment_store::{AssignmentStore, UndoOutcome};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Errors from board service operations.
#[derive(Debug)]
pub enum BoardServiceError {
    /// Move command rejected by the engine.
    InvalidMove(InvalidMove),
    /// Snapshot could not be read or failed validation.
    LoadFailed(SnapshotRepoError),
    /// Snapshot write failed; the same save may be retried.
    PersistenceFailure(SnapshotRepoError),
}

impl Display for BoardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMove(err) => write!(f, "{err}"),
            Self::LoadFailed(err) => write!(f, "board load failed: {err}"),
            Self::PersistenceFailure(err) => write!(f, "board save failed: {err}"),
        }
    }
}

impl Error for BoardServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidMove(err) => Some(err),
            Self::LoadFailed(err) => Some(err),
            Self::PersistenceFailure(err) => Some(err),
        }
    }
}

impl From<InvalidMove> for BoardServiceError {
    fn from(value: InvalidMove) -> Self {
        Self::InvalidMove(value)
    }
}

/// Where the initial board came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Last saved snapshot.
    Snapshot,
    /// Fresh split of the catalog.
    Catalog,
}

impl LoadSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Catalog => "catalog",
        }
    }
}

/// Board session facade over a snapshot repository.
pub struct BoardService<R: SnapshotRepository> {
    repo: R,
    store: AssignmentStore,
    source: LoadSource,
}

impl<R: SnapshotRepository> BoardService<R> {
    /// Loads a board, seeding from a placeholder catalog of
    /// `config.catalog_size` items when nothing was saved.
    pub fn load(repo: R, config: BoardConfig) -> Result<Self, BoardServiceError> {
        let config = config.normalized();
        Self::load_with_catalog(repo, &Catalog::placeholder(config.catalog_size), config)
    }

    /// Loads a board, seeding from `catalog` when nothing was saved.
    ///
    /// # Errors
    /// - `LoadFailed` when the stored snapshot is unreadable or invalid.
    pub fn load_with_catalog(
        repo: R,
        catalog: &Catalog,
        config: BoardConfig,
    ) -> Result<Self, BoardServiceError> {
        let config = config.normalized();
        let snapshot = repo
            .load_snapshot()
            .and_then(|snapshot| match snapshot {
                Some(state) => state.validate().map(|()| Some(state)).map_err(Into::into),
                None => Ok(None),
            })
            .map_err(|err| {
                error!("event=board_load module=service status=error error={err}");
                BoardServiceError::LoadFailed(err)
            })?;

        let (state, source) = match snapshot {
            Some(state) => (state, LoadSource::Snapshot),
            None => (AssignmentState::from_catalog(catalog), LoadSource::Catalog),
        };
        info!(
            "event=board_load module=service status=ok source={} groups={} pool={}",
            source.as_str(),
            state.groups.len(),
            state.pool.len()
        );

        Ok(Self {
            repo,
            store: AssignmentStore::new(state, config.history_limit),
            source,
        })
    }

    /// Resumes a session from an existing store.
    pub fn from_parts(repo: R, store: AssignmentStore, source: LoadSource) -> Self {
        Self {
            repo,
            store,
            source,
        }
    }

    /// Releases the session store, e.g. to keep it across repository
    /// connections.
    pub fn into_store(self) -> AssignmentStore {
        self.store
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    pub fn store(&self) -> &AssignmentStore {
        &self.store
    }

    pub fn current_state(&self) -> &AssignmentState {
        self.store.current_state()
    }

    pub fn history(&self) -> &UndoHistory {
        self.store.history()
    }

    /// Moves one pool item into a group.
    pub fn move_item(&mut self, command: &MoveCommand) -> Result<UndoStep, BoardServiceError> {
        self.store.move_item(command).map_err(Into::into)
    }

    /// Reverts the most recent move; never fails.
    pub fn undo(&mut self) -> UndoOutcome {
        self.store.undo()
    }

    /// Flips one group's expanded flag.
    pub fn toggle_expanded(&mut self, group_uuid: GroupId) -> bool {
        self.store.toggle_expanded(group_uuid)
    }

    /// Persists the current board and clears undo history on success.
    ///
    /// # Errors
    /// - `PersistenceFailure` when the repository rejects the write. State
    ///   and history are unchanged so the caller may retry.
    pub fn save(&mut self) -> Result<(), BoardServiceError> {
        let started_at = Instant::now();
        match self.repo.save_snapshot(self.store.current_state()) {
            Ok(()) => {
                let cleared = self.store.history().len();
                self.store.clear_history();
                info!(
                    "event=board_save module=service status=ok duration_ms={} cleared_steps={}",
                    started_at.elapsed().as_millis(),
                    cleared
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=board_save module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(BoardServiceError::PersistenceFailure(err))
            }
        }
    }
}
