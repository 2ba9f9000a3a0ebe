//! Core assignment engine for Assignboard.
//! This crate is the single source of truth for board invariants.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{BoardConfig, DEFAULT_CATALOG_SIZE, DEFAULT_HISTORY_LIMIT};
pub use engine::history::{UndoHistory, UndoStep};
pub use engine::transition::{move_item, undo, InvalidMove, MoveCommand, MoveSource};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::group::{Group, GroupId};
pub use model::item::{Catalog, Item, ItemId};
pub use model::state::{AssignmentState, StateValidationError};
pub use repo::snapshot_repo::{
    SnapshotRepoError, SnapshotRepoResult, SnapshotRepository, SqliteSnapshotRepository,
};
pub use service::board_service::{BoardService, BoardServiceError, LoadSource};
pub use store::assignment_store::{AssignmentStore, UndoOutcome};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
