//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose one process-wide board session to Dart via FRB.
//! - Translate core results into flat, UI-ready envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Board commands are serialized through one session lock.
//! - The session's undo history lives in memory only; saves persist the
//!   board, never the history.

use assignboard_core::db::open_db;
use assignboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AssignmentState, AssignmentStore, BoardConfig, BoardService, LoadSource, MoveCommand,
    SqliteSnapshotRepository, UndoOutcome,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use uuid::Uuid;

const BOARD_DB_FILE_NAME: &str = "assignboard_board.sqlite3";
static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Mutex<Option<Session>> = Mutex::new(None);

struct Session {
    store: AssignmentStore,
    source: LoadSource,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the snapshot database path for this process.
///
/// Must run before the first board call to take effect; afterwards the
/// path is fixed and a different value is rejected.
///
/// # FFI contract
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn board_configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = BOARD_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "board db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One catalog item as shown in the pool or a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardItemView {
    pub id: i64,
    pub description: String,
}

/// One group row with its assigned items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardGroupView {
    /// Stable group id in string form.
    pub group_uuid: String,
    pub header: BoardItemView,
    /// Assigned items in move order.
    pub children: Vec<BoardItemView>,
    pub is_expanded: bool,
}

/// Whole-board projection returned after every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub groups: Vec<BoardGroupView>,
    pub pool: Vec<BoardItemView>,
    /// Number of moves that can currently be undone.
    pub undo_depth: u32,
}

/// Response envelope for board commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardResponse {
    /// Whether the command succeeded.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// Board after the command; `None` only when no session exists.
    pub board: Option<BoardView>,
}

/// Loads the board session from the snapshot database.
///
/// Falls back to a placeholder catalog of `catalog_size` items (default 4)
/// when nothing was saved. Replaces any existing session and its history.
#[flutter_rust_bridge::frb(sync)]
pub fn board_load(catalog_size: Option<u32>) -> BoardResponse {
    let config = BoardConfig {
        catalog_size: catalog_size
            .map(|value| value as usize)
            .unwrap_or(BoardConfig::default().catalog_size),
        ..BoardConfig::default()
    };

    let db_path = resolve_board_db_path();
    let loaded = open_db(&db_path)
        .map_err(|err| format!("board DB open failed: {err}"))
        .and_then(|conn| {
            let repo = SqliteSnapshotRepository::try_new(&conn)
                .map_err(|err| format!("board repo init failed: {err}"))?;
            let service = BoardService::load(repo, config).map_err(|err| err.to_string())?;
            let source = service.source();
            Ok(Session {
                store: service.into_store(),
                source,
            })
        });

    let mut session = lock_session();
    match loaded {
        Ok(loaded) => {
            let message = match loaded.source {
                LoadSource::Snapshot => "Board restored from last save.",
                LoadSource::Catalog => "Board created from catalog.",
            };
            *session = Some(loaded);
            respond(true, message, session.as_ref())
        }
        Err(err) => respond(false, format!("board_load failed: {err}"), session.as_ref()),
    }
}

/// Moves the pool item at `pool_index` into the group at `dest_index`.
///
/// `dest_index` past the last group targets the last group.
#[flutter_rust_bridge::frb(sync)]
pub fn board_move(item_id: i64, pool_index: u32, dest_index: u32) -> BoardResponse {
    with_session(|session| {
        let command = MoveCommand::from_pool(item_id, pool_index as usize, dest_index as usize);
        session
            .store
            .move_item(&command)
            .map(|_| "Item assigned.".to_string())
            .map_err(|err| format!("board_move failed: {err}"))
    })
}

/// Reverts the most recent move. Never fails when a session exists.
#[flutter_rust_bridge::frb(sync)]
pub fn board_undo() -> BoardResponse {
    with_session(|session| {
        let message = match session.store.undo() {
            UndoOutcome::Empty => "Nothing to undo.",
            UndoOutcome::Reverted(_) => "Move undone.",
            UndoOutcome::Stale(_) => "Last move no longer applies; skipped.",
        };
        Ok(message.to_string())
    })
}

/// Flips the expanded flag of the group with `group_uuid`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_toggle_expanded(group_uuid: String) -> BoardResponse {
    with_session(|session| {
        let uuid = Uuid::parse_str(group_uuid.trim())
            .map_err(|_| format!("board_toggle_expanded failed: invalid group id `{group_uuid}`"))?;
        if session.store.toggle_expanded(uuid) {
            Ok("Group toggled.".to_string())
        } else {
            Err(format!("board_toggle_expanded failed: group not found: {uuid}"))
        }
    })
}

/// Saves the current board and clears undo history on success.
///
/// On failure the board and history are kept so the call can be retried.
#[flutter_rust_bridge::frb(sync)]
pub fn board_save() -> BoardResponse {
    with_session(|session| {
        let db_path = resolve_board_db_path();
        let conn = open_db(&db_path).map_err(|err| format!("board DB open failed: {err}"))?;
        let repo = SqliteSnapshotRepository::try_new(&conn)
            .map_err(|err| format!("board repo init failed: {err}"))?;

        let placeholder = AssignmentStore::new(AssignmentState::default(), 1);
        let store = std::mem::replace(&mut session.store, placeholder);
        let mut service = BoardService::from_parts(repo, store, session.source);
        let result = service.save();
        session.store = service.into_store();

        result
            .map(|()| "Save successful!".to_string())
            .map_err(|err| err.to_string())
    })
}

/// Serializes the current board as JSON.
///
/// Returns an empty string when no session is loaded.
#[flutter_rust_bridge::frb(sync)]
pub fn board_snapshot_json() -> String {
    let session = lock_session();
    let Some(session) = session.as_ref() else {
        return String::new();
    };
    serde_json::to_string(session.store.current_state()).unwrap_or_else(|err| {
        warn!("event=board_snapshot module=ffi status=error error={err}");
        String::new()
    })
}

fn with_session(f: impl FnOnce(&mut Session) -> Result<String, String>) -> BoardResponse {
    let mut guard = lock_session();
    let Some(session) = guard.as_mut() else {
        return respond(false, "no board loaded; call board_load first", None);
    };
    match f(session) {
        Ok(message) => respond(true, message, guard.as_ref()),
        Err(message) => respond(false, message, guard.as_ref()),
    }
}

fn lock_session() -> MutexGuard<'static, Option<Session>> {
    // A panic while holding the lock cannot leave a half-applied transition:
    // the store only replaces its state after a transition completes.
    SESSION.lock().unwrap_or_else(PoisonError::into_inner)
}

fn respond(ok: bool, message: impl Into<String>, session: Option<&Session>) -> BoardResponse {
    BoardResponse {
        ok,
        message: message.into(),
        board: session.map(|session| to_board_view(&session.store)),
    }
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("ASSIGNBOARD_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(BOARD_DB_FILE_NAME)
        })
        .clone()
}

fn to_board_view(store: &AssignmentStore) -> BoardView {
    let state = store.current_state();
    BoardView {
        groups: state
            .groups
            .iter()
            .map(|group| BoardGroupView {
                group_uuid: group.uuid.to_string(),
                header: to_item_view(&group.header),
                children: group.children.iter().map(to_item_view).collect(),
                is_expanded: group.is_expanded,
            })
            .collect(),
        pool: state.pool.iter().map(to_item_view).collect(),
        undo_depth: u32::try_from(store.history().len()).unwrap_or(u32::MAX),
    }
}

fn to_item_view(item: &assignboard_core::Item) -> BoardItemView {
    BoardItemView {
        id: item.id,
        description: item.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        board_configure_db_path, board_load, board_move, board_save, board_snapshot_json,
        board_toggle_expanded, board_undo, core_version, init_logging, ping,
        resolve_board_db_path, SESSION,
    };
    use std::sync::{Mutex, MutexGuard, Once};

    static TEST_GUARD: Mutex<()> = Mutex::new(());
    static CONFIGURE_DB: Once = Once::new();

    fn fresh_board() -> MutexGuard<'static, ()> {
        let guard = TEST_GUARD.lock().unwrap_or_else(|err| err.into_inner());
        CONFIGURE_DB.call_once(|| {
            let path = std::env::temp_dir().join(format!(
                "assignboard-ffi-test-{}.sqlite3",
                std::process::id()
            ));
            assert_eq!(board_configure_db_path(path.display().to_string()), "");
        });
        *SESSION.lock().unwrap_or_else(|err| err.into_inner()) = None;
        let _ = std::fs::remove_file(resolve_board_db_path());
        guard
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn commands_without_session_fail() {
        let _guard = fresh_board();
        let response = board_undo();
        assert!(!response.ok);
        assert!(response.board.is_none());
        assert!(board_snapshot_json().is_empty());
    }

    #[test]
    fn load_move_undo_round_trip() {
        let _guard = fresh_board();
        let loaded = board_load(Some(4));
        assert!(loaded.ok, "{}", loaded.message);
        let board = loaded.board.unwrap();
        assert_eq!(board.groups.len(), 2);
        assert_eq!(board.pool.len(), 2);

        let moved = board_move(3, 0, 5);
        assert!(moved.ok, "{}", moved.message);
        let board = moved.board.unwrap();
        assert_eq!(board.groups[1].children[0].id, 3);
        assert_eq!(board.undo_depth, 1);

        let undone = board_undo();
        assert!(undone.ok);
        let board = undone.board.unwrap();
        assert_eq!(
            board.pool.iter().map(|item| item.id).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert_eq!(board.undo_depth, 0);
    }

    #[test]
    fn invalid_move_returns_failure_with_board() {
        let _guard = fresh_board();
        assert!(board_load(None).ok);

        let response = board_move(999, 0, 0);
        assert!(!response.ok);
        assert!(response.message.contains("invalid move"));
        assert_eq!(response.board.unwrap().pool.len(), 2);
    }

    #[test]
    fn save_clears_history_and_reload_restores_board() {
        let _guard = fresh_board();
        assert!(board_load(Some(6)).ok);
        let moved = board_move(5, 1, 0);
        let group_uuid = moved.board.unwrap().groups[2].group_uuid.clone();
        assert!(board_toggle_expanded(group_uuid).ok);

        let saved = board_save();
        assert!(saved.ok, "{}", saved.message);
        let saved_board = saved.board.unwrap();
        assert_eq!(saved_board.undo_depth, 0);

        let reloaded = board_load(None);
        assert!(reloaded.ok);
        assert_eq!(reloaded.message, "Board restored from last save.");
        assert_eq!(reloaded.board.unwrap(), saved_board);
    }

    #[test]
    fn toggle_rejects_unknown_group() {
        let _guard = fresh_board();
        assert!(board_load(None).ok);

        assert!(!board_toggle_expanded("not-a-uuid".to_string()).ok);
        assert!(!board_toggle_expanded(uuid::Uuid::new_v4().to_string()).ok);
    }

    #[test]
    fn snapshot_json_exposes_pool_and_groups() {
        let _guard = fresh_board();
        assert!(board_load(None).ok);

        let json: serde_json::Value = serde_json::from_str(&board_snapshot_json()).unwrap();
        assert_eq!(json["pool"].as_array().unwrap().len(), 2);
        assert_eq!(json["groups"][0]["header"]["description"], "Item 1");
        assert_eq!(json["groups"][0]["is_expanded"], false);
    }
}
