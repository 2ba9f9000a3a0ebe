use assignboard_core::db::{open_db, open_db_in_memory, DbError};
use assignboard_core::{
    AssignmentState, BoardConfig, BoardService, BoardServiceError, Catalog, Item, LoadSource,
    MoveCommand, SnapshotRepoError, SnapshotRepoResult, SnapshotRepository,
    SqliteSnapshotRepository, StateValidationError, UndoOutcome,
};
use std::cell::{Cell, RefCell};

#[derive(Default)]
struct RecordingRepository {
    stored: RefCell<Option<AssignmentState>>,
    saved: RefCell<Vec<AssignmentState>>,
    fail_saves: Cell<bool>,
}

impl SnapshotRepository for RecordingRepository {
    fn load_snapshot(&self) -> SnapshotRepoResult<Option<AssignmentState>> {
        Ok(self.stored.borrow().clone())
    }

    fn save_snapshot(&self, state: &AssignmentState) -> SnapshotRepoResult<()> {
        if self.fail_saves.get() {
            return Err(SnapshotRepoError::Db(DbError::Sqlite(
                rusqlite::Error::InvalidQuery,
            )));
        }
        self.saved.borrow_mut().push(state.clone());
        *self.stored.borrow_mut() = Some(state.clone());
        Ok(())
    }
}

#[test]
fn load_without_snapshot_splits_catalog_with_empty_history() {
    let repo = RecordingRepository::default();
    let service = BoardService::load(&repo, BoardConfig::default()).unwrap();

    assert_eq!(service.source(), LoadSource::Catalog);
    assert_eq!(service.current_state().groups.len(), 2);
    assert_eq!(service.current_state().pool_ids(), vec![3, 4]);
    assert!(service.history().is_empty());
}

#[test]
fn load_prefers_stored_snapshot() {
    let repo = RecordingRepository::default();
    let mut stored = AssignmentState::from_catalog(&Catalog::placeholder(6));
    stored.groups[2].children.push(stored.pool.remove(1));
    *repo.stored.borrow_mut() = Some(stored.clone());

    let service = BoardService::load(&repo, BoardConfig::default()).unwrap();
    assert_eq!(service.source(), LoadSource::Snapshot);
    assert_eq!(service.current_state(), &stored);
    assert!(service.history().is_empty());
}

#[test]
fn load_rejects_stored_snapshot_with_item_placed_twice() {
    let repo = RecordingRepository::default();
    let mut stored = AssignmentState::from_catalog(&Catalog::placeholder(4));
    let duplicate = stored.pool[0].clone();
    stored.groups[0].children.push(duplicate);
    *repo.stored.borrow_mut() = Some(stored);

    match BoardService::load(&repo, BoardConfig::default()) {
        Err(BoardServiceError::LoadFailed(SnapshotRepoError::Validation(
            StateValidationError::DuplicateItem(id),
        ))) => assert_eq!(id, 3),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("invalid snapshot was accepted"),
    }
}

#[test]
fn save_twice_without_moves_sends_same_state_and_clears_history() {
    let repo = RecordingRepository::default();
    let mut service = BoardService::load(&repo, BoardConfig::default()).unwrap();
    service.move_item(&MoveCommand::from_pool(3, 0, 0)).unwrap();
    assert_eq!(service.history().len(), 1);

    service.save().unwrap();
    assert!(service.history().is_empty());
    service.save().unwrap();
    assert!(service.history().is_empty());

    let saved = repo.saved.borrow();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0], saved[1]);
    assert_eq!(&saved[0], service.current_state());
}

#[test]
fn failed_save_keeps_state_and_history_for_retry() {
    let repo = RecordingRepository::default();
    let mut service = BoardService::load(&repo, BoardConfig::default()).unwrap();
    service.move_item(&MoveCommand::from_pool(4, 1, 1)).unwrap();
    let state_before = service.current_state().clone();

    repo.fail_saves.set(true);
    let err = service.save().unwrap_err();
    assert!(matches!(err, BoardServiceError::PersistenceFailure(_)));
    assert_eq!(service.current_state(), &state_before);
    assert_eq!(service.history().len(), 1);

    repo.fail_saves.set(false);
    service.save().unwrap();
    assert!(service.history().is_empty());
    assert_eq!(repo.saved.borrow().len(), 1);
}

#[test]
fn invalid_move_is_surfaced_without_side_effects() {
    let repo = RecordingRepository::default();
    let mut service = BoardService::load(&repo, BoardConfig::default()).unwrap();
    let before = service.current_state().clone();

    let err = service.move_item(&MoveCommand::from_pool(999, 0, 0)).unwrap_err();
    assert!(matches!(err, BoardServiceError::InvalidMove(_)));
    assert_eq!(service.current_state(), &before);
    assert!(service.history().is_empty());
}

#[test]
fn undo_after_save_is_a_no_op() {
    let repo = RecordingRepository::default();
    let mut service = BoardService::load(&repo, BoardConfig::default()).unwrap();
    service.move_item(&MoveCommand::from_pool(3, 0, 0)).unwrap();
    service.save().unwrap();

    assert_eq!(service.undo(), UndoOutcome::Empty);
    assert_eq!(service.current_state().groups[0].child_ids(), vec![3]);
}

#[test]
fn history_limit_comes_from_config() {
    let repo = RecordingRepository::default();
    let config = BoardConfig {
        history_limit: 2,
        catalog_size: 10,
    };
    let mut service = BoardService::load(&repo, config).unwrap();
    for _ in 0..3 {
        let id = service.current_state().pool[0].id;
        service.move_item(&MoveCommand::from_pool(id, 0, 0)).unwrap();
    }

    assert_eq!(service.history().len(), 2);
    assert_eq!(service.history().steps()[0].item_id, 7);
}

#[test]
fn load_with_custom_catalog() {
    let repo = RecordingRepository::default();
    let catalog = Catalog::new([
        Item::new(10, "Design"),
        Item::new(20, "Build"),
        Item::new(30, "Wireframes"),
    ]);
    let service =
        BoardService::load_with_catalog(&repo, &catalog, BoardConfig::default()).unwrap();

    assert_eq!(service.current_state().groups.len(), 2);
    assert_eq!(service.current_state().groups[1].header.description, "Build");
    assert_eq!(service.current_state().pool_ids(), vec![30]);
}

#[test]
fn sqlite_session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    let expected = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
        let mut service = BoardService::load(repo, BoardConfig::default()).unwrap();
        service.move_item(&MoveCommand::from_pool(4, 1, 1)).unwrap();
        let group_uuid = service.current_state().groups[1].uuid;
        assert!(service.toggle_expanded(group_uuid));
        service.save().unwrap();
        service.current_state().clone()
    };

    let conn = open_db(&path).unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    let service = BoardService::load(repo, BoardConfig::default()).unwrap();
    assert_eq!(service.source(), LoadSource::Snapshot);
    assert_eq!(service.current_state(), &expected);
    assert!(service.history().is_empty());
}

#[test]
fn into_store_and_from_parts_keep_history() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    let mut service = BoardService::load(repo, BoardConfig::default()).unwrap();
    service.move_item(&MoveCommand::from_pool(3, 0, 0)).unwrap();

    let store = service.into_store();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    let mut service = BoardService::from_parts(repo, store, LoadSource::Catalog);
    assert_eq!(service.history().len(), 1);
    assert!(matches!(service.undo(), UndoOutcome::Reverted(_)));
}
