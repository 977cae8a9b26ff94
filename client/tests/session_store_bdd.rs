//! Behaviour tests for session persistence and broadcast.
//!
//! These scenarios drive a `SessionStore` over a file-backed state directory
//! and restart it to check what a fresh process would see.

use std::cell::RefCell;
use std::sync::{Arc, Mutex};

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tarmeez_client::domain::ports::KeyValueStore;
use tarmeez_client::domain::{CURRENT_USER_KEY, Session, SessionStore, UserId, UserRecord};
use tarmeez_client::outbound::storage::FileKeyValueStore;
use tempfile::TempDir;

type ChangeLog = Arc<Mutex<Vec<Option<UserId>>>>;

struct SessionWorld {
    temp: TempDir,
    store: RefCell<Option<SessionStore>>,
    accepted: RefCell<Option<bool>>,
    changes: ChangeLog,
}

impl SessionWorld {
    fn new() -> Self {
        Self {
            temp: TempDir::new().expect("temp dir"),
            store: RefCell::new(None),
            accepted: RefCell::new(None),
            changes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn storage(&self) -> Arc<FileKeyValueStore> {
        let root =
            Utf8PathBuf::from_path_buf(self.temp.path().join("state")).expect("utf-8 temp path");
        Arc::new(FileKeyValueStore::open(&root).expect("open state dir"))
    }

    fn restart(&self) {
        *self.store.borrow_mut() = Some(SessionStore::load(self.storage()));
    }

    fn with_store<T>(&self, f: impl FnOnce(&SessionStore) -> T) -> T {
        let store = self.store.borrow();
        f(store.as_ref().expect("store should be loaded"))
    }

    fn set(&self, session: Option<Session>) {
        let accepted = self.with_store(|store| store.set_current_user(session));
        *self.accepted.borrow_mut() = Some(accepted);
    }
}

fn user(id: u64) -> UserRecord {
    UserRecord::new(UserId::new(id)).with_field("username", format!("user{id}"))
}

#[fixture]
fn world() -> SessionWorld {
    SessionWorld::new()
}

#[given("an empty state directory")]
fn an_empty_state_directory(world: &SessionWorld) {
    world.restart();
}

#[given("a state directory holding a corrupt session")]
fn a_state_directory_holding_a_corrupt_session(world: &SessionWorld) {
    world
        .storage()
        .set(CURRENT_USER_KEY, r#"{"user":{"id":1}"#)
        .expect("seed corrupt value");
}

#[given("a subscriber recording session changes")]
fn a_subscriber_recording_session_changes(world: &SessionWorld) {
    let sink = Arc::clone(&world.changes);
    world.with_store(|store| {
        store.subscribe(move |current: Option<&Session>| {
            sink.lock()
                .expect("change log lock")
                .push(current.map(|session| session.user.id));
        })
    });
}

#[when("user {id:u64} logs in with token {token}")]
fn user_logs_in_with_token(world: &SessionWorld, id: u64, token: String) {
    world.set(Some(Session::new(user(id), token).expect("valid session")));
}

#[when("user {id:u64} logs in with a blank token")]
fn user_logs_in_with_a_blank_token(world: &SessionWorld, id: u64) {
    world.set(Some(Session {
        user: user(id),
        token: "  ".to_owned(),
    }));
}

#[when("the user logs out")]
fn the_user_logs_out(world: &SessionWorld) {
    world.set(None);
}

#[when("the client restarts")]
fn the_client_restarts(world: &SessionWorld) {
    world.restart();
}

#[then("the current user is {id:u64}")]
fn the_current_user_is(world: &SessionWorld, id: u64) {
    let current = world.with_store(SessionStore::get_current_user);
    assert_eq!(current.map(|session| session.user.id), Some(UserId::new(id)));
}

#[then("requests are authorised with token {token}")]
fn requests_are_authorised_with_token(world: &SessionWorld, token: String) {
    let bearer = world.with_store(SessionStore::bearer_token);
    assert_eq!(bearer, Some(format!("Bearer {token}")));
}

#[then("nobody is logged in")]
fn nobody_is_logged_in(world: &SessionWorld) {
    assert!(!world.with_store(SessionStore::is_authenticated));
    assert_eq!(world.with_store(SessionStore::get_current_user), None);
}

#[then("no session is stored")]
fn no_session_is_stored(world: &SessionWorld) {
    assert_eq!(
        world.storage().get(CURRENT_USER_KEY).expect("read state"),
        None
    );
}

#[then("the session change is rejected")]
fn the_session_change_is_rejected(world: &SessionWorld) {
    assert_eq!(*world.accepted.borrow(), Some(false));
}

#[then("the subscriber heard user {id:u64} and then nobody")]
fn the_subscriber_heard_user_and_then_nobody(world: &SessionWorld, id: u64) {
    assert_eq!(
        *world.changes.lock().expect("change log lock"),
        vec![Some(UserId::new(id)), None]
    );
}

#[scenario(path = "tests/features/session_store.feature")]
fn session_store_scenarios(world: SessionWorld) {
    drop(world);
}
