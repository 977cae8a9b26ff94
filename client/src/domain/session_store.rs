//! Observable holder of the current session.
//!
//! One `SessionStore` instance is created by the composition root and shared
//! with every consumer that needs to know who is logged in. Mutations are
//! persisted under [`CURRENT_USER_KEY`] and broadcast to subscribers
//! synchronously, in subscription order.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, warn};

use super::ports::KeyValueStore;
use super::session::Session;

/// Storage key holding the JSON-serialised session.
pub const CURRENT_USER_KEY: &str = "currentUser";

type Subscriber = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

/// Whether anyone is logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session.
    Anonymous,
    /// A session with user and token is present.
    Authenticated,
}

/// Handle returned by [`SessionStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Inner {
    current: Option<Session>,
    subscribers: BTreeMap<SubscriptionId, Subscriber>,
    next_id: u64,
}

/// Process-wide source of truth for the logged-in user.
///
/// In-memory state is updated eagerly once the new value serialises;
/// persistence is best effort and a storage failure is logged without
/// rolling the in-memory value back. The write to storage happens under the
/// same lock as the memory update, so concurrent writers persist in the
/// order they took effect. Subscribers run after the lock is released.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    inner: Mutex<Inner>,
}

impl SessionStore {
    /// Restore the session persisted in `storage`.
    ///
    /// Missing, unreadable or corrupt values start the store anonymous.
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let current = restore(storage.as_ref());
        Self {
            storage,
            inner: Mutex::new(Inner {
                current,
                ..Inner::default()
            }),
        }
    }

    /// Copy of the current session.
    #[must_use]
    pub fn get_current_user(&self) -> Option<Session> {
        self.inner().current.clone()
    }

    /// Current authentication state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.inner().current.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    /// Whether a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// `Authorization` header value for the current session, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        self.inner().current.as_ref().map(Session::bearer)
    }

    /// Replace the current session and notify subscribers.
    ///
    /// A session with a blank token is rejected: the call logs a warning and
    /// changes nothing. Returns whether the value was accepted.
    pub fn set_current_user(&self, session: Option<Session>) -> bool {
        if let Some(candidate) = session.as_ref() {
            if let Err(err) = candidate.validate() {
                warn!(error = %err, "rejecting malformed session");
                return false;
            }
        }

        let serialised = match session.as_ref().map(serde_json::to_string).transpose() {
            Ok(serialised) => serialised,
            Err(err) => {
                warn!(error = %err, "failed to serialise session; keeping previous value");
                return false;
            }
        };

        let subscribers: Vec<Subscriber> = {
            let mut inner = self.inner();
            inner.current.clone_from(&session);
            self.persist(serialised.as_deref());
            inner.subscribers.values().cloned().collect()
        };

        debug!(
            authenticated = session.is_some(),
            subscribers = subscribers.len(),
            "session changed"
        );
        for subscriber in subscribers {
            subscriber(session.as_ref());
        }
        true
    }

    /// Accept an untyped `{ user, token }` payload or `null`.
    ///
    /// Partial objects are logged and ignored. Returns whether the value was
    /// accepted.
    pub fn set_current_user_from_json(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.set_current_user(None);
        }
        match Session::from_json(value) {
            Ok(session) => self.set_current_user(Some(session)),
            Err(err) => {
                warn!(error = %err, "rejecting malformed session payload");
                false
            }
        }
    }

    /// Register `callback` to receive every accepted session change.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        let mut inner = self.inner();
        let id = SubscriptionId(inner.next_id);
        inner.next_id = inner.next_id.wrapping_add(1);
        inner.subscribers.insert(id, Arc::new(callback));
        id
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner().subscribers.remove(&id).is_some()
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner().subscribers.len()
    }

    fn persist(&self, serialised: Option<&str>) {
        let result = match serialised {
            Some(raw) => self.storage.set(CURRENT_USER_KEY, raw),
            None => self.storage.remove(CURRENT_USER_KEY),
        };
        if let Err(err) = result {
            warn!(
                kind = err.variant_name(),
                error = %err,
                "failed to persist session; in-memory value kept"
            );
        }
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn restore(storage: &dyn KeyValueStore) -> Option<Session> {
    let raw = match storage.get(CURRENT_USER_KEY) {
        Ok(raw) => raw?,
        Err(err) => {
            warn!(error = %err, "failed to read persisted session");
            return None;
        }
    };
    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "discarding corrupt persisted session");
            return None;
        }
    };
    if value.is_null() {
        return None;
    }
    Session::from_json(&value)
        .inspect_err(|err| warn!(error = %err, "discarding incomplete persisted session"))
        .ok()
}

#[cfg(test)]
mod tests {
    //! Unit coverage for persistence failure handling.

    use mockall::predicate::eq;

    use super::*;
    use crate::domain::ports::{KeyValueStoreError, MockKeyValueStore};
    use crate::domain::session::{UserId, UserRecord};

    fn session(id: u64) -> Session {
        Session::new(UserRecord::new(UserId::new(id)), format!("token-{id}")).expect("session")
    }

    #[test]
    fn unreadable_storage_starts_anonymous() {
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_get()
            .with(eq(CURRENT_USER_KEY))
            .returning(|key| Err(KeyValueStoreError::read(key, "permission denied")));

        let store = SessionStore::load(Arc::new(storage));
        assert_eq!(store.state(), SessionState::Anonymous);
    }

    #[test]
    fn write_failure_keeps_in_memory_session_and_notifies() {
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .times(1)
            .returning(|key, _| Err(KeyValueStoreError::write(key, "quota exceeded")));
        let store = SessionStore::load(Arc::new(storage));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |value| {
            sink.lock()
                .expect("lock")
                .push(value.map(|session| session.user.id));
        });

        assert!(store.set_current_user(Some(session(3))));
        assert_eq!(store.get_current_user(), Some(session(3)));
        assert_eq!(*seen.lock().expect("lock"), vec![Some(UserId::new(3))]);
    }

    #[test]
    fn blank_token_is_rejected_without_touching_storage() {
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().returning(|_| Ok(None));
        storage.expect_set().never();
        storage.expect_remove().never();
        let store = SessionStore::load(Arc::new(storage));
        let blank = Session {
            user: UserRecord::new(UserId::new(1)),
            token: " ".to_owned(),
        };

        assert!(!store.set_current_user(Some(blank)));
        assert_eq!(store.get_current_user(), None);
    }

    #[test]
    fn logout_removes_persisted_key() {
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_remove()
            .with(eq(CURRENT_USER_KEY))
            .times(1)
            .returning(|_| Ok(()));
        let store = SessionStore::load(Arc::new(storage));

        assert!(store.set_current_user(None));
        assert!(!store.is_authenticated());
    }

    /// Storage that reports entry into `set` and then stalls.
    struct StallingStorage {
        entries: crate::domain::ports::InMemoryKeyValueStore,
        entered: Mutex<std::sync::mpsc::Sender<()>>,
    }

    impl KeyValueStore for StallingStorage {
        fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
            self.entries.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
            self.entered.lock().expect("lock").send(()).expect("send");
            std::thread::sleep(std::time::Duration::from_millis(100));
            self.entries.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
            self.entries.remove(key)
        }
    }

    #[test]
    fn overlapping_writes_persist_in_memory_order() {
        let (entered_tx, entered_rx) = std::sync::mpsc::channel();
        let storage = Arc::new(StallingStorage {
            entries: crate::domain::ports::InMemoryKeyValueStore::new(),
            entered: Mutex::new(entered_tx),
        });
        let store = SessionStore::load(storage.clone());

        std::thread::scope(|scope| {
            scope.spawn(|| store.set_current_user(Some(session(5))));
            entered_rx.recv().expect("login reached storage");
            assert!(store.set_current_user(None));
        });

        assert_eq!(store.get_current_user(), None);
        assert_eq!(storage.get(CURRENT_USER_KEY).expect("read"), None);
        assert_eq!(SessionStore::load(storage).get_current_user(), None);
    }

    #[test]
    fn subscribers_may_read_the_store_during_notification() {
        let storage = Arc::new(crate::domain::ports::InMemoryKeyValueStore::new());
        let store = Arc::new(SessionStore::load(storage));
        let observed = Arc::new(Mutex::new(None));
        let reader = Arc::clone(&store);
        let sink = Arc::clone(&observed);
        store.subscribe(move |_| {
            *sink.lock().expect("lock") = Some(reader.is_authenticated());
        });

        store.set_current_user(Some(session(8)));
        assert_eq!(*observed.lock().expect("lock"), Some(true));
    }
}
