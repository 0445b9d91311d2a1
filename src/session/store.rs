//! Persistent session store.
//!
//! The one place that knows the storage key names and how the identity record
//! is serialized. Everything else asks this type.

use super::Session;
use super::backend::{FileKeyValueStore, KeyValueStore};
use crate::models::Identity;
use crate::{Error, Result};
use std::path::Path;
use std::sync::Arc;

/// Key holding the opaque bearer token.
pub const TOKEN_KEY: &str = "auth-token";

/// Key holding the JSON-serialized identity record.
pub const IDENTITY_KEY: &str = "current-user";

/// Durable token + identity pair.
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Store backed by `session.kdl` inside `data_dir`.
    pub fn open_in(data_dir: &Path) -> Self {
        Self::new(Arc::new(FileKeyValueStore::in_dir(data_dir)))
    }

    /// Persist a token and identity as one write.
    ///
    /// A blank token is rejected before anything is written.
    pub fn save(&self, token: &str, identity: &Identity) -> Result<()> {
        if token.trim().is_empty() {
            return Err(Error::IncompleteCredentials("token is empty".to_string()));
        }
        let record = serde_json::to_string(identity)?;
        self.backend
            .set_many(&[(TOKEN_KEY, token.to_string()), (IDENTITY_KEY, record)])?;
        tracing::debug!(location = %self.backend.location(), user_id = identity.id, "session saved");
        Ok(())
    }

    /// Remove both keys.
    ///
    /// If the combined removal fails the backend is purged outright. The first
    /// error is reported only when neither step succeeded.
    pub fn clear(&self) -> Result<()> {
        match self.backend.remove_many(&[TOKEN_KEY, IDENTITY_KEY]) {
            Ok(()) => Ok(()),
            Err(remove_err) => {
                tracing::warn!(error = %remove_err, "could not remove session keys, purging storage");
                self.backend.purge().map_err(|purge_err| {
                    tracing::warn!(error = %purge_err, "could not purge session storage");
                    remove_err
                })
            }
        }
    }

    /// The stored token, if any. Unreadable storage counts as no token.
    pub fn read_token(&self) -> Option<String> {
        self.snapshot().0
    }

    /// The stored identity, if any. Malformed records count as no identity.
    pub fn read_identity(&self) -> Option<Identity> {
        self.snapshot().1
    }

    /// Strict identity read: malformed records are reported.
    pub fn load_identity(&self) -> Result<Option<Identity>> {
        let raw = self.backend.get(IDENTITY_KEY)?;
        raw.as_deref().map(parse_identity).transpose()
    }

    /// True iff token and identity are both present.
    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    /// The full session, when both halves are present.
    pub fn session(&self) -> Option<Session> {
        match self.snapshot() {
            (Some(token), Some(identity)) => Some(Session { token, identity }),
            _ => None,
        }
    }

    /// Get the storage location description (for display purposes).
    pub fn location(&self) -> String {
        self.backend.location()
    }

    /// Token and identity read together from one backend snapshot.
    pub(crate) fn snapshot(&self) -> (Option<String>, Option<Identity>) {
        let values = match self.backend.get_many(&[TOKEN_KEY, IDENTITY_KEY]) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable, treating as logged out");
                return (None, None);
            }
        };
        let mut values = values.into_iter();
        let token = values.next().flatten().filter(|t| !t.trim().is_empty());
        let identity = values
            .next()
            .flatten()
            .and_then(|raw| match parse_identity(&raw) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring stored identity");
                    None
                }
            });
        (token, identity)
    }
}

fn parse_identity(raw: &str) -> Result<Identity> {
    serde_json::from_str(raw).map_err(|e| Error::MalformedPersistedState(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::backend::MemoryKeyValueStore;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;

    fn memory_store() -> (Arc<MemoryKeyValueStore>, SessionStore) {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let store = SessionStore::new(backend.clone());
        (backend, store)
    }

    fn bob() -> Identity {
        Identity::new(5, "bob")
    }

    #[test]
    fn test_save_then_read() {
        let (_backend, store) = memory_store();
        store.save("t1", &bob()).unwrap();

        assert_eq!(store.read_token().as_deref(), Some("t1"));
        assert_eq!(store.read_identity(), Some(bob()));
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_save_rejects_blank_token() {
        let (_backend, store) = memory_store();
        let err = store.save("  ", &bob()).unwrap_err();
        assert!(matches!(err, Error::IncompleteCredentials(_)));
        assert!(store.read_token().is_none());
    }

    #[test]
    fn test_clear_removes_both() {
        let (_backend, store) = memory_store();
        store.save("t1", &bob()).unwrap();
        store.clear().unwrap();

        assert!(store.read_token().is_none());
        assert!(store.read_identity().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_clear_without_session_is_ok() {
        let (_backend, store) = memory_store();
        store.clear().unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_token_only_is_not_authenticated() {
        let (backend, store) = memory_store();
        backend.set_many(&[(TOKEN_KEY, "t1".to_string())]).unwrap();

        assert_eq!(store.read_token().as_deref(), Some("t1"));
        assert!(!store.is_authenticated());
        assert!(store.session().is_none());
    }

    #[test]
    fn test_identity_only_is_not_authenticated() {
        let (backend, store) = memory_store();
        backend
            .set_many(&[(IDENTITY_KEY, r#"{"id":5,"username":"bob"}"#.to_string())])
            .unwrap();
        assert!(store.read_identity().is_some());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_malformed_identity_reads_as_absent() {
        let (backend, store) = memory_store();
        backend
            .set_many(&[
                (TOKEN_KEY, "t1".to_string()),
                (IDENTITY_KEY, "{not json".to_string()),
            ])
            .unwrap();

        assert!(store.read_identity().is_none());
        assert!(!store.is_authenticated());
        assert!(matches!(
            store.load_identity(),
            Err(Error::MalformedPersistedState(_))
        ));
    }

    #[test]
    fn test_identity_without_id_is_malformed() {
        let (backend, store) = memory_store();
        backend
            .set_many(&[(IDENTITY_KEY, r#"{"username":"bob"}"#.to_string())])
            .unwrap();
        assert!(store.read_identity().is_none());
    }

    #[test]
    fn test_resave_overwrites_previous_identity() {
        let (_backend, store) = memory_store();
        let mut alice = Identity::new(9, "alice");
        alice.email = Some("alice@example.com".to_string());
        store.save("t-alice", &alice).unwrap();
        store.save("t-bob", &bob()).unwrap();

        let identity = store.read_identity().unwrap();
        assert_eq!(identity, bob());
        assert!(identity.email.is_none());
        assert_eq!(store.read_token().as_deref(), Some("t-bob"));
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        SessionStore::open_in(dir.path()).save("t1", &bob()).unwrap();

        let reopened = SessionStore::open_in(dir.path());
        assert_eq!(reopened.session().map(|s| s.token), Some("t1".to_string()));
    }

    #[test]
    fn test_unparseable_file_reads_as_logged_out() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("session.kdl"), "auth-token \"oops").unwrap();
        let store = SessionStore::open_in(dir.path());
        assert!(store.read_token().is_none());
        assert!(!store.is_authenticated());
    }

    /// Backend whose removals fail, to exercise the purge fallback.
    #[derive(Default)]
    struct StubbornBackend {
        inner: MemoryKeyValueStore,
        purge_fails: AtomicBool,
    }

    impl KeyValueStore for StubbornBackend {
        fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
            self.inner.get_many(keys)
        }
        fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
            self.inner.set_many(entries)
        }
        fn remove_many(&self, _keys: &[&str]) -> Result<()> {
            Err(Error::Other("remove refused".to_string()))
        }
        fn purge(&self) -> Result<()> {
            if self.purge_fails.load(Ordering::SeqCst) {
                return Err(Error::Other("purge refused".to_string()));
            }
            self.inner.purge()
        }
        fn location(&self) -> String {
            "stubborn".to_string()
        }
    }

    #[test]
    fn test_clear_falls_back_to_purge() {
        let backend = Arc::new(StubbornBackend::default());
        let store = SessionStore::new(backend.clone());
        store.save("t1", &bob()).unwrap();

        store.clear().unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_clear_reports_error_when_everything_fails() {
        let backend = Arc::new(StubbornBackend::default());
        backend.purge_fails.store(true, Ordering::SeqCst);
        let store = SessionStore::new(backend.clone());
        store.save("t1", &bob()).unwrap();

        let err = store.clear().unwrap_err();
        assert!(err.to_string().contains("remove refused"));
    }
}
