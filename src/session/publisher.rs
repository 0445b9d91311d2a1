//! In-memory "current user" publisher.
//!
//! Holds the current identity (or none) and pushes every change to its
//! observers. A new observer is called immediately with the current value,
//! then once per change after that.

use super::store::SessionStore;
use crate::models::Identity;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Mutex, MutexGuard};

/// Handle returned by [`SessionPublisher::subscribe`].
pub type SubscriptionId = u64;

type Observer = Box<dyn FnMut(Option<&Identity>) + Send>;

struct Inner {
    current: Option<Identity>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: SubscriptionId,
}

/// Replay-latest holder of the current identity.
///
/// Observers run synchronously, in subscription order, on the thread that
/// triggered the change, while the publisher is locked. They must not call
/// back into the publisher.
pub struct SessionPublisher {
    inner: Mutex<Inner>,
}

impl SessionPublisher {
    pub fn new(initial: Option<Identity>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                current: initial,
                observers: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Publisher seeded with the stored identity, if the stored session is complete.
    pub fn seeded_from(store: &SessionStore) -> Self {
        Self::new(store.session().map(|session| session.identity))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The current value.
    pub fn current(&self) -> Option<Identity> {
        self.lock().current.clone()
    }

    /// Register an observer. It is called with the current value before this returns.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: FnMut(Option<&Identity>) + Send + 'static,
    {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        let mut observer: Observer = Box::new(observer);
        observer(inner.current.as_ref());
        inner.observers.push((id, observer));
        id
    }

    /// Subscribe through a channel instead of a callback.
    ///
    /// The receiver already holds the current value when this returns.
    pub fn subscribe_channel(&self) -> (SubscriptionId, Receiver<Option<Identity>>) {
        let (tx, rx) = mpsc::channel();
        let id = self.subscribe(move |identity| {
            // A dropped receiver just stops listening.
            let _ = tx.send(identity.cloned());
        });
        (id, rx)
    }

    /// Remove an observer. Returns false if the id was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.observers.len();
        inner.observers.retain(|(sub_id, _)| *sub_id != id);
        inner.observers.len() < before
    }

    /// Number of live observers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().observers.len()
    }

    /// Replace the current value and notify every observer.
    ///
    /// Only the auth gateway publishes.
    pub(crate) fn publish(&self, value: Option<Identity>) {
        let mut inner = self.lock();
        inner.current = value;
        let Inner {
            current, observers, ..
        } = &mut *inner;
        for (_, observer) in observers.iter_mut() {
            observer(current.as_ref());
        }
        tracing::debug!(
            user_id = current.as_ref().map(|i| i.id),
            observers = observers.len(),
            "session published"
        );
    }
}
