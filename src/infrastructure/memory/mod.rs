// SPDX-License-Identifier: MPL-2.0
//! In-process auth and document backend.
//!
//! Behaves like a push-based hosted backend: new listeners immediately
//! receive the current state, and every change is pushed to all matching
//! listeners. It also keeps counters on its document listeners so callers
//! can check how many were ever live at the same time.
//!
//! # Example
//!
//! ```
//! use session_shell::infrastructure::MemoryBackend;
//! use session_shell::domain::session::UserKey;
//!
//! let backend = MemoryBackend::new();
//! backend.sign_in(UserKey::new("uid-1"));
//! assert_eq!(backend.current_user(), Some(UserKey::new("uid-1")));
//! ```

use crate::application::port::{
    AuthSink, AuthTransport, DocumentSink, DocumentTransport, SubscriptionHandle,
};
use crate::domain::session::{Document, UserKey};
use crate::error::TransportError;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct DocumentListener {
    collection: String,
    key: UserKey,
    sink: DocumentSink,
}

#[derive(Default)]
struct Inner {
    next_listener: u64,
    current_user: Option<UserKey>,
    documents: HashMap<(String, UserKey), Document>,
    auth_listeners: BTreeMap<u64, AuthSink>,
    document_listeners: BTreeMap<u64, DocumentListener>,
    failing_auth_subscription: Option<TransportError>,
    failing_document_subscription: Option<TransportError>,
    documents_opened: usize,
    documents_cancelled: usize,
    peak_live_documents: usize,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_listener += 1;
        self.next_listener
    }

    fn document_sinks(&self, collection: &str, key: &UserKey) -> Vec<DocumentSink> {
        self.document_listeners
            .values()
            .filter(|l| l.collection == collection && &l.key == key)
            .map(|l| l.sink.clone())
            .collect()
    }
}

/// Shared in-memory backend. Clones refer to the same state.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Authenticates `key` and notifies every auth listener.
    pub fn sign_in(&self, key: UserKey) {
        self.set_user(Some(key));
    }

    /// Drops authentication and notifies every auth listener.
    pub fn sign_out(&self) {
        self.set_user(None);
    }

    fn set_user(&self, user: Option<UserKey>) {
        let sinks: Vec<AuthSink> = {
            let mut inner = self.lock();
            inner.current_user.clone_from(&user);
            inner.auth_listeners.values().cloned().collect()
        };
        for sink in sinks {
            sink.auth_state_changed(user.clone());
        }
    }

    #[must_use]
    pub fn current_user(&self) -> Option<UserKey> {
        self.lock().current_user.clone()
    }

    /// Stores a document and pushes it to its listeners.
    pub fn put_document(&self, collection: &str, key: UserKey, document: Document) {
        let sinks = {
            let mut inner = self.lock();
            let sinks = inner.document_sinks(collection, &key);
            inner
                .documents
                .insert((collection.to_string(), key), document.clone());
            sinks
        };
        for sink in sinks {
            sink.snapshot(Some(document.clone()));
        }
    }

    /// Removes a document and tells its listeners it no longer exists.
    pub fn delete_document(&self, collection: &str, key: &UserKey) {
        let sinks = {
            let mut inner = self.lock();
            inner.documents.remove(&(collection.to_string(), key.clone()));
            inner.document_sinks(collection, key)
        };
        for sink in sinks {
            sink.snapshot(None);
        }
    }

    /// Sends `error` down every auth listener's error channel.
    pub fn fail_auth_listeners(&self, error: TransportError) {
        let sinks: Vec<AuthSink> = self.lock().auth_listeners.values().cloned().collect();
        for sink in sinks {
            sink.fail(error.clone());
        }
    }

    /// Sends `error` down every document listener's error channel.
    pub fn fail_document_listeners(&self, error: TransportError) {
        let sinks: Vec<DocumentSink> = self
            .lock()
            .document_listeners
            .values()
            .map(|l| l.sink.clone())
            .collect();
        for sink in sinks {
            sink.fail(error.clone());
        }
    }

    /// Makes the next auth registration fail with `error`.
    pub fn fail_next_auth_subscription(&self, error: TransportError) {
        self.lock().failing_auth_subscription = Some(error);
    }

    /// Makes the next document registration fail with `error`.
    pub fn fail_next_document_subscription(&self, error: TransportError) {
        self.lock().failing_document_subscription = Some(error);
    }

    #[must_use]
    pub fn live_auth_listeners(&self) -> usize {
        self.lock().auth_listeners.len()
    }

    #[must_use]
    pub fn live_document_listeners(&self) -> usize {
        self.lock().document_listeners.len()
    }

    /// Highest number of document listeners that were ever live together.
    #[must_use]
    pub fn peak_document_listeners(&self) -> usize {
        self.lock().peak_live_documents
    }

    #[must_use]
    pub fn document_subscriptions_opened(&self) -> usize {
        self.lock().documents_opened
    }

    #[must_use]
    pub fn document_subscriptions_cancelled(&self) -> usize {
        self.lock().documents_cancelled
    }

    /// Keys of the documents currently being watched.
    #[must_use]
    pub fn watched_keys(&self) -> Vec<UserKey> {
        self.lock()
            .document_listeners
            .values()
            .map(|l| l.key.clone())
            .collect()
    }
}

impl AuthTransport for MemoryBackend {
    fn on_auth_state_changed(&self, sink: AuthSink) -> Result<SubscriptionHandle, TransportError> {
        let (id, current) = {
            let mut inner = self.lock();
            if let Some(error) = inner.failing_auth_subscription.take() {
                return Err(error);
            }
            let id = inner.next_id();
            inner.auth_listeners.insert(id, sink.clone());
            (id, inner.current_user.clone())
        };
        sink.auth_state_changed(current);

        let backend = self.clone();
        Ok(SubscriptionHandle::new(move || {
            backend.lock().auth_listeners.remove(&id);
        }))
    }
}

impl DocumentTransport for MemoryBackend {
    fn on_document_snapshot(
        &self,
        collection: &str,
        key: &UserKey,
        sink: DocumentSink,
    ) -> Result<SubscriptionHandle, TransportError> {
        let (id, current) = {
            let mut inner = self.lock();
            if let Some(error) = inner.failing_document_subscription.take() {
                return Err(error);
            }
            let id = inner.next_id();
            inner.document_listeners.insert(
                id,
                DocumentListener {
                    collection: collection.to_string(),
                    key: key.clone(),
                    sink: sink.clone(),
                },
            );
            inner.documents_opened += 1;
            inner.peak_live_documents = inner.peak_live_documents.max(inner.document_listeners.len());
            let current = inner
                .documents
                .get(&(collection.to_string(), key.clone()))
                .cloned();
            (id, current)
        };
        sink.snapshot(current);

        let backend = self.clone();
        Ok(SubscriptionHandle::new(move || {
            let mut inner = backend.lock();
            if inner.document_listeners.remove(&id).is_some() {
                inner.documents_cancelled += 1;
            }
        }))
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("MemoryBackend")
            .field("current_user", &inner.current_user)
            .field("auth_listeners", &inner.auth_listeners.len())
            .field("document_listeners", &inner.document_listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::{SubscriptionId, TransportEvent};
    use serde_json::json;

    fn recorder() -> (Arc<Mutex<Vec<TransportEvent>>>, impl Fn(TransportEvent) + Send + Sync + Clone) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink_events = Arc::clone(&events);
        (events, move |event| sink_events.lock().unwrap().push(event))
    }

    fn doc(name: &str) -> Document {
        let mut document = Document::new();
        document.insert("name".to_string(), json!(name));
        document
    }

    #[test]
    fn auth_listener_receives_current_state_then_changes() {
        let backend = MemoryBackend::new();
        backend.sign_in(UserKey::new("a"));
        let (events, emit) = recorder();

        let _handle = backend
            .on_auth_state_changed(AuthSink::from_fn(SubscriptionId::new(), emit))
            .unwrap();
        backend.sign_out();

        let events = events.lock().unwrap();
        assert!(matches!(&events[0], TransportEvent::AuthStateChanged { key: Some(k), .. } if k.as_str() == "a"));
        assert!(matches!(&events[1], TransportEvent::AuthStateChanged { key: None, .. }));
    }

    #[test]
    fn document_listener_receives_current_snapshot_and_updates() {
        let backend = MemoryBackend::new();
        let key = UserKey::new("a");
        backend.put_document("Users", key.clone(), doc("Ada"));
        let (events, emit) = recorder();

        let _handle = backend
            .on_document_snapshot("Users", &key, DocumentSink::from_fn(SubscriptionId::new(), key.clone(), emit))
            .unwrap();
        backend.put_document("Users", key.clone(), doc("Grace"));
        backend.put_document("Other", key.clone(), doc("ignored"));
        backend.delete_document("Users", &key);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[2], TransportEvent::DocumentSnapshot { document: None, .. }));
    }

    #[test]
    fn missing_document_is_reported_as_none() {
        let backend = MemoryBackend::new();
        let key = UserKey::new("ghost");
        let (events, emit) = recorder();

        let _handle = backend
            .on_document_snapshot("Users", &key, DocumentSink::from_fn(SubscriptionId::new(), key.clone(), emit))
            .unwrap();

        assert!(matches!(
            &events.lock().unwrap()[0],
            TransportEvent::DocumentSnapshot { document: None, .. }
        ));
    }

    #[test]
    fn cancelling_removes_listener_and_counts_it() {
        let backend = MemoryBackend::new();
        let key = UserKey::new("a");
        let (_events, emit) = recorder();

        let handle = backend
            .on_document_snapshot("Users", &key, DocumentSink::from_fn(SubscriptionId::new(), key.clone(), emit))
            .unwrap();
        assert_eq!(backend.live_document_listeners(), 1);
        assert_eq!(backend.watched_keys(), vec![key]);

        handle.cancel();
        assert_eq!(backend.live_document_listeners(), 0);
        assert_eq!(backend.document_subscriptions_opened(), 1);
        assert_eq!(backend.document_subscriptions_cancelled(), 1);
        assert_eq!(backend.peak_document_listeners(), 1);
    }

    #[test]
    fn injected_failures_apply_once() {
        let backend = MemoryBackend::new();
        let key = UserKey::new("a");
        let (_events, emit) = recorder();
        backend.fail_next_document_subscription(TransportError::Disconnected);

        let first = backend.on_document_snapshot(
            "Users",
            &key,
            DocumentSink::from_fn(SubscriptionId::new(), key.clone(), emit.clone()),
        );
        assert_eq!(first.unwrap_err(), TransportError::Disconnected);

        let second = backend.on_document_snapshot(
            "Users",
            &key,
            DocumentSink::from_fn(SubscriptionId::new(), key.clone(), emit),
        );
        assert!(second.is_ok());
    }

    #[test]
    fn error_channel_reaches_auth_listeners() {
        let backend = MemoryBackend::new();
        let (events, emit) = recorder();
        let _handle = backend
            .on_auth_state_changed(AuthSink::from_fn(SubscriptionId::new(), emit))
            .unwrap();

        backend.fail_auth_listeners(TransportError::backend("auth/network-request-failed", "offline"));

        let events = events.lock().unwrap();
        assert!(matches!(events.last(), Some(TransportEvent::Failed { .. })));
    }
}
