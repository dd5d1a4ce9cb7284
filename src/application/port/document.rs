// SPDX-License-Identifier: MPL-2.0
//! Document snapshot port.

use super::{EventEmitter, SubscriptionHandle, SubscriptionId, TransportEvent};
use crate::domain::session::{Document, UserKey};
use crate::error::TransportError;
use std::sync::Arc;

/// Receives snapshots of one watched document.
#[derive(Clone)]
pub struct DocumentSink {
    subscription: SubscriptionId,
    key: UserKey,
    emit: EventEmitter,
}

impl DocumentSink {
    pub fn new(subscription: SubscriptionId, key: UserKey, emit: EventEmitter) -> Self {
        Self {
            subscription,
            key,
            emit,
        }
    }

    /// Builds a sink from a plain closure.
    pub fn from_fn(
        subscription: SubscriptionId,
        key: UserKey,
        emit: impl Fn(TransportEvent) + Send + Sync + 'static,
    ) -> Self {
        Self::new(subscription, key, Arc::new(emit))
    }

    #[must_use]
    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    /// Key of the watched document.
    #[must_use]
    pub fn key(&self) -> &UserKey {
        &self.key
    }

    /// Delivers the latest contents (`None` if the document does not exist).
    pub fn snapshot(&self, document: Option<Document>) {
        (self.emit)(TransportEvent::DocumentSnapshot {
            subscription: self.subscription,
            key: self.key.clone(),
            document,
        });
    }

    /// Reports an error on the subscription's error channel.
    pub fn fail(&self, error: TransportError) {
        (self.emit)(TransportEvent::Failed {
            subscription: self.subscription,
            error,
        });
    }
}

impl std::fmt::Debug for DocumentSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSink")
            .field("subscription", &self.subscription)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Listens for changes to single documents.
///
/// # Contract
///
/// Implementations must:
/// - Deliver the document's current contents soon after registration
/// - Deliver a full snapshot after every change until the handle is cancelled
/// - Never block the caller while registering
///
/// Snapshots already in flight when a handle is cancelled may still arrive;
/// consumers are expected to drop them by subscription ID.
pub trait DocumentTransport: Send + Sync {
    /// Registers `sink` for snapshots of `collection/key`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the listener cannot be registered.
    fn on_document_snapshot(
        &self,
        collection: &str,
        key: &UserKey,
        sink: DocumentSink,
    ) -> Result<SubscriptionHandle, TransportError>;
}
