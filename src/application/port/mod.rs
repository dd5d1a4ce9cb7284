// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! The session core never talks to a backend SDK directly. Adapters
//! implement these traits and push results back through the sinks they are
//! handed when a subscription is opened.
//!
//! # Available Ports
//!
//! - [`auth`]: authentication-state listener
//! - [`document`]: per-document snapshot listener
//! - [`diagnostics`]: external observability sink
//!
//! # Design Notes
//!
//! - Opening a subscription never blocks; results arrive later as
//!   [`TransportEvent`]s tagged with the [`SubscriptionId`] they belong to
//! - Every open subscription is represented by a [`SubscriptionHandle`];
//!   cancelling or dropping the handle ends the subscription
//! - Errors cross this boundary as [`TransportError`](crate::error::TransportError)
//!   and are normalized into [`Failure`](crate::domain::error::Failure) by the caller

pub mod auth;
pub mod diagnostics;
pub mod document;

use crate::domain::session::{Document, UserKey};
use crate::error::TransportError;
use std::fmt;
use std::sync::Arc;

pub use auth::{AuthSink, AuthTransport};
pub use diagnostics::{DiagnosticsSink, NullDiagnostics};
pub use document::{DocumentSink, DocumentTransport};

/// Identifies one subscription for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new unique subscription ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Something a transport observed on behalf of a subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Authentication state changed; `None` means nobody is signed in.
    AuthStateChanged {
        subscription: SubscriptionId,
        key: Option<UserKey>,
    },
    /// Latest contents of a watched document; `None` if it does not exist.
    DocumentSnapshot {
        subscription: SubscriptionId,
        key: UserKey,
        document: Option<Document>,
    },
    /// The subscription's error channel fired.
    Failed {
        subscription: SubscriptionId,
        error: TransportError,
    },
}

impl TransportEvent {
    #[must_use]
    pub fn subscription(&self) -> SubscriptionId {
        match self {
            Self::AuthStateChanged { subscription, .. }
            | Self::DocumentSnapshot { subscription, .. }
            | Self::Failed { subscription, .. } => *subscription,
        }
    }
}

/// Where sinks deliver events. Provided by whoever opens the subscription.
pub type EventEmitter = Arc<dyn Fn(TransportEvent) + Send + Sync>;

/// Ownership token for a live subscription.
///
/// Cancelling consumes the handle; dropping it cancels as well, so a
/// subscription cannot outlive the table that stores its handle.
pub struct SubscriptionHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionHandle {
    /// Wraps the transport's cancellation routine.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to cancel.
    #[must_use]
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Ends the subscription.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("live", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handle(counter: &Arc<AtomicUsize>) -> SubscriptionHandle {
        let counter = Arc::clone(counter);
        SubscriptionHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn subscription_ids_are_unique() {
        assert_ne!(SubscriptionId::new(), SubscriptionId::new());
    }

    #[test]
    fn cancel_runs_exactly_once() {
        let cancelled = Arc::new(AtomicUsize::new(0));
        counting_handle(&cancelled).cancel();
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_a_handle_cancels_it() {
        let cancelled = Arc::new(AtomicUsize::new(0));
        drop(counting_handle(&cancelled));
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn noop_handle_does_nothing() {
        SubscriptionHandle::noop().cancel();
        assert!(format!("{:?}", SubscriptionHandle::noop()).contains("live: false"));
    }

    #[test]
    fn event_reports_its_subscription() {
        let id = SubscriptionId::new();
        let event = TransportEvent::Failed {
            subscription: id,
            error: TransportError::Disconnected,
        };
        assert_eq!(event.subscription(), id);
    }
}
