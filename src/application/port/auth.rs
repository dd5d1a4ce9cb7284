// SPDX-License-Identifier: MPL-2.0
//! Authentication-state port.

use super::{EventEmitter, SubscriptionHandle, SubscriptionId, TransportEvent};
use crate::domain::session::UserKey;
use crate::error::TransportError;
use std::sync::Arc;

/// Receives auth-state changes for one subscription.
#[derive(Clone)]
pub struct AuthSink {
    subscription: SubscriptionId,
    emit: EventEmitter,
}

impl AuthSink {
    pub fn new(subscription: SubscriptionId, emit: EventEmitter) -> Self {
        Self { subscription, emit }
    }

    /// Builds a sink from a plain closure.
    pub fn from_fn(
        subscription: SubscriptionId,
        emit: impl Fn(TransportEvent) + Send + Sync + 'static,
    ) -> Self {
        Self::new(subscription, Arc::new(emit))
    }

    #[must_use]
    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    /// Reports who is signed in now (`None` when nobody is).
    pub fn auth_state_changed(&self, key: Option<UserKey>) {
        (self.emit)(TransportEvent::AuthStateChanged {
            subscription: self.subscription,
            key,
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

impl std::fmt::Debug for AuthSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSink")
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

/// Listens for authentication-state changes.
///
/// # Contract
///
/// Implementations must:
/// - Report the current state to a new listener soon after registration
/// - Report every later change, in order, until the handle is cancelled
/// - Report a lost connection as "nobody signed in" or on the error channel
/// - Never block the caller while registering
pub trait AuthTransport: Send + Sync {
    /// Registers `sink` for auth-state changes.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the listener cannot be registered.
    fn on_auth_state_changed(&self, sink: AuthSink) -> Result<SubscriptionHandle, TransportError>;
}
