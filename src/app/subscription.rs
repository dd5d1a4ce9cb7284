// SPDX-License-Identifier: MPL-2.0
//! Bookkeeping for the subscriptions the session keeps open.
//!
//! The table holds at most one subscription per [`Slot`]. Replacing a slot
//! cancels whatever was there before the new handle is stored, so two
//! document listeners are never live at once. Once closed, the table
//! cancels anything handed to it.

use crate::application::port::{SubscriptionHandle, SubscriptionId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The places a live subscription can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Outer listener on authentication state.
    Auth,
    /// Nested listener on the signed-in user's document.
    Document,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth => f.write_str("auth"),
            Self::Document => f.write_str("document"),
        }
    }
}

#[derive(Debug, Default)]
pub struct SubscriptionTable {
    slots: HashMap<Slot, (SubscriptionId, SubscriptionHandle)>,
    closed: bool,
}

impl SubscriptionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `handle` in `slot`, cancelling the previous occupant first.
    ///
    /// Returns `false` (and cancels `handle`) when the table is closed.
    pub fn replace(&mut self, slot: Slot, id: SubscriptionId, handle: SubscriptionHandle) -> bool {
        self.cancel(slot);
        if self.closed {
            handle.cancel();
            tracing::debug!(%slot, subscription = %id, "table closed, subscription dropped");
            return false;
        }
        self.slots.insert(slot, (id, handle));
        true
    }

    /// Cancels the subscription in `slot`. Returns its id if there was one.
    pub fn cancel(&mut self, slot: Slot) -> Option<SubscriptionId> {
        let (id, handle) = self.slots.remove(&slot)?;
        handle.cancel();
        tracing::debug!(%slot, subscription = %id, "subscription cancelled");
        Some(id)
    }

    /// Whether `id` is the subscription currently stored in `slot`.
    #[must_use]
    pub fn is_current(&self, slot: Slot, id: SubscriptionId) -> bool {
        self.slots.get(&slot).is_some_and(|(current, _)| *current == id)
    }

    /// Slot occupied by `id`, if it is still live.
    #[must_use]
    pub fn slot_of(&self, id: SubscriptionId) -> Option<Slot> {
        self.slots
            .iter()
            .find_map(|(slot, (current, _))| (*current == id).then_some(*slot))
    }

    #[must_use]
    pub fn is_live(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.len()
    }

    /// Cancels the nested subscription before the outer one.
    pub fn cancel_all(&mut self) {
        self.cancel(Slot::Document);
        self.cancel(Slot::Auth);
    }

    /// Cancels everything and refuses later subscriptions.
    pub fn close(&mut self) {
        self.closed = true;
        self.cancel_all();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// A [`SubscriptionTable`] shared between the synchronizer and teardown
/// tokens, which may live on other threads.
#[derive(Debug, Clone, Default)]
pub struct SharedSubscriptions(Arc<Mutex<SubscriptionTable>>);

impl SharedSubscriptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the table. A poisoned lock still yields the table.
    pub fn lock(&self) -> MutexGuard<'_, SubscriptionTable> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
