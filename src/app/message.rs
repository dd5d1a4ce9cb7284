// SPDX-License-Identifier: MPL-2.0
//! Messages consumed by the application loop.

use crate::application::port::TransportEvent;

/// Everything the application reacts to. Drained one at a time, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Something a transport observed.
    Transport(TransportEvent),
    /// Stop listening and cancel every live subscription.
    Shutdown,
}

impl From<TransportEvent> for Message {
    fn from(event: TransportEvent) -> Self {
        Self::Transport(event)
    }
}
