// SPDX-License-Identifier: MPL-2.0
//! External observability port.

use crate::diagnostics::AppStateEvent;
use crate::domain::session::UserContext;

/// Fire-and-forget sink for who the current user is.
///
/// Implementations must not block and must swallow their own failures.
pub trait DiagnosticsSink: Send + Sync {
    /// Reports the current user; `None` marks the session as anonymous.
    fn set_current_user(&self, user: Option<UserContext>);

    /// Reports a session lifecycle milestone. Ignored by default.
    fn record_state(&self, _state: AppStateEvent) {}
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl DiagnosticsSink for NullDiagnostics {
    fn set_current_user(&self, _user: Option<UserContext>) {}
}
