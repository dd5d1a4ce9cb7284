// SPDX-License-Identifier: MPL-2.0
//! Shared state the session synchronizer writes and the rest of the
//! application reads.

use crate::application::port::DiagnosticsSink;
use crate::application::ErrorService;
use crate::domain::error::Failure;
use crate::domain::session::SessionState;
use crate::ui::notifications::{Alert, Manager};
use std::sync::Arc;

/// Owned by [`App`](super::App) and lent out by `&mut` to whoever mutates it.
pub struct Context {
    pub session: SessionState,
    pub errors: ErrorService,
    pub alerts: Manager,
    pub diagnostics: Arc<dyn DiagnosticsSink>,
}

impl Context {
    #[must_use]
    pub fn new(errors: ErrorService, alerts: Manager, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            session: SessionState::new(),
            errors,
            alerts,
            diagnostics,
        }
    }

    /// Shows `failure` to the user in the current language.
    pub fn report(&mut self, failure: impl Into<Failure>) -> Alert {
        self.errors.handle(failure, None, &mut self.alerts)
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("session", &self.session)
            .field("errors", &self.errors)
            .field("alerts", &self.alerts.len())
            .finish_non_exhaustive()
    }
}
