// SPDX-License-Identifier: MPL-2.0
//! Core alert data structures.

use crate::config::defaults::{INFO_DISMISS_SECS, WARNING_DISMISS_SECS};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Unique identifier for an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertId(u64);

impl AlertId {
    /// Creates a new unique alert ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AlertId {
    fn default() -> Self {
        Self::new()
    }
}

/// Severity level determines display duration and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational message (3s).
    Info,
    /// Warning that doesn't block anything (5s).
    Warning,
    /// Error requiring attention (manual dismiss).
    Error,
}

impl Severity {
    /// Returns the auto-dismiss duration for this severity.
    /// Returns `None` for errors (manual dismiss required).
    #[must_use]
    pub fn auto_dismiss_duration(self) -> Option<Duration> {
        match self {
            Severity::Info => Some(Duration::from_secs(INFO_DISMISS_SECS)),
            Severity::Warning => Some(Duration::from_secs(WARNING_DISMISS_SECS)),
            Severity::Error => None,
        }
    }
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    id: AlertId,
    severity: Severity,
    /// Already-localized text.
    text: String,
    created_at: DateTime<Utc>,
    /// Overrides the severity default when set.
    custom_dismiss_duration: Option<Duration>,
}

impl Alert {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            id: AlertId::new(),
            severity,
            text: text.into(),
            created_at: Utc::now(),
            custom_dismiss_duration: None,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Severity::Error, text)
    }

    /// Sets a custom auto-dismiss duration, overriding the severity default.
    ///
    /// This also makes an error alert expire on its own.
    #[must_use]
    pub fn auto_dismiss(mut self, duration: Duration) -> Self {
        self.custom_dismiss_duration = Some(duration);
        self
    }

    #[must_use]
    pub fn id(&self) -> AlertId {
        self.id
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the alert has been on screen long enough to go away at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let Some(limit) = self
            .custom_dismiss_duration
            .or_else(|| self.severity.auto_dismiss_duration())
        else {
            return false;
        };
        // A clock that went backwards counts as no time elapsed.
        let age = (now - self.created_at).to_std().unwrap_or_default();
        age >= limit
    }
}
