// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::session::UserContext;

/// Lifecycle milestones of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppStateEvent {
    /// The auth subscription was opened.
    SessionStarted,
    /// A user became authenticated.
    SignedIn,
    /// The backend reported that nobody is authenticated.
    SignedOut,
    /// All subscriptions were torn down.
    SessionStopped,
}

/// A warning shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarningEvent {
    pub message: String,
}

impl WarningEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An error shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEvent {
    pub message: String,
}

impl ErrorEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A single captured event.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticEvent {
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
        }
    }
}

/// The type and associated data for a diagnostic event.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    /// The current user changed; `None` means anonymous.
    UserChanged { user: Option<UserContext> },
    /// Session lifecycle milestone.
    AppState { state: AppStateEvent },
    Warning { event: WarningEvent },
    Error { event: ErrorEvent },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = DiagnosticEvent::new(DiagnosticEventKind::AppState {
            state: AppStateEvent::SignedIn,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"]["type"], "app_state");
        assert_eq!(json["kind"]["state"], "signed_in");
    }

    #[test]
    fn anonymous_user_serializes_as_null() {
        let kind = DiagnosticEventKind::UserChanged { user: None };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "user_changed");
        assert!(json["user"].is_null());
    }

    #[test]
    fn user_context_omits_missing_fields() {
        let kind = DiagnosticEventKind::UserChanged {
            user: Some(UserContext {
                id: "uid".to_string(),
                username: None,
                email: Some("a@b.c".to_string()),
                language: "fr".to_string(),
            }),
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert!(json["user"].get("username").is_none());
        assert_eq!(json["user"]["email"], "a@b.c");
        assert_eq!(json["user"]["language"], "fr");
    }
}
