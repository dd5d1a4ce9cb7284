// SPDX-License-Identifier: MPL-2.0
//! Alert queue management.
//!
//! The `Manager` keeps alerts in the order they were pushed, decides which
//! ones are visible, and expires them when their display time is over.

use super::notification::{Alert, AlertId, Severity};
use crate::config::defaults::DEFAULT_MAX_VISIBLE_ALERTS;
use crate::diagnostics::{DiagnosticsHandle, ErrorEvent, WarningEvent};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Messages for alert state changes.
#[derive(Debug, Clone)]
pub enum Message {
    /// Dismiss a specific alert by ID.
    Dismiss(AlertId),
    /// Tick for checking auto-dismiss timers.
    Tick,
}

/// Ordered queue of alerts waiting to be shown or being shown.
#[derive(Debug)]
pub struct Manager {
    /// All alerts, oldest first.
    alerts: VecDeque<Alert>,
    max_visible: usize,
    diagnostics: Option<DiagnosticsHandle>,
}

impl Default for Manager {
    fn default() -> Self {
        Self::with_max_visible(DEFAULT_MAX_VISIBLE_ALERTS)
    }
}

impl Manager {
    /// Creates an empty queue showing the default number of alerts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty queue showing at most `max_visible` alerts (at least one).
    #[must_use]
    pub fn with_max_visible(max_visible: usize) -> Self {
        Self {
            alerts: VecDeque::new(),
            max_visible: max_visible.max(1),
            diagnostics: None,
        }
    }

    /// Sets the diagnostics handle that warnings and errors are copied to.
    pub fn set_diagnostics(&mut self, handle: DiagnosticsHandle) {
        self.diagnostics = Some(handle);
    }

    /// Appends a new alert and returns it.
    ///
    /// Every call adds exactly one alert; identical texts are not merged.
    pub fn push(&mut self, severity: Severity, text: impl Into<String>) -> Alert {
        self.push_alert(Alert::new(severity, text))
    }

    /// Appends a prepared alert (e.g. one with a custom duration).
    pub fn push_alert(&mut self, alert: Alert) -> Alert {
        if let Some(handle) = &self.diagnostics {
            match alert.severity() {
                Severity::Warning => handle.log_warning(WarningEvent::new(alert.text())),
                Severity::Error => handle.log_error(ErrorEvent::new(alert.text())),
                Severity::Info => {}
            }
        }

        self.alerts.push_back(alert.clone());
        alert
    }

    /// Dismisses an alert by its ID.
    ///
    /// Returns `true` if the alert was found. Unknown IDs are ignored.
    pub fn dismiss(&mut self, id: AlertId) -> bool {
        if let Some(pos) = self.alerts.iter().position(|a| a.id() == id) {
            self.alerts.remove(pos);
            true
        } else {
            false
        }
    }

    /// Removes visible alerts whose display time is over.
    ///
    /// Should be called periodically (e.g., every 100-500ms).
    pub fn tick(&mut self) {
        self.tick_at(Utc::now());
    }

    /// Same as [`Manager::tick`] with an explicit clock reading.
    pub fn tick_at(&mut self, now: DateTime<Utc>) {
        let expired: Vec<AlertId> = self
            .visible()
            .filter(|a| a.is_expired_at(now))
            .map(Alert::id)
            .collect();

        for id in expired {
            self.dismiss(id);
        }
    }

    pub fn handle_message(&mut self, message: &Message) {
        match message {
            Message::Dismiss(id) => {
                self.dismiss(*id);
            }
            Message::Tick => self.tick(),
        }
    }

    /// Alerts currently on screen, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().take(self.max_visible)
    }

    /// Every alert, oldest first.
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    /// The most recently pushed alert.
    #[must_use]
    pub fn last(&self) -> Option<&Alert> {
        self.alerts.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Number of alerts waiting for a free slot.
    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.alerts.len().saturating_sub(self.max_visible)
    }

    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}
