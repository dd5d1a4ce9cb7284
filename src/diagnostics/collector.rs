// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating and storing diagnostic events.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::{channel, Receiver, Sender};

use super::{
    AppStateEvent, BufferCapacity, CircularBuffer, DiagnosticEvent, DiagnosticEventKind,
    ErrorEvent, WarningEvent,
};
use crate::application::port::DiagnosticsSink;
use crate::domain::session::UserContext;

/// Default channel capacity for event buffering.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Handle for sending diagnostic events to the collector.
///
/// Cheap to clone and safe to share across threads. Every method is
/// non-blocking: when the channel is full or the collector is gone, the
/// event is dropped.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    fn send(&self, kind: DiagnosticEventKind) {
        let _ = self.event_tx.try_send(DiagnosticEvent::new(kind));
    }

    /// Records a session lifecycle milestone.
    pub fn log_state(&self, state: AppStateEvent) {
        self.send(DiagnosticEventKind::AppState { state });
    }

    pub fn log_warning(&self, event: WarningEvent) {
        self.send(DiagnosticEventKind::Warning { event });
    }

    pub fn log_error(&self, event: ErrorEvent) {
        self.send(DiagnosticEventKind::Error { event });
    }
}

impl DiagnosticsSink for DiagnosticsHandle {
    fn set_current_user(&self, user: Option<UserContext>) {
        self.send(DiagnosticEventKind::UserChanged { user });
    }

    fn record_state(&self, state: AppStateEvent) {
        self.log_state(state);
    }
}

/// Snapshot of everything the collector holds, ready for export.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport<'a> {
    pub collection_started_at: DateTime<Utc>,
    pub current_user: Option<&'a UserContext>,
    pub events: Vec<&'a DiagnosticEvent>,
}

/// Central collector for diagnostic events.
///
/// Receives events through a channel and stores them in a memory-bounded
/// circular buffer. The most recent user context is tracked separately so
/// it survives eviction of the event that set it.
pub struct DiagnosticsCollector {
    buffer: CircularBuffer<DiagnosticEvent>,
    event_rx: Receiver<DiagnosticEvent>,
    /// Kept to create handles.
    event_tx: Sender<DiagnosticEvent>,
    current_user: Option<UserContext>,
    collection_started_at: DateTime<Utc>,
}

impl DiagnosticsCollector {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let (event_tx, event_rx) = channel(DEFAULT_CHANNEL_CAPACITY);

        Self {
            buffer: CircularBuffer::new(capacity),
            event_rx,
            event_tx,
            current_user: None,
            collection_started_at: Utc::now(),
        }
    }

    /// Creates a handle for sending events to this collector.
    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Moves every pending event from the channel into the buffer.
    ///
    /// Call this periodically (e.g., on each UI tick).
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            if let DiagnosticEventKind::UserChanged { user } = &event.kind {
                self.current_user.clone_from(user);
            }
            self.buffer.push(event);
        }
    }

    /// The user most recently reported, `None` when anonymous.
    #[must_use]
    pub fn current_user(&self) -> Option<&UserContext> {
        self.current_user.as_ref()
    }

    /// Buffered events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.buffer.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Events kept before the oldest is evicted.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    #[must_use]
    pub fn report(&self) -> DiagnosticReport<'_> {
        DiagnosticReport {
            collection_started_at: self.collection_started_at,
            current_user: self.current_user.as_ref(),
            events: self.buffer.iter().collect(),
        }
    }

    /// Serializes [`DiagnosticsCollector::report`] as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.report())
    }
}

impl std::fmt::Debug for DiagnosticsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticsCollector")
            .field("events", &self.buffer.len())
            .field("current_user", &self.current_user)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserContext {
        UserContext {
            id: id.to_string(),
            username: Some("Ada".to_string()),
            email: None,
            language: "en".to_string(),
        }
    }

    #[test]
    fn events_arrive_only_after_processing() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        collector.handle().log_state(AppStateEvent::SessionStarted);
        assert!(collector.is_empty());

        collector.process_pending();
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn set_current_user_tracks_latest_user() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        let handle = collector.handle();

        handle.set_current_user(Some(user("a")));
        handle.set_current_user(Some(user("b")));
        collector.process_pending();
        assert_eq!(collector.current_user().map(|u| u.id.as_str()), Some("b"));

        handle.set_current_user(None);
        collector.process_pending();
        assert!(collector.current_user().is_none());
    }

    #[test]
    fn current_user_survives_eviction() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::new(0));
        let handle = collector.handle();
        handle.set_current_user(Some(user("kept")));
        collector.process_pending();

        for _ in 0..40 {
            handle.log_warning(WarningEvent::new("noise"));
            collector.process_pending();
        }
        assert!(collector
            .events()
            .all(|e| !matches!(e.kind, DiagnosticEventKind::UserChanged { .. })));
        assert_eq!(collector.current_user().map(|u| u.id.as_str()), Some("kept"));
    }

    #[test]
    fn full_channel_drops_events_without_blocking() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::new(4096));
        let handle = collector.handle();
        for _ in 0..DEFAULT_CHANNEL_CAPACITY + 10 {
            handle.log_error(ErrorEvent::new("flood"));
        }
        collector.process_pending();
        assert_eq!(collector.len(), DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn handle_outliving_collector_is_harmless() {
        let collector = DiagnosticsCollector::new(BufferCapacity::default());
        let handle = collector.handle();
        drop(collector);
        handle.set_current_user(None);
        handle.log_state(AppStateEvent::SessionStopped);
    }

    #[test]
    fn report_exports_as_json() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        collector.handle().set_current_user(Some(user("uid")));
        collector.handle().log_error(ErrorEvent::new("broken"));
        collector.process_pending();

        let json: serde_json::Value = serde_json::from_str(&collector.to_json().unwrap()).unwrap();
        assert_eq!(json["current_user"]["id"], "uid");
        assert_eq!(json["events"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["events"][1]["kind"]["event"]["message"], "broken");
    }
}
