// SPDX-License-Identifier: MPL-2.0
//! Session synchronization.
//!
//! Listens for authentication changes and, while someone is signed in,
//! keeps one nested listener on that user's document. Every event is
//! applied to the [`Context`] before the next one is looked at.
//!
//! # Stale snapshots
//!
//! Transports may still deliver a snapshot after its subscription was
//! cancelled. Each event carries the [`SubscriptionId`] it was sent for, and
//! only events for the subscriptions currently held in the
//! [`SubscriptionTable`] are applied.

use super::context::Context;
use super::message::Message;
use super::subscription::{SharedSubscriptions, Slot, SubscriptionTable};
use crate::application::port::{
    AuthSink, AuthTransport, DocumentSink, DocumentTransport, EventEmitter, SubscriptionId,
    TransportEvent,
};
use crate::diagnostics::AppStateEvent;
use crate::domain::session::{Document, Identity, LanguageTag, UserContext, UserKey};
use crate::error::TransportError;
use crate::i18n::resolve_language;
use std::sync::{Arc, MutexGuard};
use tokio::sync::mpsc::UnboundedSender;

/// Keeps the session state in step with the auth and document transports.
pub struct Synchronizer {
    auth: Arc<dyn AuthTransport>,
    documents: Arc<dyn DocumentTransport>,
    users_collection: String,
    sender: UnboundedSender<Message>,
    subscriptions: SharedSubscriptions,
    started: bool,
    stopped: bool,
    loading: bool,
}

impl Synchronizer {
    pub fn new(
        auth: Arc<dyn AuthTransport>,
        documents: Arc<dyn DocumentTransport>,
        users_collection: impl Into<String>,
        sender: UnboundedSender<Message>,
    ) -> Self {
        Self {
            auth,
            documents,
            users_collection: users_collection.into(),
            sender,
            subscriptions: SharedSubscriptions::new(),
            started: false,
            stopped: false,
            loading: true,
        }
    }

    /// True until the first auth event (or wiring failure) was handled.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn subscriptions(&self) -> MutexGuard<'_, SubscriptionTable> {
        self.subscriptions.lock()
    }

    /// Handle on the subscription table for teardown tokens.
    #[must_use]
    pub fn shared_subscriptions(&self) -> SharedSubscriptions {
        self.subscriptions.clone()
    }

    fn emitter(&self) -> EventEmitter {
        let sender = self.sender.clone();
        Arc::new(move |event: TransportEvent| {
            // The receiver only goes away with the application.
            let _ = sender.send(Message::Transport(event));
        })
    }

    /// Opens the auth subscription. Calling it again does nothing.
    pub fn start(&mut self, ctx: &mut Context) {
        if self.started {
            tracing::debug!("session already started");
            return;
        }
        self.started = true;

        let id = SubscriptionId::new();
        match self.auth.on_auth_state_changed(AuthSink::new(id, self.emitter())) {
            Ok(handle) => {
                if self.subscriptions.lock().replace(Slot::Auth, id, handle) {
                    ctx.diagnostics.record_state(AppStateEvent::SessionStarted);
                    tracing::info!(subscription = %id, "listening for auth state");
                }
            }
            Err(error) => self.wiring_failed(ctx, Slot::Auth, error),
        }
    }

    /// Cancels every live subscription. Nothing is opened afterwards.
    pub fn stop(&mut self, ctx: &mut Context) {
        self.subscriptions.lock().close();
        if self.started && !self.stopped {
            self.stopped = true;
            ctx.diagnostics.record_state(AppStateEvent::SessionStopped);
            tracing::info!("session stopped");
        }
    }

    /// Applies one transport event to `ctx`.
    pub fn handle_event(&mut self, ctx: &mut Context, event: TransportEvent) {
        match event {
            TransportEvent::AuthStateChanged { subscription, key } => {
                if !self.subscriptions.lock().is_current(Slot::Auth, subscription) {
                    tracing::debug!(%subscription, "dropping auth event from closed subscription");
                    return;
                }
                match key {
                    Some(key) => self.signed_in(ctx, key),
                    None => self.signed_out(ctx),
                }
                self.finish_loading();
            }
            TransportEvent::DocumentSnapshot {
                subscription,
                key,
                document,
            } => {
                if !self.subscriptions.lock().is_current(Slot::Document, subscription) {
                    tracing::debug!(%subscription, %key, "dropping stale document snapshot");
                    return;
                }
                Self::apply_snapshot(ctx, key, document);
            }
            TransportEvent::Failed {
                subscription,
                error,
            } => {
                let slot = self.subscriptions.lock().slot_of(subscription);
                let Some(slot) = slot else {
                    tracing::debug!(%subscription, %error, "dropping error from closed subscription");
                    return;
                };
                tracing::warn!(%slot, %subscription, %error, "subscription reported an error");
                ctx.report(error);
                if slot == Slot::Auth {
                    self.finish_loading();
                }
            }
        }
    }

    fn signed_in(&mut self, ctx: &mut Context, key: UserKey) {
        // The old listener must be gone before the next one can fire.
        self.subscriptions.lock().cancel(Slot::Document);

        let id = SubscriptionId::new();
        let sink = DocumentSink::new(id, key.clone(), self.emitter());
        match self
            .documents
            .on_document_snapshot(&self.users_collection, &key, sink)
        {
            Ok(handle) => {
                if self.subscriptions.lock().replace(Slot::Document, id, handle) {
                    ctx.diagnostics.record_state(AppStateEvent::SignedIn);
                    tracing::info!(%key, subscription = %id, collection = %self.users_collection, "watching user document");
                }
            }
            Err(error) => {
                // Nothing will ever deliver this user's document, so drop
                // whatever the previous user left behind.
                Self::apply_identity(ctx, Identity::bare(key));
                self.wiring_failed(ctx, Slot::Document, error);
            }
        }
    }

    fn signed_out(&mut self, ctx: &mut Context) {
        self.subscriptions.lock().cancel(Slot::Document);
        ctx.session.clear();
        ctx.errors.set_locale(LanguageTag::DEFAULT);
        ctx.diagnostics.set_current_user(None);
        ctx.diagnostics.record_state(AppStateEvent::SignedOut);
        tracing::info!("no user signed in");
    }

    fn apply_snapshot(ctx: &mut Context, key: UserKey, document: Option<Document>) {
        let identity = match document {
            Some(document) => match Identity::from_document(key.clone(), &document) {
                Ok(identity) => identity,
                Err(error) => {
                    tracing::warn!(%key, %error, "unreadable user document");
                    ctx.report(error);
                    return;
                }
            },
            None => {
                tracing::debug!(%key, "user document does not exist");
                Identity::bare(key)
            }
        };
        Self::apply_identity(ctx, identity);
    }

    fn apply_identity(ctx: &mut Context, identity: Identity) {
        let language = resolve_language(identity.language());
        ctx.errors.set_locale(language);
        ctx.diagnostics
            .set_current_user(Some(UserContext::for_identity(&identity, language)));
        tracing::debug!(key = %identity.key(), %language, "session updated");
        ctx.session.apply(identity, language);
    }

    fn wiring_failed(&mut self, ctx: &mut Context, slot: Slot, error: TransportError) {
        tracing::warn!(%slot, %error, "could not open subscription");
        ctx.report(error);
        self.finish_loading();
    }

    fn finish_loading(&mut self) {
        if self.loading {
            self.loading = false;
            tracing::debug!("initial auth state known");
        }
    }
}

impl std::fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("users_collection", &self.users_collection)
            .field("subscriptions", &self.subscriptions)
            .field("started", &self.started)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::NullDiagnostics;
    use crate::application::ErrorService;
    use crate::domain::error::ErrorKind;
    use crate::i18n::Translator;
    use crate::infrastructure::MemoryBackend;
    use crate::ui::notifications::Manager;
    use serde_json::json;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    struct Harness {
        backend: MemoryBackend,
        sync: Synchronizer,
        ctx: Context,
        rx: UnboundedReceiver<Message>,
    }

    impl Harness {
        fn new() -> Self {
            let backend = MemoryBackend::new();
            let (tx, rx) = unbounded_channel();
            let translator = Arc::new(Translator::load_embedded().unwrap());
            let sync = Synchronizer::new(
                Arc::new(backend.clone()),
                Arc::new(backend.clone()),
                "Users",
                tx,
            );
            let ctx = Context::new(
                ErrorService::new(translator),
                Manager::new(),
                Arc::new(NullDiagnostics),
            );
            Self {
                backend,
                sync,
                ctx,
                rx,
            }
        }

        fn drain(&mut self) {
            while let Ok(message) = self.rx.try_recv() {
                if let Message::Transport(event) = message {
                    self.sync.handle_event(&mut self.ctx, event);
                }
            }
        }
    }

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn start_is_idempotent() {
        let mut h = Harness::new();
        h.sync.start(&mut h.ctx);
        h.sync.start(&mut h.ctx);
        assert_eq!(h.backend.live_auth_listeners(), 1);
    }

    #[test]
    fn sign_in_mirrors_document_and_language() {
        let mut h = Harness::new();
        h.backend
            .put_document("Users", UserKey::new("a"), doc(json!({ "name": "Ada", "language": "fr" })));
        h.backend.sign_in(UserKey::new("a"));

        h.sync.start(&mut h.ctx);
        h.drain();

        assert!(!h.sync.is_loading());
        assert_eq!(h.ctx.session.current_identity().and_then(Identity::name), Some("Ada"));
        assert_eq!(h.ctx.session.current_language(), LanguageTag::Fr);
        assert_eq!(h.ctx.errors.current_locale(), LanguageTag::Fr);
    }

    #[test]
    fn unreadable_document_is_reported_and_state_kept() {
        let mut h = Harness::new();
        h.backend
            .put_document("Users", UserKey::new("a"), doc(json!({ "email": 7 })));
        h.backend.sign_in(UserKey::new("a"));

        h.sync.start(&mut h.ctx);
        h.drain();

        assert!(!h.ctx.session.is_authenticated());
        assert_eq!(h.ctx.alerts.len(), 1);
        assert_eq!(
            h.ctx.alerts.last().map(|a| a.text().to_string()),
            Some(h.ctx.errors.message_for(ErrorKind::Unknown))
        );
    }

    #[test]
    fn errors_from_closed_subscriptions_are_ignored() {
        let mut h = Harness::new();
        h.backend.sign_in(UserKey::new("a"));
        h.sync.start(&mut h.ctx);
        h.drain();

        h.sync.handle_event(
            &mut h.ctx,
            TransportEvent::Failed {
                subscription: SubscriptionId::new(),
                error: TransportError::Disconnected,
            },
        );
        assert!(h.ctx.alerts.is_empty());
    }

    #[test]
    fn stop_cancels_everything_once() {
        let mut h = Harness::new();
        h.backend.sign_in(UserKey::new("a"));
        h.sync.start(&mut h.ctx);
        h.drain();
        assert_eq!(h.sync.subscriptions().live_count(), 2);

        h.sync.stop(&mut h.ctx);
        h.sync.stop(&mut h.ctx);

        assert_eq!(h.backend.live_auth_listeners(), 0);
        assert_eq!(h.backend.live_document_listeners(), 0);
    }

    #[test]
    fn closing_the_shared_table_drops_queued_auth_events() {
        let mut h = Harness::new();
        h.sync.start(&mut h.ctx);
        h.drain();

        h.backend.sign_in(UserKey::new("a"));
        h.sync.shared_subscriptions().lock().close();
        assert_eq!(h.backend.live_auth_listeners(), 0);

        h.drain();
        assert!(!h.ctx.session.is_authenticated());
        assert_eq!(h.backend.document_subscriptions_opened(), 0);
    }

    #[test]
    fn failed_switch_resets_language_to_default() {
        let mut h = Harness::new();
        h.backend
            .put_document("Users", UserKey::new("a"), doc(json!({ "name": "Ada", "language": "es" })));
        h.backend.sign_in(UserKey::new("a"));
        h.sync.start(&mut h.ctx);
        h.drain();
        assert_eq!(h.ctx.errors.current_locale(), LanguageTag::Es);

        h.backend
            .fail_next_document_subscription(TransportError::Disconnected);
        h.backend.sign_in(UserKey::new("b"));
        h.drain();

        let identity = h.ctx.session.current_identity().unwrap();
        assert_eq!(identity.key().as_str(), "b");
        assert_eq!(identity.name(), None);
        assert_eq!(h.ctx.session.current_language(), LanguageTag::DEFAULT);
        assert_eq!(h.ctx.errors.current_locale(), LanguageTag::DEFAULT);
        assert_eq!(
            h.ctx.alerts.last().map(|a| a.text().to_string()),
            Some(h.ctx.errors.message_for(ErrorKind::NetworkUnavailable))
        );
    }
}
