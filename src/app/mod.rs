// SPDX-License-Identifier: MPL-2.0
//! Application root: owns the session context and drives the synchronizer.
//!
//! Transports never touch state directly. They push events into a channel
//! owned by [`App`], and the app applies them one at a time, either on demand
//! with [`App::process_pending`] or continuously with [`App::run`].
//!
//! # Example
//!
//! ```
//! use session_shell::app::App;
//! use session_shell::application::port::NullDiagnostics;
//! use session_shell::config::Config;
//! use session_shell::domain::session::UserKey;
//! use session_shell::i18n::Translator;
//! use session_shell::infrastructure::MemoryBackend;
//! use std::sync::Arc;
//!
//! let backend = MemoryBackend::new();
//! let mut app = App::new(
//!     &Config::default(),
//!     Arc::new(Translator::load_embedded().unwrap()),
//!     Arc::new(backend.clone()),
//!     Arc::new(backend.clone()),
//!     Arc::new(NullDiagnostics),
//! );
//!
//! app.start();
//! backend.sign_in(UserKey::new("uid-1"));
//! app.process_pending();
//!
//! assert!(!app.is_loading());
//! assert!(app.session().is_authenticated());
//! ```

mod context;
mod message;
mod subscription;
mod update;

pub use context::Context;
pub use message::Message;
pub use subscription::{SharedSubscriptions, Slot, SubscriptionTable};
pub use update::Synchronizer;

use crate::application::port::{AuthTransport, DiagnosticsSink, DocumentTransport};
use crate::application::ErrorService;
use crate::config::Config;
use crate::diagnostics::DiagnosticsCollector;
use crate::domain::session::SessionState;
use crate::i18n::Translator;
use crate::ui::notifications::Manager;
use std::fmt;
use std::sync::{Arc, MutexGuard};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Stops an [`App`]. Cheap to clone and safe to send across threads.
#[derive(Debug, Clone)]
pub struct Teardown {
    subscriptions: SharedSubscriptions,
    sender: UnboundedSender<Message>,
}

impl Teardown {
    /// Cancels every live subscription right away, then asks the app loop
    /// to finish. Events already queued can no longer open anything.
    pub fn teardown(self) {
        self.subscriptions.lock().close();
        // Nothing to stop once the app is gone.
        let _ = self.sender.send(Message::Shutdown);
    }
}

pub struct App {
    context: Context,
    synchronizer: Synchronizer,
    receiver: UnboundedReceiver<Message>,
    sender: UnboundedSender<Message>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("context", &self.context)
            .field("synchronizer", &self.synchronizer)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Wires the context and synchronizer. Nothing is subscribed until
    /// [`App::start`].
    pub fn new(
        config: &Config,
        translator: Arc<Translator>,
        auth: Arc<dyn AuthTransport>,
        documents: Arc<dyn DocumentTransport>,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        let (sender, receiver) = unbounded_channel();
        let context = Context::new(
            ErrorService::new(translator),
            Manager::with_max_visible(config.max_visible_alerts()),
            diagnostics,
        );
        let synchronizer =
            Synchronizer::new(auth, documents, config.users_collection(), sender.clone());

        Self {
            context,
            synchronizer,
            receiver,
            sender,
        }
    }

    /// Like [`App::new`], reporting to a fresh [`DiagnosticsCollector`].
    ///
    /// The collector's buffer is sized from `config`, and it receives the
    /// current user as well as every warning and error alert.
    pub fn with_collector(
        config: &Config,
        translator: Arc<Translator>,
        auth: Arc<dyn AuthTransport>,
        documents: Arc<dyn DocumentTransport>,
    ) -> (Self, DiagnosticsCollector) {
        let collector = DiagnosticsCollector::new(config.diagnostics_capacity());
        let mut app = Self::new(config, translator, auth, documents, Arc::new(collector.handle()));
        app.context.alerts.set_diagnostics(collector.handle());
        (app, collector)
    }

    /// Begins listening for auth changes. Idempotent.
    pub fn start(&mut self) -> Teardown {
        self.synchronizer.start(&mut self.context);
        Teardown {
            subscriptions: self.synchronizer.shared_subscriptions(),
            sender: self.sender.clone(),
        }
    }

    /// Applies every queued message without waiting for new ones.
    ///
    /// Returns `false` once a shutdown was processed.
    pub fn process_pending(&mut self) -> bool {
        while let Ok(message) = self.receiver.try_recv() {
            if !self.update(message) {
                return false;
            }
        }
        true
    }

    /// Applies messages as they arrive until shut down.
    pub async fn run(&mut self) {
        while let Some(message) = self.receiver.recv().await {
            if !self.update(message) {
                break;
            }
        }
    }

    fn update(&mut self, message: Message) -> bool {
        match message {
            Message::Transport(event) => {
                self.synchronizer.handle_event(&mut self.context, event);
                true
            }
            Message::Shutdown => {
                self.shutdown();
                false
            }
        }
    }

    /// Cancels every live subscription right away.
    pub fn shutdown(&mut self) {
        self.synchronizer.stop(&mut self.context);
    }

    /// True until the initial auth state is known.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.synchronizer.is_loading()
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.context.session
    }

    #[must_use]
    pub fn alerts(&self) -> &Manager {
        &self.context.alerts
    }

    pub fn alerts_mut(&mut self) -> &mut Manager {
        &mut self.context.alerts
    }

    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    pub fn subscriptions(&self) -> MutexGuard<'_, SubscriptionTable> {
        self.synchronizer.subscriptions()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
