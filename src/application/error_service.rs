// SPDX-License-Identifier: MPL-2.0
//! Classification and reporting of caught failures.
//!
//! Every failure handed to [`ErrorService::handle`] produces exactly one
//! error alert in the user's language. The service cannot fail: unknown
//! failure shapes become [`ErrorKind::Unknown`], and a message missing from
//! every dictionary is replaced by built-in English text.

use crate::domain::error::{ErrorKind, Failure};
use crate::domain::session::LanguageTag;
use crate::i18n::Translator;
use crate::ui::notifications::{Alert, Manager, Severity};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ErrorService {
    translator: Arc<Translator>,
    current_locale: LanguageTag,
}

impl ErrorService {
    #[must_use]
    pub fn new(translator: Arc<Translator>) -> Self {
        Self {
            translator,
            current_locale: LanguageTag::DEFAULT,
        }
    }

    /// Language alerts are currently written in.
    #[must_use]
    pub fn current_locale(&self) -> LanguageTag {
        self.current_locale
    }

    pub fn set_locale(&mut self, locale: LanguageTag) {
        self.current_locale = locale;
    }

    /// Classifies `failure`, first adopting `locale_override` if given.
    ///
    /// The override sticks: later calls without one keep using it.
    pub fn classify(&mut self, failure: &Failure, locale_override: Option<LanguageTag>) -> ErrorKind {
        if let Some(locale) = locale_override {
            self.current_locale = locale;
        }
        failure.kind()
    }

    /// Localized text for `kind` in the current language.
    #[must_use]
    pub fn message_for(&self, kind: ErrorKind) -> String {
        self.translator
            .lookup(self.current_locale, kind.i18n_key())
            .unwrap_or_else(|| kind.fallback_message())
            .to_string()
    }

    /// Classifies `failure` and pushes one error alert describing it.
    pub fn handle(
        &mut self,
        failure: impl Into<Failure>,
        locale_override: Option<LanguageTag>,
        alerts: &mut Manager,
    ) -> Alert {
        let failure = failure.into();
        let kind = self.classify(&failure, locale_override);
        tracing::warn!(%kind, %failure, locale = %self.current_locale, "reporting failure to user");
        alerts.push(Severity::Error, self.message_for(kind))
    }
}
