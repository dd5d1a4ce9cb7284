// SPDX-License-Identifier: MPL-2.0
//! Local mirror of the backend session.

use super::{Identity, LanguageTag};

/// Who is signed in and which language the interface uses.
///
/// Only the session synchronizer writes to this; everything else reads.
/// Each write replaces identity and language together, so readers never see
/// one updated without the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    identity: Option<Identity>,
    language: LanguageTag,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current_identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn current_language(&self) -> LanguageTag {
        self.language
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Mirrors a freshly received identity and its resolved language.
    pub(crate) fn apply(&mut self, identity: Identity, language: LanguageTag) {
        self.identity = Some(identity);
        self.language = language;
    }

    /// Returns to the anonymous state.
    pub(crate) fn clear(&mut self) {
        self.identity = None;
        self.language = LanguageTag::DEFAULT;
    }
}
