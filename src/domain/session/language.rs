// SPDX-License-Identifier: MPL-2.0
//! Supported display languages.

use std::fmt;

/// A supported display language.
///
/// The set is closed: anything the backend sends that is not listed here
/// resolves to [`LanguageTag::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageTag {
    /// English, the default language.
    #[default]
    En,
    /// French.
    Fr,
    /// Spanish.
    Es,
}

impl LanguageTag {
    /// Language used when nothing better is known.
    pub const DEFAULT: Self = Self::En;

    /// Every supported language, default first.
    pub const ALL: [Self; 3] = [Self::En, Self::Fr, Self::Es];

    /// Primary language subtag (ISO 639-1).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
            Self::Es => "es",
        }
    }

    /// Looks up a language by its primary subtag.
    ///
    /// Matching is exact on the already-normalized subtag; callers holding a
    /// full tag such as `fr-CA` go through `i18n::parse_language_tag`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    #[must_use]
    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
