// SPDX-License-Identifier: MPL-2.0
//! Mapping free-form language tags onto [`LanguageTag`].

use crate::domain::session::LanguageTag;
use unic_langid::LanguageIdentifier;

/// Parses a BCP 47 tag (`fr`, `fr-CA`, `en_US`, `ES`) into a supported language.
///
/// Only the primary language subtag matters. Returns `None` for malformed
/// tags and for languages the application does not ship.
#[must_use]
pub fn parse_language_tag(raw: &str) -> Option<LanguageTag> {
    let normalized = raw.trim().replace('_', "-");
    if normalized.is_empty() {
        return None;
    }
    let langid = normalized.parse::<LanguageIdentifier>().ok()?;
    LanguageTag::from_code(langid.language.as_str())
}

/// Like [`parse_language_tag`], falling back to the default language.
#[must_use]
pub fn resolve_language(raw: Option<&str>) -> LanguageTag {
    raw.and_then(parse_language_tag).unwrap_or(LanguageTag::DEFAULT)
}
