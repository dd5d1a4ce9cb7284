// SPDX-License-Identifier: MPL-2.0
//! Translation dictionaries and lookup.

use crate::domain::session::LanguageTag;
use crate::error::{Error, Result};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use toml::{Table, Value};

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

/// Returned when a message exists in no dictionary at all.
pub const PLACEHOLDER: &str = "[missing translation]";

/// Read-only set of per-language message dictionaries.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    dictionaries: HashMap<LanguageTag, Table>,
}

impl Translator {
    /// Loads the dictionaries embedded under `assets/i18n/`.
    ///
    /// Files named after a language the application does not support are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Translation`] if an embedded file is not valid UTF-8
    /// or not valid TOML.
    pub fn load_embedded() -> Result<Self> {
        let mut dictionaries = HashMap::new();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(code) = filename.strip_suffix(".toml") else {
                continue;
            };
            let Some(locale) = LanguageTag::from_code(code) else {
                tracing::debug!(file = filename, "skipping dictionary for unsupported language");
                continue;
            };
            let Some(content) = Asset::get(filename) else {
                continue;
            };
            let text = std::str::from_utf8(content.data.as_ref()).map_err(|err| Error::Translation {
                locale: code.to_string(),
                reason: err.to_string(),
            })?;
            dictionaries.insert(locale, parse_dictionary(locale, text)?);
        }

        Ok(Self { dictionaries })
    }

    /// Builds a translator from in-memory TOML sources.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Translation`] if a source is not valid TOML.
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = (LanguageTag, &'a str)>,
    ) -> Result<Self> {
        let mut dictionaries = HashMap::new();
        for (locale, text) in sources {
            dictionaries.insert(locale, parse_dictionary(locale, text)?);
        }
        Ok(Self { dictionaries })
    }

    /// Languages that have a dictionary.
    pub fn locales(&self) -> impl Iterator<Item = LanguageTag> + '_ {
        self.dictionaries.keys().copied()
    }

    /// Finds a message by dot-path, trying `locale` then the default language.
    #[must_use]
    pub fn lookup(&self, locale: LanguageTag, key: &str) -> Option<&str> {
        self.lookup_path(locale, &key.split('.').collect::<Vec<_>>())
    }

    /// Finds a message by path segments, trying `locale` then the default language.
    #[must_use]
    pub fn lookup_path(&self, locale: LanguageTag, path: &[&str]) -> Option<&str> {
        let exact = self.find(locale, path);
        if exact.is_some() || locale == LanguageTag::DEFAULT {
            return exact;
        }
        let fallback = self.find(LanguageTag::DEFAULT, path);
        if fallback.is_some() {
            tracing::debug!(%locale, key = %path.join("."), "message falls back to default language");
        }
        fallback
    }

    /// Translates a dot-path key, never returning an empty string.
    #[must_use]
    pub fn translate(&self, locale: LanguageTag, key: &str) -> String {
        self.lookup(locale, key).unwrap_or(PLACEHOLDER).to_string()
    }

    /// Translates a structural path, never returning an empty string.
    #[must_use]
    pub fn translate_path(&self, locale: LanguageTag, path: &[&str]) -> String {
        self.lookup_path(locale, path).unwrap_or(PLACEHOLDER).to_string()
    }

    fn find(&self, locale: LanguageTag, path: &[&str]) -> Option<&str> {
        let (leaf, tables) = path.split_last()?;
        let mut table = self.dictionaries.get(&locale)?;
        for segment in tables {
            table = table.get(*segment)?.as_table()?;
        }
        match table.get(*leaf)? {
            Value::String(text) if !text.is_empty() => Some(text.as_str()),
            _ => None,
        }
    }
}

fn parse_dictionary(locale: LanguageTag, text: &str) -> Result<Table> {
    toml::from_str::<Table>(text).map_err(|err| Error::Translation {
        locale: locale.code().to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;

    const EN: &str = r#"
        [greeting]
        hello = "Hello"
        bye = "Goodbye"
        blank = ""

        [greeting.formal]
        hello = "Good day"
    "#;

    const FR: &str = r#"
        [greeting]
        hello = "Bonjour"
    "#;

    fn translator() -> Translator {
        Translator::from_sources([(LanguageTag::En, EN), (LanguageTag::Fr, FR)]).unwrap()
    }

    #[test]
    fn exact_locale_wins() {
        assert_eq!(translator().translate(LanguageTag::Fr, "greeting.hello"), "Bonjour");
    }

    #[test]
    fn missing_key_falls_back_to_default_locale() {
        assert_eq!(translator().translate(LanguageTag::Fr, "greeting.bye"), "Goodbye");
    }

    #[test]
    fn missing_locale_falls_back_to_default_locale() {
        assert_eq!(translator().translate(LanguageTag::Es, "greeting.hello"), "Hello");
    }

    #[test]
    fn missing_everywhere_yields_placeholder() {
        let translator = translator();
        assert_eq!(translator.translate(LanguageTag::Fr, "greeting.nope"), PLACEHOLDER);
        assert_eq!(translator.translate(LanguageTag::En, ""), PLACEHOLDER);
        assert_eq!(translator.translate(LanguageTag::En, "greeting..hello"), PLACEHOLDER);
        assert_eq!(Translator::default().translate(LanguageTag::En, "greeting.hello"), PLACEHOLDER);
    }

    #[test]
    fn tables_and_empty_strings_are_not_messages() {
        let translator = translator();
        assert_eq!(translator.lookup(LanguageTag::En, "greeting.formal"), None);
        assert_eq!(translator.lookup(LanguageTag::En, "greeting.blank"), None);
        assert_eq!(translator.translate(LanguageTag::En, "greeting.blank"), PLACEHOLDER);
    }

    #[test]
    fn structural_paths_match_dot_paths() {
        let translator = translator();
        assert_eq!(
            translator.translate_path(LanguageTag::En, &["greeting", "formal", "hello"]),
            translator.translate(LanguageTag::En, "greeting.formal.hello"),
        );
    }

    #[test]
    fn invalid_toml_is_reported_with_its_locale() {
        let err = Translator::from_sources([(LanguageTag::Es, "not = valid = toml")]).unwrap_err();
        assert!(matches!(err, Error::Translation { ref locale, .. } if locale == "es"));
    }

    #[test]
    fn embedded_dictionaries_cover_every_language() {
        let translator = Translator::load_embedded().unwrap();
        let mut locales: Vec<_> = translator.locales().map(LanguageTag::code).collect();
        locales.sort_unstable();
        assert_eq!(locales, vec!["en", "es", "fr"]);
    }

    #[test]
    fn embedded_dictionaries_hold_only_error_messages() {
        fn leaves(table: &Table, prefix: &str, out: &mut Vec<String>) {
            for (name, value) in table {
                let key = if prefix.is_empty() { name.clone() } else { format!("{prefix}.{name}") };
                match value {
                    Value::Table(inner) => leaves(inner, &key, out),
                    _ => out.push(key),
                }
            }
        }

        let translator = Translator::load_embedded().unwrap();
        let mut expected: Vec<String> =
            ErrorKind::ALL.iter().map(|kind| kind.i18n_key().to_string()).collect();
        expected.sort_unstable();
        for (locale, table) in &translator.dictionaries {
            let mut keys = Vec::new();
            leaves(table, "", &mut keys);
            keys.sort_unstable();
            assert_eq!(keys, expected, "{locale} has keys nothing looks up");
        }
    }

    #[test]
    fn embedded_dictionaries_translate_every_error_kind() {
        let translator = Translator::load_embedded().unwrap();
        for locale in LanguageTag::ALL {
            for kind in ErrorKind::ALL {
                assert!(
                    translator.find(locale, &kind.i18n_key().split('.').collect::<Vec<_>>()).is_some(),
                    "{locale} is missing {}",
                    kind.i18n_key()
                );
            }
        }
    }
}
