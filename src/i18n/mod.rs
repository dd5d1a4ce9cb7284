// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! Translations live in one TOML file per supported language under
//! `assets/i18n/`, embedded into the binary at build time. Each file is a
//! nested table; messages are addressed by dot-path
//! (`error_messages.auth.invalid_credentials`) or by the equivalent list of
//! path segments.
//!
//! # Resolution order
//!
//! 1. The requested language
//! 2. The default language ([`LanguageTag::DEFAULT`])
//! 3. [`PLACEHOLDER`], so callers never receive an empty string
//!
//! The [`Translator`] is read-only once built and can be shared freely
//! between threads behind an `Arc`.

mod dictionary;
mod language;

pub use crate::domain::session::LanguageTag;
pub use dictionary::{Translator, PLACEHOLDER};
pub use language::{parse_language_tag, resolve_language};
