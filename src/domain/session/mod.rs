// SPDX-License-Identifier: MPL-2.0
//! Session domain types: who is signed in, and in which language.

mod identity;
mod language;
mod state;

pub use identity::{Document, Identity, UserContext, UserKey};
pub use language::LanguageTag;
pub use state::SessionState;
