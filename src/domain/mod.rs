// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core types and rules of the session shell.
//!
//! Apart from `serde` for reading backend documents, nothing here depends on
//! transports, dictionaries or the runtime, which keeps these types easy to
//! test in isolation.
//!
//! # Modules
//!
//! - [`diagnostics`]: Diagnostics types ([`BufferCapacity`](diagnostics::BufferCapacity))
//! - [`error`]: Failure normalization and the user-facing
//!   [`ErrorKind`](error::ErrorKind) taxonomy
//! - [`session`]: [`Identity`](session::Identity), [`LanguageTag`](session::LanguageTag)
//!   and [`SessionState`](session::SessionState)

pub mod diagnostics;
pub mod error;
pub mod session;
