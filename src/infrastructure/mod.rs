// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`memory`]: In-process auth + document backend (implements
//!   [`AuthTransport`] and [`DocumentTransport`]), used for local runs and tests
//!
//! The diagnostics sink is implemented by
//! [`DiagnosticsHandle`](crate::diagnostics::DiagnosticsHandle) directly.
//!
//! [`AuthTransport`]: crate::application::port::AuthTransport
//! [`DocumentTransport`]: crate::application::port::DocumentTransport

pub mod memory;

pub use memory::MemoryBackend;
