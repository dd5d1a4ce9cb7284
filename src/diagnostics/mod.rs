// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for recording who is signed in and what went wrong.
//!
//! This is the application's external observability sink: the session
//! synchronizer reports the current user here, and the alert queue copies
//! every warning and error it shows. Events travel over a bounded channel
//! and are kept in a memory-bounded circular buffer until exported.
//!
//! # Architecture
//!
//! - [`DiagnosticsHandle`]: cheap, cloneable, fire-and-forget sender
//! - [`DiagnosticsCollector`]: drains the channel into a [`CircularBuffer`]
//! - [`DiagnosticEvent`]: timestamped [`DiagnosticEventKind`]

mod buffer;
mod collector;
mod events;

pub use buffer::{BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticReport, DiagnosticsCollector, DiagnosticsHandle};
pub use events::{AppStateEvent, DiagnosticEvent, DiagnosticEventKind, ErrorEvent, WarningEvent};
