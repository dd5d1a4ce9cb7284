// SPDX-License-Identifier: MPL-2.0
//! `session_shell` keeps a client application's session in step with a
//! hosted auth and document backend.
//!
//! It mirrors the signed-in user's profile document, resolves the interface
//! language from it, and turns backend failures into localized alerts.
//!
//! # Layers
//!
//! - [`domain`]: identities, session state and failure classification
//! - [`application`]: transport ports and the error service
//! - [`infrastructure`]: transport adapters
//! - [`app`]: the composition root and session synchronizer
//! - [`i18n`], [`ui`], [`diagnostics`], [`config`]: supporting services

#![doc(html_root_url = "https://docs.rs/session_shell/0.3.0")]

pub mod app;
pub mod application;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod ui;
