// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! - [`port`]: Traits the backend adapters implement (auth, documents, diagnostics)
//! - [`error_service`]: Turns any caught failure into one localized alert
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The composition root (`app`) wires ports and services together

pub mod error_service;
pub mod port;

pub use error_service::ErrorService;
