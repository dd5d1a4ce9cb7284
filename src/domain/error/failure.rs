// SPDX-License-Identifier: MPL-2.0
//! Normalized failure input.
//!
//! Whatever a transport or parser throws is converted into a [`Failure`]
//! before it reaches the error service, so classification never has to
//! inspect a backend's own error types.

use super::ErrorKind;
use std::fmt;

/// A backend error code such as `auth/wrong-password`.
///
/// The optional service prefix (`auth`) is kept apart from the reason
/// (`wrong-password`); classification only looks at the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCode {
    service: Option<String>,
    reason: String,
}

impl BackendCode {
    /// Splits a raw code on its first `/`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.split_once('/') {
            Some((service, reason)) if !service.is_empty() => Self {
                service: Some(service.to_string()),
                reason: reason.to_string(),
            },
            _ => Self {
                service: None,
                reason: raw.trim_start_matches('/').to_string(),
            },
        }
    }

    #[must_use]
    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for BackendCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.service {
            Some(service) => write!(f, "{service}/{}", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

/// A caught failure, in one of the shapes the error service understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The backend reported a coded error.
    Backend { code: BackendCode, message: String },
    /// Any other error, reduced to its message.
    Unexpected(String),
    /// Something was thrown that carries no information at all.
    Empty,
}

impl Failure {
    pub fn backend(code: &str, message: impl Into<String>) -> Self {
        Self::Backend {
            code: BackendCode::parse(code),
            message: message.into(),
        }
    }

    pub fn unexpected(error: impl fmt::Display) -> Self {
        let message = error.to_string();
        if message.trim().is_empty() {
            Self::Empty
        } else {
            Self::Unexpected(message)
        }
    }

    /// Total classification: every failure yields a kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Backend { code, .. } => ErrorKind::from_backend_reason(code.reason()),
            Self::Unexpected(_) | Self::Empty => ErrorKind::Unknown,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend { code, message } if message.is_empty() => write!(f, "{code}"),
            Self::Backend { code, message } => write!(f, "{code}: {message}"),
            Self::Unexpected(message) => f.write_str(message),
            Self::Empty => f.write_str("empty failure"),
        }
    }
}

impl<T: fmt::Display> From<Option<T>> for Failure {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Self::unexpected)
    }
}
