// SPDX-License-Identifier: MPL-2.0
//! User-facing error taxonomy.

use std::fmt;

/// What went wrong, as far as the user is concerned.
///
/// Every failure maps to exactly one kind; [`ErrorKind::Unknown`] catches
/// everything that is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong password or no such account.
    InvalidCredentials,
    /// The backend could not be reached.
    NetworkUnavailable,
    /// Sign-up with an email that is already registered.
    AccountAlreadyExists,
    /// Anything else.
    Unknown,
}

impl ErrorKind {
    pub const ALL: [Self; 4] = [
        Self::InvalidCredentials,
        Self::NetworkUnavailable,
        Self::AccountAlreadyExists,
        Self::Unknown,
    ];

    /// Maps a backend reason code (without its service prefix).
    #[must_use]
    pub fn from_backend_reason(reason: &str) -> Self {
        match reason {
            "wrong-password" | "user-not-found" => Self::InvalidCredentials,
            "network-request-failed" => Self::NetworkUnavailable,
            "email-already-in-use" => Self::AccountAlreadyExists,
            _ => Self::Unknown,
        }
    }

    /// Returns the dictionary key of the message shown for this kind.
    #[must_use]
    pub fn i18n_key(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "error_messages.auth.invalid_credentials",
            Self::NetworkUnavailable => "error_messages.auth.network_request_failed",
            Self::AccountAlreadyExists => "error_messages.auth.email_already_in_use",
            Self::Unknown => "error_messages.general.unknown",
        }
    }

    /// English text used when no dictionary has the message.
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "The email or password is incorrect.",
            Self::NetworkUnavailable => "Unable to reach the server. Check your connection.",
            Self::AccountAlreadyExists => "An account with this email already exists.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidCredentials => "invalid credentials",
            Self::NetworkUnavailable => "network unavailable",
            Self::AccountAlreadyExists => "account already exists",
            Self::Unknown => "unknown error",
        };
        f.write_str(name)
    }
}
