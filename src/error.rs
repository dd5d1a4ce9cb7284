// SPDX-License-Identifier: MPL-2.0
use crate::domain::error::Failure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config Error: {0}")]
    Config(String),
    #[error("Translation Error: {locale}: {reason}")]
    Translation { locale: String, reason: String },
    #[error("Transport Error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors reported by the auth and document transports.
///
/// Transports return these when wiring a subscription fails, and deliver
/// them on a subscription's error channel afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// A coded error from the backend, e.g. `auth/network-request-failed`.
    #[error("backend error {code}: {message}")]
    Backend { code: String, message: String },
    /// The connection to the backend is gone.
    #[error("transport disconnected")]
    Disconnected,
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn backend(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<TransportError> for Failure {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Backend { code, message } => Failure::backend(&code, message),
            TransportError::Disconnected => Failure::backend("network-request-failed", "transport disconnected"),
            TransportError::Other(message) => Failure::unexpected(message),
        }
    }
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        match err {
            Error::Transport(transport) => transport.into(),
            other => Failure::unexpected(other),
        }
    }
}

impl From<serde_json::Error> for Failure {
    fn from(err: serde_json::Error) -> Self {
        Failure::unexpected(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;

    #[test]
    fn display_formats_io_error() {
        let err: Error = std::io::Error::other("disk failure").into();
        assert_eq!(format!("{err}"), "I/O Error: disk failure");
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{err}"), "Config Error: bad field");
    }

    #[test]
    fn backend_transport_error_keeps_its_code() {
        let failure: Failure = TransportError::backend("auth/wrong-password", "nope").into();
        assert_eq!(failure.kind(), ErrorKind::InvalidCredentials);
    }

    #[test]
    fn disconnection_is_a_network_failure() {
        let failure: Failure = TransportError::Disconnected.into();
        assert_eq!(failure.kind(), ErrorKind::NetworkUnavailable);
    }

    #[test]
    fn wrapped_transport_errors_are_unwrapped() {
        let err = Error::Transport(TransportError::backend("email-already-in-use", ""));
        assert_eq!(Failure::from(err).kind(), ErrorKind::AccountAlreadyExists);

        let other = Error::Config("broken".into());
        assert_eq!(Failure::from(other).kind(), ErrorKind::Unknown);
    }
}
