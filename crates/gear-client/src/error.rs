//! Error types for gear daemon operations.

use miette::Diagnostic;
use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias using [`ClientError`].
pub type GearResult<T> = Result<T, ClientError>;

/// Unexpected response received from the gear daemon.
///
/// Every operation raises this same kind for any status it does not
/// recognise as success, including daemon-side rejections of illegal unit
/// names. Callers distinguish causes by inspecting `status` and `body`, not
/// by matching further variants.
#[derive(Error, Diagnostic, Debug)]
#[error("gear daemon returned {status}: {body}")]
#[diagnostic(code(gear::daemon::unexpected_status))]
pub struct GearError {
    /// HTTP status code of the daemon's response.
    pub status: StatusCode,
    /// Raw response body, kept verbatim for diagnostics.
    pub body: String,
}

impl GearError {
    /// Create an error from a daemon response.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Errors raised by [`GearClient`](crate::GearClient) operations.
#[derive(Error, Diagnostic, Debug)]
pub enum ClientError {
    /// The daemon answered with a status the operation does not accept.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Gear(#[from] GearError),

    /// The HTTP exchange itself failed (connect, send, or body read).
    ///
    /// Passed through unclassified; telling "daemon unreachable" apart
    /// from "daemon rejected the request" is a caller concern.
    #[error("transport failure: {0}")]
    #[diagnostic(code(gear::transport))]
    Transport(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gear_error_display() {
        let err = GearError::new(StatusCode::NOT_IMPLEMENTED, "no such operation");
        assert_eq!(
            err.to_string(),
            "gear daemon returned 501 Not Implemented: no such operation"
        );
    }

    #[test]
    fn gear_error_is_transparent_in_client_error() {
        let err: ClientError = GearError::new(StatusCode::BAD_REQUEST, "bad name").into();
        assert_eq!(err.to_string(), "gear daemon returned 400 Bad Request: bad name");
        assert!(matches!(err, ClientError::Gear(_)));
    }
}
