//! HTTP request execution error types.
//!
//! This module defines error types that can occur during request execution.
//! A connection that the server resets or closes is kept apart from other
//! network failures: for deliberately bad input it is the expected answer.

use std::fmt;
use std::io;

/// Errors that can occur during HTTP request execution.
#[derive(Debug)]
pub enum RequestError {
    /// Network error that is not a closed connection, e.g. connection
    /// refused or DNS failure.
    NetworkError(String),

    /// The server reset or closed the connection before a full response
    /// was read.
    ConnectionClosed(String),

    /// Request timed out before completion.
    Timeout,

    /// Invalid URL provided in the request.
    InvalidUrl(String),

    /// The URL scheme cannot be used for this request.
    UnsupportedProtocol(String),

    /// The request could not be built from the given parts.
    BuildError(String),

    /// The response body could not be read as valid HTTP.
    ProtocolError(String),
}

impl RequestError {
    /// Whether the server closed or reset the connection.
    ///
    /// Probes that send oversized or malformed input treat this as a
    /// rejection rather than a failure.
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, RequestError::ConnectionClosed(_))
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            RequestError::ConnectionClosed(msg) => {
                write!(f, "Connection closed by peer: {}", msg)
            }
            RequestError::Timeout => write!(f, "Request timed out"),
            RequestError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            RequestError::UnsupportedProtocol(protocol) => {
                write!(f, "Unsupported protocol: {}", protocol)
            }
            RequestError::BuildError(msg) => write!(f, "Request build error: {}", msg),
            RequestError::ProtocolError(msg) => write!(f, "HTTP protocol error: {}", msg),
        }
    }
}

impl std::error::Error for RequestError {}

/// Whether an I/O error kind means the peer dropped the connection.
fn is_closed_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
    )
}

/// Walks an error's source chain looking for a dropped connection.
///
/// hyper reports an early close as "connection closed before message
/// completed" or "incomplete message" without an io::Error underneath,
/// so its messages are matched as well.
fn chain_indicates_closed(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if is_closed_kind(io_err.kind()) {
                return true;
            }
        }
        let msg = e.to_string().to_ascii_lowercase();
        if msg.contains("connection closed")
            || msg.contains("connection reset")
            || msg.contains("incomplete message")
            || msg.contains("broken pipe")
        {
            return true;
        }
        current = e.source();
    }
    false
}

/// Convert reqwest errors to RequestError.
impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RequestError::Timeout
        } else if err.is_builder() {
            RequestError::BuildError(err.to_string())
        } else if chain_indicates_closed(&err) {
            RequestError::ConnectionClosed(err.to_string())
        } else if err.is_body() || err.is_decode() {
            RequestError::ProtocolError(err.to_string())
        } else {
            RequestError::NetworkError(err.to_string())
        }
    }
}

/// Convert URL parsing errors to RequestError.
impl From<url::ParseError> for RequestError {
    fn from(err: url::ParseError) -> Self {
        RequestError::InvalidUrl(err.to_string())
    }
}
