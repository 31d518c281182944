//! Error types for Hot Rod protocol operations.

use std::io;
use std::sync::Arc;
use thiserror::Error;

use crate::protocol::constants::Status;

/// The main error type for Hot Rod protocol operations.
///
/// This enum covers transport failures reported by the byte-stream
/// capabilities, framing violations detected by the decoders, and errors
/// returned by the server inside a response.
#[derive(Debug, Error, Clone)]
pub enum HotRodError {
    /// The reader or writer capability failed to move bytes.
    ///
    /// The connection behind the capability is considered poisoned and must
    /// be discarded by the caller.
    #[error("transport error: {0}")]
    Transport(String),

    /// I/O errors from the standard library (wrapped in `Arc` for `Clone`).
    #[error("I/O error: {0}")]
    Io(Arc<io::Error>),

    /// Decoded bytes violate the wire framing.
    ///
    /// Examples: wrong magic byte, overlong VInt/VLong, message-id mismatch,
    /// owner index out of range, unknown opcode or status byte. The
    /// connection is out of sync and must be discarded.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// An error status returned by the server in a response header.
    ///
    /// The response was well-formed, so the connection stays usable; the
    /// caller may retry, redirect, or propagate.
    #[error("server error ({status}): {message}")]
    Server {
        /// The error status byte from the response header.
        status: Status,
        /// The error message payload sent by the server.
        message: String,
    },

    /// Client configuration errors (invalid settings).
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<io::Error> for HotRodError {
    fn from(err: io::Error) -> Self {
        HotRodError::Io(Arc::new(err))
    }
}

impl HotRodError {
    /// Returns `true` if the connection that produced this error can keep
    /// being used.
    ///
    /// Server errors travel inside a well-formed response, so the stream is
    /// still in sync. Transport and protocol errors leave the stream in an
    /// unknown state.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Server { .. } | Self::Configuration(_))
    }

    /// Returns `true` if the connection must be discarded.
    pub fn poisons_connection(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Io(_) | Self::Protocol(_))
    }

    /// Returns the server status if this is a server error.
    pub fn server_status(&self) -> Option<Status> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized `Result` type for Hot Rod operations.
pub type Result<T> = std::result::Result<T, HotRodError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let err = HotRodError::Transport("connection reset".to_string());
        assert_eq!(err.to_string(), "transport error: connection reset");
    }

    #[test]
    fn test_protocol_error_display() {
        let err = HotRodError::Protocol("invalid magic byte 0x42".to_string());
        assert_eq!(err.to_string(), "protocol error: invalid magic byte 0x42");
    }

    #[test]
    fn test_server_error_display() {
        let err = HotRodError::Server {
            status: Status::ServerError,
            message: "hello world".to_string(),
        };
        assert_eq!(err.to_string(), "server error (SERVER_ERROR): hello world");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
        let err: HotRodError = io_err.into();
        assert!(matches!(err, HotRodError::Io(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_server_errors_are_recoverable() {
        let err = HotRodError::Server {
            status: Status::CommandTimeout,
            message: "timed out".to_string(),
        };
        assert!(err.is_recoverable());
        assert!(!err.poisons_connection());
        assert_eq!(err.server_status(), Some(Status::CommandTimeout));
    }

    #[test]
    fn test_framing_errors_poison_the_connection() {
        assert!(HotRodError::Protocol("bad".into()).poisons_connection());
        assert!(HotRodError::Transport("down".into()).poisons_connection());

        let io_err: HotRodError = io::Error::new(io::ErrorKind::TimedOut, "t").into();
        assert!(io_err.poisons_connection());
        assert!(!io_err.is_recoverable());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HotRodError>();
    }

    #[test]
    fn test_error_is_clone() {
        let err = HotRodError::Protocol("test".to_string());
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
