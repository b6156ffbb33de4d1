//! Error types for the IRC client.
//!
//! Errors are split by how far they travel:
//!
//! - [`LineError`] never leaves the line codec; the offending line is dropped.
//! - [`ParseError`] never leaves the session loop; the offending line is dropped.
//! - [`ClientError`] ends the current connection attempt and is handed to the
//!   reconnect loop.

use std::io;

use thiserror::Error;

/// Convenience type alias for Results using [`ClientError`].
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Conditions that end a connection attempt.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Socket could not be opened, bound or connected.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        /// The address (or host:port) being connected to.
        addr: String,
        /// The underlying socket error.
        #[source]
        source: io::Error,
    },

    /// TLS configuration or handshake failed.
    #[error("tls error: {0}")]
    Tls(String),

    /// The server sent `ERROR :Closing Link:`.
    #[error("server closed the link: {0}")]
    ServerClosed(String),

    /// The peer closed the stream (zero-byte read).
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// The nickname was rejected with 433 during registration.
    #[error("nickname in use: {0}")]
    NickInUse(String),

    /// Any other I/O failure while reading or writing.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The configuration cannot be used to connect.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns true if the failure happened before a stream was established.
    pub fn is_connect_failure(&self) -> bool {
        matches!(self, Self::Connect { .. } | Self::Tls(_) | Self::Config(_))
    }
}

/// Malformed protocol lines. The line is dropped and the session continues.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// The command needs more whitespace-separated tokens than the line has.
    #[error("{command}: not enough tokens: expected {expected}, got {got}")]
    NotEnoughTokens {
        /// Command being parsed.
        command: &'static str,
        /// Minimum number of tokens.
        expected: usize,
        /// Tokens present on the line.
        got: usize,
    },

    /// The source prefix has no nickname.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),
}

/// Lines discarded by the codec.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum LineError {
    /// The line is not valid UTF-8.
    #[error("invalid utf-8 after {valid_up_to} bytes")]
    InvalidUtf8 {
        /// Length of the valid prefix.
        valid_up_to: usize,
    },

    /// The line exceeds the configured maximum length.
    #[error("line too long: {actual} bytes (limit {limit})")]
    TooLong {
        /// Bytes seen so far.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },
}
