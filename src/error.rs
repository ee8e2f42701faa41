//! Error types for irrq
//!
//! Provides a unified error type for all operations.

use std::io;

use thiserror::Error;

/// Result type alias using IrrError
pub type Result<T> = std::result::Result<T, IrrError>;

/// Unified error type for irrq operations
#[derive(Debug, Error)]
pub enum IrrError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Transport error: {0}")]
    Transport(#[from] io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Multiple copies of key in database")]
    KeyConflict,

    // -------------------------------------------------------------------------
    // Query Errors
    // -------------------------------------------------------------------------
    #[error("Unknown protocol family: {0}")]
    UnknownFamily(u8),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IrrError {
    /// Peer accepted zero bytes on write
    pub(crate) fn write_broken() -> Self {
        IrrError::Transport(io::Error::new(
            io::ErrorKind::WriteZero,
            "connection broken",
        ))
    }

    /// Peer returned zero bytes on read
    pub(crate) fn read_broken() -> Self {
        IrrError::Transport(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection broken",
        ))
    }

    /// True for `Transport` errors caused by the peer closing the stream
    pub fn is_connection_broken(&self) -> bool {
        match self {
            IrrError::Transport(e) => matches!(
                e.kind(),
                io::ErrorKind::WriteZero
                    | io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
            ),
            _ => false,
        }
    }
}
