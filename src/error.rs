//! Error types and handling infrastructure for tillsync.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types and `anyhow` for application-level error handling with context.
//!
//! ## Design Principles
//!
//! - **Degrade, don't die**: connection failures are reflected in status, never
//!   raised as hard errors to the register operator
//! - **Context preservation**: include relevant information for debugging
//! - **Consistency**: standardized Result type across all modules

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tillsync operations.
///
/// This enum covers error conditions from identity persistence, the transport
/// layer, wire encoding, and the terminal UI.
#[derive(Error, Debug)]
pub enum TillsyncError {
    /// Identity file could not be read or written
    #[error("Identity store failed: {message}")]
    IdentityError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generated or loaded identity violated its invariants (e.g. empty)
    #[error("Invalid register identity: {message}")]
    InvalidIdentity { message: String },

    /// No usable location for the identity file
    #[error("No data directory available for identity file: {}", path.display())]
    NoDataDirectory { path: PathBuf },

    /// Transport establishment or in-flight failure
    #[error("Transport error: {message}")]
    TransportError { message: String },

    /// Wire message could not be encoded
    #[error("Protocol error: {message}")]
    ProtocolError { message: String },

    /// UI and terminal related errors
    #[error("UI operation failed: {message}")]
    UIError { message: String },

    /// Invalid command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for tillsync operations.
pub type Result<T> = std::result::Result<T, TillsyncError>;

impl TillsyncError {
    /// Create an IdentityError from an io::Error with additional context
    pub fn identity(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::IdentityError {
            message: message.into(),
            source,
        }
    }

    /// Create a TransportError with a descriptive message
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportError {
            message: message.into(),
        }
    }

    /// Create a ProtocolError with a descriptive message
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    /// Create a UIError with a descriptive message
    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

// Automatic conversion from io::Error for UI setup/teardown paths
impl From<std::io::Error> for TillsyncError {
    fn from(err: std::io::Error) -> Self {
        Self::UIError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TillsyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::ProtocolError {
            message: err.to_string(),
        }
    }
}
