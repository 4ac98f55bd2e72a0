//! # tillsync - Point-of-Sale Register Sync Client
//!
//! A terminal register display that mirrors its running total to a backend
//! over a persistent WebSocket connection. The display is the local source of
//! truth; the backend is kept eventually consistent with best-effort updates
//! and unconditional reconnection.
//!
//! ## Architecture
//!
//! The library is organized into focused modules:
//!
//! - [`error`] - Centralized error types and handling
//! - [`identity`] - Durable per-device register identity
//! - [`protocol`] - Wire messages exchanged with the backend
//! - [`connection`] - Connection lifecycle: connect, handshake, reconnect,
//!   status publication, best-effort send
//! - [`display`] - Display buffer state machine
//! - [`input`] / [`ui`] - Keypad mapping and terminal rendering
//! - [`app`] - Application core and component coordination

// Core modules
pub mod error;
pub mod identity;
pub mod protocol;

// Connection lifecycle
pub mod connection;

// Display state machine
pub mod display;

// Terminal front end
pub mod input;
pub mod ui;

// Application core
pub mod app;

// Re-export commonly used types for convenience
pub use error::{Result, TillsyncError};

// Public API surface for external usage
pub use app::Application;
pub use connection::{ConnectionHandle, ConnectionStatus, RetryPolicy};
pub use display::DisplayState;
pub use identity::{FileIdentityStore, IdentityProvider, RegisterIdentity};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
