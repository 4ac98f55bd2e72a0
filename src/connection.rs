//! Connection lifecycle management.
//!
//! Owns the single logical connection to the backend: connect, registration
//! handshake, closure detection, scheduled reconnect, status publication, and
//! the best-effort send primitive.

pub mod manager;
pub mod retry;
pub mod status;
pub mod transport;
pub mod ws;

pub use manager::{spawn_connection_manager, ConnectionCommand, ConnectionHandle};
pub use retry::{RetryPolicy, RECONNECT_DELAY};
pub use status::{ConnectionStatus, DisconnectCause};
pub use transport::{Connector, Link, LinkEvent};
pub use ws::WsConnector;
