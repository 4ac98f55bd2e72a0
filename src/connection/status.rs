//! Connection status published to subscribers.
//!
//! ## State Transition Diagram
//!
//! ```text
//!        start()            transport open
//!   Disconnected ──────► Connecting ──────► Connected
//!        ▲                   │                  │
//!        │     open failed   │                  │ close / error
//!        └───────────────────┴──────────────────┘
//! ```
//!
//! Leaving Disconnected for a non-manual cause schedules a reconnect; `stop()`
//! forces Disconnected(Stopped) and cancels the pending reconnect. All
//! transitions are driven by the connection worker; subscribers only observe.

/// Why the connection is currently down.
///
/// The wire behaves identically for every cause; the distinction exists for
/// operator visibility only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectCause {
    /// No connection attempt has completed yet
    NeverConnected,
    /// `stop()` was called; no reconnect is pending
    Stopped,
    /// An established connection closed
    Lost,
    /// Establishment or transmission failed
    Error(String),
}

/// Current link status. Exactly one value at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected(DisconnectCause),
    Connecting,
    Connected,
}

impl ConnectionStatus {
    /// Initial status before the first `start()`.
    pub fn initial() -> Self {
        Self::Disconnected(DisconnectCause::NeverConnected)
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected(_))
    }

    /// User-facing status text for the register header.
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Disconnected(DisconnectCause::NeverConnected) => "Offline",
            Self::Disconnected(DisconnectCause::Stopped) => "Stopped",
            Self::Disconnected(DisconnectCause::Lost) => "Connection lost",
            Self::Disconnected(DisconnectCause::Error(_)) => "Connection error",
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
        }
    }

    /// Validate a transition. The worker debug-asserts this before publishing.
    pub fn can_transition_to(&self, next: &ConnectionStatus) -> bool {
        use ConnectionStatus::*;

        match (self, next) {
            // start() or a scheduled reconnect firing
            (Disconnected(_), Connecting) => true,
            // stop() while idle is idempotent
            (Disconnected(_), Disconnected(_)) => true,

            // transport open
            (Connecting, Connected) => true,
            // open failed, or stop() during establishment
            (Connecting, Disconnected(_)) => true,

            // close or error, or stop()
            (Connected, Disconnected(_)) => true,

            // Never skip Connecting, never re-enter Connected directly
            _ => false,
        }
    }
}
