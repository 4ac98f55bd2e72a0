//! Transport abstraction for the backend link.
//!
//! The connection worker never talks to a socket directly; it drives a
//! `Connector` that yields one `Link` per successful establishment. Production
//! uses the WebSocket connector in [`crate::connection::ws`]; tests supply
//! scripted connectors.

use crate::error::Result;
use async_trait::async_trait;

/// Events surfaced by an established link.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// Inbound text frame. The register protocol expects no server messages;
    /// these are logged and ignored.
    Message(String),
    /// The remote closed the link cleanly.
    Closed,
    /// The link failed mid-flight.
    Error(String),
}

/// An established duplex link to the backend.
///
/// Exactly one link exists at a time; the worker drops it before starting a
/// new connect attempt.
#[async_trait]
pub trait Link: Send {
    /// Transmit one text frame. An error is treated as a link loss.
    async fn send_text(&mut self, frame: String) -> Result<()>;

    /// Await the next link event. `Closed` and `Error` are terminal; the
    /// worker drops the link after observing either.
    async fn next_event(&mut self) -> LinkEvent;
}

/// Factory for links; one connect attempt per call.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Link>>;
}
