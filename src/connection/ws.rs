//! WebSocket transport backed by tokio-tungstenite.
//!
//! Dials the well-known `/ws` path on the configured backend host, with the
//! `wss` scheme when TLS is requested.

use crate::connection::transport::{Connector, Link, LinkEvent};
use crate::error::{Result, TillsyncError};
use crate::protocol::endpoint_url;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Connector dialing the backend register endpoint.
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    pub fn new(host: &str, secure: bool) -> Self {
        Self {
            url: endpoint_url(host, secure),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self) -> Result<Box<dyn Link>> {
        let (stream, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|err| TillsyncError::transport(err.to_string()))?;
        log::debug!("websocket open to {}", self.url);
        Ok(Box::new(WsLink { stream }))
    }
}

struct WsLink {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Link for WsLink {
    async fn send_text(&mut self, frame: String) -> Result<()> {
        self.stream
            .send(Message::Text(frame))
            .await
            .map_err(|err| TillsyncError::transport(err.to_string()))
    }

    async fn next_event(&mut self) -> LinkEvent {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return LinkEvent::Message(text),
                Some(Ok(Message::Binary(bytes))) => {
                    log::trace!("ignoring {}-byte binary frame", bytes.len());
                }
                // Pings are answered by the stream itself
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {}
                Some(Ok(Message::Close(_))) | None => return LinkEvent::Closed,
                Some(Err(err)) => return LinkEvent::Error(err.to_string()),
            }
        }
    }
}
