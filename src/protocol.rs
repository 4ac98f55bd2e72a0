//! Wire protocol shared between the register client and the backend.
//!
//! Messages are JSON text frames. The backend treats each `update` as the
//! latest authoritative total for the sending register; no replies are
//! expected for either message.

use crate::error::Result;
use crate::identity::RegisterIdentity;
use serde::{Deserialize, Serialize};

/// Well-known endpoint path on the backend host.
pub const ENDPOINT_PATH: &str = "/ws";

/// Messages sent from the register client to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Announces identity once per successful connection.
    RegisterConnect {
        #[serde(rename = "registerId")]
        register_id: String,
    },
    /// Carries the latest committed display total.
    Update {
        #[serde(rename = "registerId")]
        register_id: String,
        total: f64,
    },
}

impl ClientMessage {
    /// Build the registration handshake for `identity`.
    pub fn register_connect(identity: &RegisterIdentity) -> Self {
        Self::RegisterConnect {
            register_id: identity.as_str().to_string(),
        }
    }

    /// Build an update frame carrying `total`.
    pub fn update(identity: &RegisterIdentity, total: f64) -> Self {
        Self::Update {
            register_id: identity.as_str().to_string(),
            total,
        }
    }

    /// Serialize to the JSON text frame sent over the transport.
    pub fn to_frame(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Build the endpoint URL for `host`, choosing the secure scheme when asked.
pub fn endpoint_url(host: &str, secure: bool) -> String {
    let scheme = if secure { "wss" } else { "ws" };
    format!("{scheme}://{host}{ENDPOINT_PATH}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> RegisterIdentity {
        RegisterIdentity::new("register_1700000000000").expect("valid identity")
    }

    #[test]
    fn register_connect_frame_shape() {
        let frame = ClientMessage::register_connect(&identity())
            .to_frame()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();

        assert_eq!(value["type"], "register_connect");
        assert_eq!(value["registerId"], "register_1700000000000");
        assert!(value.get("total").is_none());
    }

    #[test]
    fn update_frame_shape() {
        let frame = ClientMessage::update(&identity(), 52.5).to_frame().unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();

        assert_eq!(value["type"], "update");
        assert_eq!(value["registerId"], "register_1700000000000");
        assert_eq!(value["total"], 52.5);
    }

    #[test]
    fn frames_round_trip() {
        let msg = ClientMessage::update(&identity(), 0.0);
        let frame = msg.to_frame().unwrap();
        let parsed: ClientMessage = serde_json::from_str(&frame).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn endpoint_url_schemes() {
        assert_eq!(endpoint_url("shop.local:8080", false), "ws://shop.local:8080/ws");
        assert_eq!(endpoint_url("shop.example.com", true), "wss://shop.example.com/ws");
    }
}
