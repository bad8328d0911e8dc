//! Inbound and outbound WebSocket message type definitions.

use serde::{Deserialize, Serialize};

use crate::change::ChangeEvent;

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Subscribe to a channel.
    Subscribe {
        /// Channel name, e.g. `user:<id>` or `conversation:<id>`.
        channel: String,
    },
    /// Unsubscribe from a channel.
    Unsubscribe {
        /// Channel name.
        channel: String,
    },
    /// Pong response to server ping.
    Pong {
        /// Echoed timestamp.
        timestamp: i64,
    },
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Subscription confirmed.
    Subscribed {
        /// Channel name.
        channel: String,
    },
    /// Unsubscription confirmed.
    Unsubscribed {
        /// Channel name.
        channel: String,
    },
    /// A row changed in a subscribed channel.
    Change {
        /// The change event.
        event: ChangeEvent,
    },
    /// Unread notification count update.
    UnreadCount {
        /// Current unread count.
        count: i64,
    },
    /// Ping (server keepalive).
    Ping {
        /// Server timestamp.
        timestamp: i64,
    },
    /// Error message.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_subscribe_parses() {
        let msg: InboundMessage =
            serde_json::from_str(r#"{"type":"subscribe","channel":"user:abc"}"#).unwrap();
        match msg {
            InboundMessage::Subscribe { channel } => assert_eq!(channel, "user:abc"),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_outbound_is_type_tagged() {
        let json = serde_json::to_value(OutboundMessage::UnreadCount { count: 3 }).unwrap();
        assert_eq!(json["type"], "unread_count");
        assert_eq!(json["count"], 3);
    }
}
