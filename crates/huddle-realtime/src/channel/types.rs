//! Channel type definitions and parsing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Typed channel identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum ChannelType {
    /// Personal user channel: notifications, reminders, conversation
    /// list updates.
    User(Uuid),
    /// Conversation channel: message inserts and read-flag updates.
    Conversation(Uuid),
}

impl ChannelType {
    /// Parses a channel string into a typed channel.
    pub fn parse(channel: &str) -> Option<Self> {
        let parts: Vec<&str> = channel.splitn(2, ':').collect();
        match parts.as_slice() {
            ["user", id] => Uuid::parse_str(id).ok().map(ChannelType::User),
            ["conversation", id] => Uuid::parse_str(id).ok().map(ChannelType::Conversation),
            _ => None,
        }
    }

    /// Converts back to a channel string.
    pub fn to_channel_string(&self) -> String {
        match self {
            ChannelType::User(id) => format!("user:{id}"),
            ChannelType::Conversation(id) => format!("conversation:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        let id = Uuid::new_v4();
        let channel = ChannelType::Conversation(id);
        let s = channel.to_channel_string();
        assert_eq!(ChannelType::parse(&s), Some(channel));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(ChannelType::parse("folder:abc"), None);
        assert_eq!(ChannelType::parse("user:not-a-uuid"), None);
        assert_eq!(ChannelType::parse("user"), None);
    }
}
