//! Change feed hub: connection registry and event fan-out.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::trace;
use uuid::Uuid;

use huddle_core::config::realtime::RealtimeConfig;
use huddle_core::error::AppError;
use huddle_core::result::AppResult;

use crate::change::ChangeEvent;
use crate::channel::registry::ChannelRegistry;
use crate::channel::types::ChannelType;
use crate::message::OutboundMessage;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// Central fan-out point for the change feed.
///
/// Each WebSocket connection registers an unbounded sender; services
/// publish [`ChangeEvent`]s and the hub forwards them to every
/// connection subscribed to one of the event's channels. Senders whose
/// receiver is gone are dropped on the next send.
#[derive(Debug)]
pub struct ChangeFeedHub {
    registry: ChannelRegistry,
    senders: DashMap<ConnectionId, mpsc::UnboundedSender<OutboundMessage>>,
    max_subscriptions: usize,
}

impl ChangeFeedHub {
    /// Create a hub from the realtime configuration.
    pub fn new(config: &RealtimeConfig) -> Self {
        Self {
            registry: ChannelRegistry::new(),
            senders: DashMap::new(),
            max_subscriptions: config.max_subscriptions_per_connection,
        }
    }

    /// Register a connection and return its ID.
    pub fn connect(&self, sender: mpsc::UnboundedSender<OutboundMessage>) -> ConnectionId {
        let id = Uuid::new_v4();
        self.senders.insert(id, sender);
        id
    }

    /// Deregister a connection and drop all its subscriptions.
    pub fn disconnect(&self, conn_id: ConnectionId) {
        self.registry.unsubscribe_all(conn_id);
        self.senders.remove(&conn_id);
    }

    /// Subscribe a connection to a channel, enforcing the per-connection cap.
    pub fn subscribe(&self, conn_id: ConnectionId, channel: ChannelType) -> AppResult<()> {
        if self.registry.subscription_count(conn_id) >= self.max_subscriptions {
            return Err(AppError::validation("Subscription limit reached"));
        }
        self.registry.subscribe(channel, conn_id);
        Ok(())
    }

    /// Unsubscribe a connection from a channel.
    pub fn unsubscribe(&self, conn_id: ConnectionId, channel: ChannelType) {
        self.registry.unsubscribe(channel, conn_id);
    }

    /// Publish a change event to every subscriber of its channels.
    ///
    /// A connection subscribed to more than one matching channel still
    /// receives the event once.
    pub fn publish(&self, event: ChangeEvent) {
        let mut delivered: Vec<ConnectionId> = Vec::new();
        for channel in event.channels() {
            for conn_id in self.registry.get_subscribers(&channel) {
                if delivered.contains(&conn_id) {
                    continue;
                }
                delivered.push(conn_id);
                self.send_to(conn_id, OutboundMessage::Change {
                    event: event.clone(),
                });
            }
        }
        trace!(subscribers = delivered.len(), "Published change event");
    }

    /// Send a message to every connection subscribed to a user channel.
    pub fn send_to_user(&self, user_id: Uuid, message: OutboundMessage) {
        for conn_id in self.registry.get_subscribers(&ChannelType::User(user_id)) {
            self.send_to(conn_id, message.clone());
        }
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.senders.len()
    }

    fn send_to(&self, conn_id: ConnectionId, message: OutboundMessage) {
        let dead = match self.senders.get(&conn_id) {
            Some(sender) => sender.send(message).is_err(),
            None => false,
        };
        if dead {
            self.disconnect(conn_id);
        }
    }
}
