//! Channel registry: tracks channels and their subscriptions.

use dashmap::DashMap;

use crate::hub::ConnectionId;

use super::channel::Channel;
use super::subscription::SubscriptionTracker;
use super::types::ChannelType;

/// Registry of all active pub/sub channels.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    /// Channel → subscriber set.
    channels: DashMap<ChannelType, Channel>,
    /// Subscription tracker (reverse index).
    subscriptions: SubscriptionTracker,
}

impl ChannelRegistry {
    /// Creates a new channel registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a connection to a channel.
    pub fn subscribe(&self, channel: ChannelType, conn_id: ConnectionId) {
        self.channels
            .entry(channel)
            .or_insert_with(|| Channel::new(channel))
            .subscribe(conn_id);
        self.subscriptions.add(conn_id, channel);
    }

    /// Unsubscribes a connection from a channel.
    pub fn unsubscribe(&self, channel: ChannelType, conn_id: ConnectionId) {
        if let Some(mut entry) = self.channels.get_mut(&channel) {
            entry.unsubscribe(conn_id);
            if entry.is_empty() {
                drop(entry);
                self.channels.remove(&channel);
            }
        }
        self.subscriptions.remove(conn_id, &channel);
    }

    /// Unsubscribes a connection from all channels.
    pub fn unsubscribe_all(&self, conn_id: ConnectionId) {
        let channels = self.subscriptions.remove_all(conn_id);
        for channel in &channels {
            if let Some(mut entry) = self.channels.get_mut(channel) {
                entry.unsubscribe(conn_id);
                if entry.is_empty() {
                    drop(entry);
                    self.channels.remove(channel);
                }
            }
        }
    }

    /// Returns all subscriber connection IDs for a channel.
    pub fn get_subscribers(&self, channel: &ChannelType) -> Vec<ConnectionId> {
        self.channels
            .get(channel)
            .map(|ch| ch.get_subscribers())
            .unwrap_or_default()
    }

    /// Returns the subscription count for a connection.
    pub fn subscription_count(&self, conn_id: ConnectionId) -> usize {
        self.subscriptions.count(conn_id)
    }

    /// Returns total number of active channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
