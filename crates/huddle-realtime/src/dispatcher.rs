//! Notification dispatcher: persists, publishes, and pushes.
//!
//! Every notification follows the same path: write the row, publish
//! the insert on the recipient's change-feed channel, then best-effort
//! push to each registered device. Push failures are logged and never
//! propagate; the persisted row is the source of truth.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use huddle_core::config::push::PushConfig;
use huddle_core::config::realtime::RealtimeConfig;
use huddle_core::result::AppResult;
use huddle_core::retry::{RetryPolicy, retry};
use huddle_core::traits::gateway::PushGateway;
use huddle_core::types::push::PushMessage;
use huddle_database::stores::{DeviceStore, NotificationStore};
use huddle_entity::notification::{NewNotification, Notification};

use crate::change::{ChangeEvent, ChangeRecord};
use crate::dedup::EventDeduplicator;
use crate::hub::ChangeFeedHub;
use crate::message::OutboundMessage;

/// Routes notifications to the notification center, the change feed,
/// and the push gateway.
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationStore>,
    devices: Arc<dyn DeviceStore>,
    push: Arc<dyn PushGateway>,
    hub: Arc<ChangeFeedHub>,
    dedup: EventDeduplicator,
    push_enabled: bool,
    retry_policy: RetryPolicy,
}

impl NotificationDispatcher {
    /// Create a new dispatcher.
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        devices: Arc<dyn DeviceStore>,
        push: Arc<dyn PushGateway>,
        hub: Arc<ChangeFeedHub>,
        push_config: &PushConfig,
        realtime_config: &RealtimeConfig,
    ) -> Self {
        Self {
            notifications,
            devices,
            push,
            hub,
            dedup: EventDeduplicator::new(realtime_config.dedup_window_ms),
            push_enabled: push_config.enabled,
            retry_policy: RetryPolicy::new(
                push_config.retry_attempts,
                push_config.retry_base_delay_ms,
            ),
        }
    }

    /// Deliver a notification: persist, publish, push.
    ///
    /// The push step is deduplicated per (kind, resource, recipient)
    /// within the configured window, so a burst of changes to the same
    /// resource produces one banner. The change feed always carries
    /// every row.
    pub async fn notify(&self, new: NewNotification) -> AppResult<Notification> {
        let stored = self.notifications.insert(&new).await?;

        self.hub
            .publish(ChangeEvent::insert(ChangeRecord::Notification(
                stored.clone(),
            )));
        let unread = self.notifications.count_unread(stored.user_id).await?;
        self.hub
            .send_to_user(stored.user_id, OutboundMessage::UnreadCount { count: unread });

        // Keyed by the payload's resource, not the row id, so repeated
        // notifications about one conversation or event collapse.
        let key = EventDeduplicator::make_key(
            stored.kind.as_str(),
            &stored.payload.0.resource_id().to_string(),
            &stored.user_id.to_string(),
        );
        if self.dedup.should_dispatch(&key) {
            let message = PushMessage::new(
                stored.title.clone(),
                stored.body.clone(),
                json!({ "payload": &stored.payload.0 }),
            );
            self.push_to_devices(stored.user_id, &message).await;
        }

        Ok(stored)
    }

    /// Send a push message to every device registered by the user.
    ///
    /// Failures are logged per device and swallowed; a stale token on
    /// one device must not block the others.
    pub async fn push_to_devices(&self, user_id: Uuid, message: &PushMessage) {
        if !self.push_enabled {
            debug!(user_id = %user_id, "Push delivery disabled, skipping");
            return;
        }

        let devices = match self.devices.list_for_user(user_id).await {
            Ok(devices) => devices,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to list devices for push");
                return;
            }
        };

        for device in devices {
            let result = retry(self.retry_policy, "push.send", || {
                self.push.send(&device.push_token, message)
            })
            .await;

            if let Err(e) = result {
                warn!(
                    user_id = %user_id,
                    device_id = %device.device_id,
                    error = %e,
                    "Push delivery failed"
                );
            }
        }
    }

    /// Publish a change event on the feed without persisting anything.
    pub fn publish(&self, event: ChangeEvent) {
        self.hub.publish(event);
    }

    /// Evict stale dedup entries. Called from the worker's cleanup job.
    pub fn cleanup_dedup(&self) {
        self.dedup.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use huddle_database::memory::{MemoryDeviceStore, MemoryNotificationStore};
    use huddle_entity::device::{DevicePlatform, NewDevice};
    use huddle_entity::notification::NotificationPayload;

    use super::*;
    use crate::channel::types::ChannelType;

    #[derive(Default)]
    struct RecordingPush {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PushGateway for RecordingPush {
        async fn send(&self, token: &str, _message: &PushMessage) -> AppResult<()> {
            self.sent
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(token.to_string());
            Ok(())
        }
    }

    fn dispatcher(
        push: Arc<RecordingPush>,
        devices: Arc<MemoryDeviceStore>,
        hub: Arc<ChangeFeedHub>,
    ) -> NotificationDispatcher {
        NotificationDispatcher::new(
            Arc::new(MemoryNotificationStore::new()),
            devices,
            push,
            hub,
            &PushConfig {
                enabled: true,
                endpoint: String::new(),
                api_key: String::new(),
                timeout_seconds: 1,
                retry_attempts: 1,
                retry_base_delay_ms: 1,
            },
            &RealtimeConfig::default(),
        )
    }

    fn friend_request_notification(user_id: Uuid) -> NewNotification {
        NewNotification {
            user_id,
            title: "New friend request".to_string(),
            body: "Alex wants to connect".to_string(),
            payload: NotificationPayload::FriendRequest {
                request_id: Uuid::new_v4(),
                requester_id: Uuid::new_v4(),
            },
        }
    }

    #[tokio::test]
    async fn test_notify_persists_publishes_and_pushes() {
        let push = Arc::new(RecordingPush::default());
        let devices = Arc::new(MemoryDeviceStore::new());
        let hub = Arc::new(ChangeFeedHub::new(&RealtimeConfig::default()));
        let user_id = Uuid::new_v4();

        devices
            .insert(&NewDevice {
                user_id,
                device_id: "phone-1".to_string(),
                device_name: None,
                platform: DevicePlatform::Ios,
                push_token: "tok-1".to_string(),
            })
            .await
            .unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = hub.connect(tx);
        hub.subscribe(conn, ChannelType::User(user_id)).unwrap();

        let dispatcher = dispatcher(Arc::clone(&push), devices, Arc::clone(&hub));
        let stored = dispatcher
            .notify(friend_request_notification(user_id))
            .await
            .unwrap();
        assert!(!stored.read);

        match rx.recv().await {
            Some(OutboundMessage::Change { event }) => {
                assert!(matches!(event.record, ChangeRecord::Notification(_)));
            }
            other => panic!("unexpected message: {other:?}"),
        }
        match rx.recv().await {
            Some(OutboundMessage::UnreadCount { count }) => assert_eq!(count, 1),
            other => panic!("unexpected message: {other:?}"),
        }

        let sent = push.sent.lock().unwrap();
        assert_eq!(sent.as_slice(), ["tok-1"]);
    }

    fn message_notification(user_id: Uuid, conversation_id: Uuid) -> NewNotification {
        NewNotification {
            user_id,
            title: "New message".to_string(),
            body: "Alex: see you at practice".to_string(),
            payload: NotificationPayload::Message {
                conversation_id,
                message_id: Uuid::new_v4(),
                sender_id: Uuid::new_v4(),
            },
        }
    }

    #[tokio::test]
    async fn test_message_burst_collapses_to_one_push() {
        let push = Arc::new(RecordingPush::default());
        let devices = Arc::new(MemoryDeviceStore::new());
        let hub = Arc::new(ChangeFeedHub::new(&RealtimeConfig::default()));
        let user_id = Uuid::new_v4();
        let conversation_id = Uuid::new_v4();

        devices
            .insert(&NewDevice {
                user_id,
                device_id: "phone-1".to_string(),
                device_name: None,
                platform: DevicePlatform::Ios,
                push_token: "tok-1".to_string(),
            })
            .await
            .unwrap();

        let dispatcher = dispatcher(Arc::clone(&push), devices, hub);
        for _ in 0..3 {
            dispatcher
                .notify(message_notification(user_id, conversation_id))
                .await
                .unwrap();
        }

        // Distinct message ids, same conversation and recipient: the
        // window suppresses all but the first banner.
        let sent = push.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_conversations_each_push() {
        let push = Arc::new(RecordingPush::default());
        let devices = Arc::new(MemoryDeviceStore::new());
        let hub = Arc::new(ChangeFeedHub::new(&RealtimeConfig::default()));
        let user_id = Uuid::new_v4();

        devices
            .insert(&NewDevice {
                user_id,
                device_id: "phone-1".to_string(),
                device_name: None,
                platform: DevicePlatform::Ios,
                push_token: "tok-1".to_string(),
            })
            .await
            .unwrap();

        let dispatcher = dispatcher(Arc::clone(&push), devices, hub);
        dispatcher
            .notify(message_notification(user_id, Uuid::new_v4()))
            .await
            .unwrap();
        dispatcher
            .notify(message_notification(user_id, Uuid::new_v4()))
            .await
            .unwrap();

        let sent = push.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
    }

    #[tokio::test]
    async fn test_push_failure_does_not_fail_notify() {
        struct FailingPush;

        #[async_trait]
        impl PushGateway for FailingPush {
            async fn send(&self, _token: &str, _message: &PushMessage) -> AppResult<()> {
                Err(huddle_core::error::AppError::new(
                    huddle_core::error::ErrorKind::Push,
                    "gateway down",
                ))
            }
        }

        let devices = Arc::new(MemoryDeviceStore::new());
        let user_id = Uuid::new_v4();
        devices
            .insert(&NewDevice {
                user_id,
                device_id: "phone-1".to_string(),
                device_name: None,
                platform: DevicePlatform::Android,
                push_token: "tok-1".to_string(),
            })
            .await
            .unwrap();

        let dispatcher = NotificationDispatcher::new(
            Arc::new(MemoryNotificationStore::new()),
            devices,
            Arc::new(FailingPush),
            Arc::new(ChangeFeedHub::new(&RealtimeConfig::default())),
            &PushConfig {
                enabled: true,
                endpoint: String::new(),
                api_key: String::new(),
                timeout_seconds: 1,
                retry_attempts: 1,
                retry_base_delay_ms: 1,
            },
            &RealtimeConfig::default(),
        );

        let result = dispatcher.notify(friend_request_notification(user_id)).await;
        assert!(result.is_ok());
    }
}
