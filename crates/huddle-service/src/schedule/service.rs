//! Team event CRUD with follower notifications.

use std::sync::Arc;

use uuid::Uuid;

use huddle_core::error::AppError;
use huddle_core::result::AppResult;
use huddle_database::stores::{EventStore, FriendshipStore};
use huddle_entity::event::{EventSource, NewTeamEvent, TeamEvent};
use huddle_entity::friendship::FriendRole;
use huddle_entity::notification::{NewNotification, NotificationPayload};
use huddle_realtime::dispatcher::NotificationDispatcher;

use crate::reminder::ReminderReconciler;

/// Schedule use cases over the event store.
///
/// Followers are the owner's friends holding at least viewer access;
/// they are notified of new and removed events.
pub struct ScheduleService {
    events: Arc<dyn EventStore>,
    friendships: Arc<dyn FriendshipStore>,
    reminders: Arc<ReminderReconciler>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl ScheduleService {
    /// Creates a new schedule service.
    pub fn new(
        events: Arc<dyn EventStore>,
        friendships: Arc<dyn FriendshipStore>,
        reminders: Arc<ReminderReconciler>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            events,
            friendships,
            reminders,
            dispatcher,
        }
    }

    /// Create a manually entered event and notify followers.
    pub async fn create_event(&self, owner_id: Uuid, new: NewTeamEvent) -> AppResult<TeamEvent> {
        if new.owner_id != owner_id {
            return Err(AppError::authorization("Owner mismatch"));
        }
        if new.title.trim().is_empty() {
            return Err(AppError::validation("Event title is empty"));
        }
        if let Some(ends_at) = new.ends_at {
            if ends_at < new.starts_at {
                return Err(AppError::validation("Event ends before it starts"));
            }
        }

        let created = self
            .events
            .insert(&NewTeamEvent {
                source: EventSource::Manual,
                external_id: None,
                ..new
            })
            .await?;

        self.notify_followers(
            owner_id,
            format!("New event: {}", created.title),
            created.team_name.clone(),
            NotificationPayload::NewEvent {
                event_id: created.id,
            },
        )
        .await?;
        Ok(created)
    }

    /// Fetch one event, visible to its owner and the owner's friends.
    pub async fn get_event(&self, viewer_id: Uuid, event_id: Uuid) -> AppResult<TeamEvent> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event not found"))?;
        if event.owner_id != viewer_id {
            let edge = self
                .friendships
                .find_edge(event.owner_id, viewer_id)
                .await?;
            let allowed = edge.is_some_and(|e| e.role != FriendRole::None);
            if !allowed {
                return Err(AppError::authorization("No access to this schedule"));
            }
        }
        Ok(event)
    }

    /// List a schedule, visible to its owner and the owner's friends.
    pub async fn list_events(&self, viewer_id: Uuid, owner_id: Uuid) -> AppResult<Vec<TeamEvent>> {
        if viewer_id != owner_id {
            let edge = self.friendships.find_edge(owner_id, viewer_id).await?;
            let allowed = edge.is_some_and(|e| e.role != FriendRole::None);
            if !allowed {
                return Err(AppError::authorization("No access to this schedule"));
            }
        }
        self.events.list_for_owner(owner_id).await
    }

    /// Delete an event, cancel its reminders, and notify followers.
    pub async fn delete_event(&self, owner_id: Uuid, event_id: Uuid) -> AppResult<()> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event not found"))?;
        if !self.events.delete(event_id, owner_id).await? {
            return Err(AppError::not_found("Event not found"));
        }

        self.reminders.cancel_for_event(event_id).await?;
        self.notify_followers(
            owner_id,
            format!("Cancelled: {}", event.title),
            event.team_name.clone(),
            NotificationPayload::ScheduleChange {
                event_id,
                description: "Event removed from the schedule".to_string(),
            },
        )
        .await?;
        Ok(())
    }

    pub(crate) async fn notify_followers(
        &self,
        owner_id: Uuid,
        title: String,
        body: String,
        payload: NotificationPayload,
    ) -> AppResult<()> {
        for edge in self.friendships.list_friends(owner_id).await? {
            if edge.role == FriendRole::None {
                continue;
            }
            self.dispatcher
                .notify(NewNotification {
                    user_id: edge.friend_id,
                    title: title.clone(),
                    body: body.clone(),
                    payload: payload.clone(),
                })
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use huddle_core::config::push::PushConfig;
    use huddle_core::config::realtime::RealtimeConfig;
    use huddle_core::traits::gateway::{LocalNotificationScheduler, PushGateway};
    use huddle_core::types::push::PushMessage;
    use huddle_database::memory::{
        MemoryDeviceStore, MemoryEventStore, MemoryFriendshipStore, MemoryNotificationStore,
        MemoryReminderStore,
    };
    use huddle_database::stores::{NotificationStore, ReminderStore};
    use huddle_entity::friendship::NewFriendRequest;
    use huddle_entity::reminder::{NewEventReminder, ReminderStatus};
    use huddle_realtime::hub::ChangeFeedHub;

    use super::*;

    struct NullPush;

    #[async_trait::async_trait]
    impl PushGateway for NullPush {
        async fn send(&self, _token: &str, _message: &PushMessage) -> AppResult<()> {
            Ok(())
        }
    }

    struct NullScheduler;

    #[async_trait::async_trait]
    impl LocalNotificationScheduler for NullScheduler {
        async fn schedule(
            &self,
            _local_id: i32,
            _title: &str,
            _body: &str,
            _at: chrono::DateTime<Utc>,
        ) -> AppResult<()> {
            Ok(())
        }

        async fn cancel(&self, _local_id: i32) -> AppResult<()> {
            Ok(())
        }
    }

    struct Fixture {
        schedule: ScheduleService,
        friendships: Arc<MemoryFriendshipStore>,
        reminders: Arc<MemoryReminderStore>,
        notifications: Arc<MemoryNotificationStore>,
    }

    fn fixture() -> Fixture {
        let notifications = Arc::new(MemoryNotificationStore::new());
        let reminders = Arc::new(MemoryReminderStore::new());
        let friendships = Arc::new(MemoryFriendshipStore::new());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&notifications) as Arc<dyn NotificationStore>,
            Arc::new(MemoryDeviceStore::new()),
            Arc::new(NullPush),
            Arc::new(ChangeFeedHub::new(&RealtimeConfig::default())),
            &PushConfig {
                enabled: false,
                endpoint: String::new(),
                api_key: String::new(),
                timeout_seconds: 1,
                retry_attempts: 1,
                retry_base_delay_ms: 1,
            },
            &RealtimeConfig::default(),
        ));
        let reconciler = Arc::new(ReminderReconciler::new(
            Arc::clone(&reminders) as Arc<dyn ReminderStore>,
            Arc::clone(&dispatcher),
            Arc::new(NullScheduler),
        ));
        Fixture {
            schedule: ScheduleService::new(
                Arc::new(MemoryEventStore::new()),
                Arc::clone(&friendships) as Arc<dyn FriendshipStore>,
                reconciler,
                dispatcher,
            ),
            friendships,
            reminders,
            notifications,
        }
    }

    fn new_event(owner_id: Uuid) -> NewTeamEvent {
        NewTeamEvent {
            owner_id,
            team_name: "U12 Tigers".to_string(),
            title: "League match".to_string(),
            location: Some("East field".to_string()),
            starts_at: Utc::now() + Duration::days(1),
            ends_at: None,
            source: EventSource::Manual,
            external_id: None,
        }
    }

    async fn befriend(store: &MemoryFriendshipStore, owner: Uuid, friend: Uuid) {
        let request = store
            .insert_request(&NewFriendRequest {
                requester_id: friend,
                requested_id: owner,
                role: FriendRole::Viewer,
            })
            .await
            .unwrap();
        let fetched = store.find_request(request.id).await.unwrap().unwrap();
        store
            .accept_request(request.id, fetched.edges_on_accept())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_notifies_followers() {
        let f = fixture();
        let (owner, friend) = (Uuid::new_v4(), Uuid::new_v4());
        befriend(&f.friendships, owner, friend).await;

        f.schedule.create_event(owner, new_event(owner)).await.unwrap();
        assert_eq!(f.notifications.count_unread(friend).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_cancels_reminders() {
        let f = fixture();
        let owner = Uuid::new_v4();
        let event = f.schedule.create_event(owner, new_event(owner)).await.unwrap();
        let reminder = f
            .reminders
            .insert(&NewEventReminder {
                user_id: owner,
                event_id: event.id,
                title: "Reminder".to_string(),
                body: "Starts soon".to_string(),
                trigger_time: event.starts_at - Duration::hours(1),
            })
            .await
            .unwrap();

        f.schedule.delete_event(owner, event.id).await.unwrap();
        assert_eq!(
            f.reminders
                .find_by_id(reminder.id)
                .await
                .unwrap()
                .unwrap()
                .status,
            ReminderStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_stranger_cannot_list_schedule() {
        let f = fixture();
        let (owner, stranger) = (Uuid::new_v4(), Uuid::new_v4());
        f.schedule.create_event(owner, new_event(owner)).await.unwrap();

        let err = f.schedule.list_events(stranger, owner).await.unwrap_err();
        assert_eq!(err.kind, huddle_core::error::ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_friend_can_list_schedule() {
        let f = fixture();
        let (owner, friend) = (Uuid::new_v4(), Uuid::new_v4());
        befriend(&f.friendships, owner, friend).await;
        f.schedule.create_event(owner, new_event(owner)).await.unwrap();

        let events = f.schedule.list_events(friend, owner).await.unwrap();
        assert_eq!(events.len(), 1);
    }
}
