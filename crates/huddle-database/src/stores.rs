//! Store traits over the Huddle schema.
//!
//! Services program against these traits. `repositories` provides the
//! PostgreSQL implementations; `memory` provides Tokio-mutex HashMap
//! implementations with the same semantics (including uniqueness
//! conflicts) for tests and single-node demos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::conversation::{Conversation, ParticipantSlot};
use huddle_entity::device::{Device, NewDevice};
use huddle_entity::event::{NewTeamEvent, TeamEvent};
use huddle_entity::feed::FeedToken;
use huddle_entity::friendship::{FriendRequest, Friendship, NewFriendRequest, NewFriendship};
use huddle_entity::message::{Message, NewMessage};
use huddle_entity::notification::{NewNotification, Notification};
use huddle_entity::reminder::{EventReminder, NewEventReminder, ReminderStatus};
use huddle_entity::user::{UpsertUser, User};

/// Outcome of an external-event upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new row was inserted.
    Created,
    /// An existing row was rewritten with different schedule fields.
    Updated,
    /// The row already matched; nothing changed.
    Unchanged,
}

/// Conversation rows. The unique index on the canonical pair is the
/// sole synchronization primitive for concurrent resolution.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Find a conversation by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Conversation>>;

    /// Find the conversation for an already-canonical pair.
    async fn find_by_pair(&self, p1: Uuid, p2: Uuid) -> AppResult<Option<Conversation>>;

    /// Insert a conversation for an already-canonical pair.
    ///
    /// Fails with `ErrorKind::Conflict` if a concurrent caller
    /// inserted the same pair first.
    async fn insert(&self, p1: Uuid, p2: Uuid) -> AppResult<Conversation>;

    /// Advance `last_message_at`.
    async fn touch_last_message(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Advance one participant's read high-water mark.
    async fn set_last_read(
        &self,
        id: Uuid,
        slot: ParticipantSlot,
        at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// List all conversations involving a user, most recent first.
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Conversation>>;
}

/// Message rows.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a new message.
    async fn insert(&self, message: &NewMessage) -> AppResult<Message>;

    /// Fetch the most recent `limit` messages, descending by creation
    /// time. Callers reverse locally for chronological display.
    async fn recent(&self, conversation_id: Uuid, limit: u32) -> AppResult<Vec<Message>>;

    /// Mark all unread messages from `sender_id` in the conversation
    /// as read. Returns the number of rows flipped.
    async fn mark_read_from(&self, conversation_id: Uuid, sender_id: Uuid) -> AppResult<u64>;

    /// Count unread messages authored by `sender_id` in the conversation.
    async fn count_unread_from(&self, conversation_id: Uuid, sender_id: Uuid) -> AppResult<i64>;
}

/// Friend requests and friendship edges.
#[async_trait]
pub trait FriendshipStore: Send + Sync {
    /// Create a friend request.
    async fn insert_request(&self, request: &NewFriendRequest) -> AppResult<FriendRequest>;

    /// Find a request by ID.
    async fn find_request(&self, id: Uuid) -> AppResult<Option<FriendRequest>>;

    /// List pending requests addressed to a user.
    async fn pending_requests_for(&self, user_id: Uuid) -> AppResult<Vec<FriendRequest>>;

    /// Atomically mark a pending request accepted and create both
    /// directional edges in one transaction. Fails with
    /// `ErrorKind::Conflict` if the request is no longer pending.
    async fn accept_request(
        &self,
        request_id: Uuid,
        edges: (NewFriendship, NewFriendship),
    ) -> AppResult<(Friendship, Friendship)>;

    /// Mark a pending request declined. Fails with
    /// `ErrorKind::Conflict` if the request is no longer pending.
    async fn decline_request(&self, request_id: Uuid) -> AppResult<()>;

    /// Find the directional edge owned by `user_id` toward `friend_id`.
    async fn find_edge(&self, user_id: Uuid, friend_id: Uuid) -> AppResult<Option<Friendship>>;

    /// List all edges owned by a user.
    async fn list_friends(&self, user_id: Uuid) -> AppResult<Vec<Friendship>>;

    /// Delete both directional edges between two users in one
    /// transaction. Returns the number of rows removed.
    async fn delete_edges(&self, user_id: Uuid, friend_id: Uuid) -> AppResult<u64>;
}

/// Notification rows.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a notification.
    async fn insert(&self, notification: &NewNotification) -> AppResult<Notification>;

    /// List a user's notifications, most recent first.
    async fn list_for_user(&self, user_id: Uuid, limit: u32) -> AppResult<Vec<Notification>>;

    /// Mark one notification read.
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<()>;

    /// Mark all of a user's notifications read. Returns rows flipped.
    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64>;

    /// Delete one notification. Returns whether a row was removed.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;

    /// Delete all of a user's notifications. Returns rows removed.
    async fn delete_all(&self, user_id: Uuid) -> AppResult<u64>;

    /// Count a user's unread notifications.
    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64>;

    /// Delete notifications created before the cutoff.
    async fn delete_older_than(&self, before: DateTime<Utc>) -> AppResult<u64>;

    /// Keep only the newest `keep` notifications per user.
    async fn trim_per_user(&self, keep: i64) -> AppResult<u64>;
}

/// Device / push-token rows.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Find a user's row holding the given push token.
    async fn find_by_token(&self, user_id: Uuid, push_token: &str) -> AppResult<Option<Device>>;

    /// Find a user's row for the given device identifier.
    async fn find_by_device(&self, user_id: Uuid, device_id: &str) -> AppResult<Option<Device>>;

    /// Insert a device row. Fails with `ErrorKind::Conflict` if the
    /// (user, token) pair already exists.
    async fn insert(&self, device: &NewDevice) -> AppResult<Device>;

    /// Delete a row by ID. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Refresh a row's `last_active` timestamp.
    async fn touch_last_active(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// List a user's registered devices.
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Device>>;

    /// Delete devices whose `last_active` predates the cutoff.
    async fn delete_inactive_since(&self, before: DateTime<Utc>) -> AppResult<u64>;
}

/// Scheduled reminder rows.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Persist a reminder row in `pending` status.
    async fn insert(&self, reminder: &NewEventReminder) -> AppResult<EventReminder>;

    /// Find a reminder by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<EventReminder>>;

    /// List a user's reminders in any of the given statuses.
    async fn list_in_status(
        &self,
        user_id: Uuid,
        statuses: &[ReminderStatus],
    ) -> AppResult<Vec<EventReminder>>;

    /// List deliverable reminders whose trigger time has passed.
    async fn due_before(&self, at: DateTime<Utc>) -> AppResult<Vec<EventReminder>>;

    /// Guarded status transition: move the row to `to` only if its
    /// current status is in `from`. Returns whether the transition
    /// happened, which makes sweep and event paths idempotent.
    async fn set_status(
        &self,
        id: Uuid,
        from: &[ReminderStatus],
        to: ReminderStatus,
    ) -> AppResult<bool>;

    /// Mark all deliverable reminders for an event cancelled.
    async fn cancel_for_event(&self, event_id: Uuid) -> AppResult<u64>;

    /// Delete a reminder row. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Delete terminal rows created before the cutoff.
    async fn delete_finished_before(&self, before: DateTime<Utc>) -> AppResult<u64>;
}

/// Team event rows.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Find an event by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TeamEvent>>;

    /// List a user's events, ascending by start time.
    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<TeamEvent>>;

    /// Insert a manually created event.
    async fn insert(&self, event: &NewTeamEvent) -> AppResult<TeamEvent>;

    /// Upsert a platform-synced event keyed by (owner, external_id).
    async fn upsert_external(&self, event: &NewTeamEvent)
    -> AppResult<(TeamEvent, UpsertOutcome)>;

    /// Delete an event owned by the user. Returns whether a row was
    /// removed.
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool>;
}

/// Calendar feed token rows.
#[async_trait]
pub trait FeedTokenStore: Send + Sync {
    /// Find a user's current token.
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<FeedToken>>;

    /// Resolve a token back to its owner.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<FeedToken>>;

    /// Install a new token for the user, replacing any previous one.
    async fn replace(&self, user_id: Uuid, token: &str) -> AppResult<FeedToken>;
}

/// User profile rows.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a profile by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Create or update a profile.
    async fn upsert(&self, user: &UpsertUser) -> AppResult<User>;
}
