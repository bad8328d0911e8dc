//! Application state shared across all handlers.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use huddle_connect::OAuthClient;
use huddle_core::config::AppConfig;
use huddle_database::stores::{ConversationStore, UserStore};
use huddle_realtime::hub::ChangeFeedHub;
use huddle_service::{
    CalendarFeedService, ChatService, DeviceRegistrar, FriendService, InviteService,
    NotificationService, PlatformSyncService, ReminderReconciler, ScheduleService,
};

/// Application state passed to every handler via `State<AppState>`.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Change-feed hub for WebSocket connections.
    pub hub: Arc<ChangeFeedHub>,
    /// Conversation rows, used for channel authorization.
    pub conversations: Arc<dyn ConversationStore>,
    /// User profiles.
    pub users: Arc<dyn UserStore>,
    /// Chat use cases.
    pub chat: Arc<ChatService>,
    /// Friend lifecycle use cases.
    pub friends: Arc<FriendService>,
    /// Notification center.
    pub notifications: Arc<NotificationService>,
    /// Push-token registrar.
    pub devices: Arc<DeviceRegistrar>,
    /// Reminder lifecycle.
    pub reminders: Arc<ReminderReconciler>,
    /// Team schedule use cases.
    pub schedule: Arc<ScheduleService>,
    /// Calendar feed.
    pub feed: Arc<CalendarFeedService>,
    /// Platform synchronization.
    pub sync: Arc<PlatformSyncService>,
    /// Event email invites.
    pub invites: Arc<InviteService>,
    /// OAuth client for the team platform.
    pub oauth: Arc<OAuthClient>,
    /// In-flight PKCE verifiers keyed by OAuth state.
    pub pkce_verifiers: Arc<DashMap<String, PendingVerifier>>,
}

/// How long a PKCE verifier waits for its callback before it expires.
pub const VERIFIER_TTL_MINUTES: i64 = 10;

/// A PKCE verifier awaiting the OAuth callback for its state value.
///
/// Abandoned flows never see a callback, so entries carry their
/// creation time and are swept once the TTL lapses.
#[derive(Debug, Clone)]
pub struct PendingVerifier {
    /// The code verifier to present at token exchange.
    pub verifier: String,
    /// When the authorize URL was issued.
    pub created_at: DateTime<Utc>,
}

impl PendingVerifier {
    /// Record a verifier issued now.
    pub fn new(verifier: String) -> Self {
        Self {
            verifier,
            created_at: Utc::now(),
        }
    }

    /// Whether the TTL has lapsed as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::minutes(VERIFIER_TTL_MINUTES)
    }
}

/// Drop verifiers whose flow was abandoned. Runs opportunistically on
/// every connect, so the map stays bounded by recent flow starts.
pub fn sweep_expired_verifiers(map: &DashMap<String, PendingVerifier>, now: DateTime<Utc>) {
    map.retain(|_, pending| !pending.is_expired(now));
}
