//! Shared helpers for the HTTP API integration tests.
//!
//! Tests run against the full router wired over in-memory stores, so
//! no database or external gateway is needed.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use huddle_api::extractors::auth::issue_token;
use huddle_api::{AppState, build_router};
use huddle_connect::{MailClient, NoopLocalScheduler, OAuthClient, PushClient, TeamPlatformClient};
use huddle_core::config::app::{CorsConfig, ServerConfig};
use huddle_core::config::auth::AuthConfig;
use huddle_core::config::feed::FeedConfig;
use huddle_core::config::mail::MailConfig;
use huddle_core::config::platform::PlatformConfig;
use huddle_core::config::push::PushConfig;
use huddle_core::config::{AppConfig, DatabaseConfig};
use huddle_database::memory::{
    MemoryConversationStore, MemoryDeviceStore, MemoryEventStore, MemoryFeedTokenStore,
    MemoryFriendshipStore, MemoryMessageStore, MemoryNotificationStore, MemoryReminderStore,
    MemoryUserStore,
};
use huddle_entity::user::UpsertUser;
use huddle_realtime::dispatcher::NotificationDispatcher;
use huddle_realtime::hub::ChangeFeedHub;
use huddle_service::{
    CalendarFeedService, ChatService, DeviceRegistrar, FriendService, InviteService,
    NotificationService, PlatformSyncService, ReminderReconciler, ScheduleService,
};

/// A request outcome with the body already decoded as JSON.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Test application over in-memory stores.
pub struct TestApp {
    pub router: Router,
    pub config: AppConfig,
    pub users: Arc<MemoryUserStore>,
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            shutdown_grace_seconds: 1,
            cors: CorsConfig {
                allowed_origins: vec!["*".to_string()],
            },
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            token_lifetime_minutes: 60,
        },
        chat: Default::default(),
        feed: FeedConfig {
            base_url: "http://test.local".to_string(),
            calendar_name: "Test Schedule".to_string(),
        },
        push: PushConfig {
            enabled: false,
            endpoint: "http://push.invalid".to_string(),
            api_key: String::new(),
            timeout_seconds: 1,
            retry_attempts: 1,
            retry_base_delay_ms: 1,
        },
        mail: MailConfig {
            enabled: false,
            endpoint: "http://mail.invalid".to_string(),
            api_key: String::new(),
            from_address: "no-reply@test.local".to_string(),
            timeout_seconds: 1,
        },
        platform: PlatformConfig {
            enabled: false,
            client_id: String::new(),
            client_secret: String::new(),
            authorize_url: "http://platform.invalid/authorize".to_string(),
            token_url: "http://platform.invalid/token".to_string(),
            api_base_url: "http://platform.invalid".to_string(),
            redirect_uri: "http://test.local/redirect".to_string(),
            timeout_seconds: 1,
        },
        worker: Default::default(),
        realtime: Default::default(),
        logging: Default::default(),
    }
}

impl TestApp {
    /// Build the full router over fresh in-memory stores.
    pub fn new() -> Self {
        let config = test_config();

        let users = Arc::new(MemoryUserStore::new());
        let conversations = Arc::new(MemoryConversationStore::new());
        let messages = Arc::new(MemoryMessageStore::new());
        let friendships = Arc::new(MemoryFriendshipStore::new());
        let notifications = Arc::new(MemoryNotificationStore::new());
        let devices = Arc::new(MemoryDeviceStore::new());
        let reminders = Arc::new(MemoryReminderStore::new());
        let events = Arc::new(MemoryEventStore::new());
        let feed_tokens = Arc::new(MemoryFeedTokenStore::new());

        let push = Arc::new(PushClient::new(&config.push).expect("push client"));
        let mailer = Arc::new(MailClient::new(&config.mail).expect("mail client"));
        let oauth = Arc::new(OAuthClient::new(&config.platform).expect("oauth client"));
        let platform =
            Arc::new(TeamPlatformClient::new(&config.platform).expect("platform client"));

        let hub = Arc::new(ChangeFeedHub::new(&config.realtime));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            notifications.clone(),
            devices.clone(),
            push,
            Arc::clone(&hub),
            &config.push,
            &config.realtime,
        ));

        let chat = Arc::new(ChatService::new(
            conversations.clone(),
            messages.clone(),
            users.clone(),
            Arc::clone(&dispatcher),
            config.chat.clone(),
        ));
        let friends = Arc::new(FriendService::new(
            friendships.clone(),
            users.clone(),
            Arc::clone(&dispatcher),
        ));
        let notification_service = Arc::new(NotificationService::new(notifications.clone()));
        let registrar = Arc::new(DeviceRegistrar::new(devices.clone()));
        let reconciler = Arc::new(ReminderReconciler::new(
            reminders.clone(),
            Arc::clone(&dispatcher),
            Arc::new(NoopLocalScheduler),
        ));
        let schedule = Arc::new(ScheduleService::new(
            events.clone(),
            friendships.clone(),
            Arc::clone(&reconciler),
            Arc::clone(&dispatcher),
        ));
        let feed = Arc::new(CalendarFeedService::new(
            feed_tokens,
            events.clone(),
            &config.feed,
        ));
        let sync = Arc::new(PlatformSyncService::new(
            platform,
            events.clone(),
            Arc::clone(&schedule),
            Arc::clone(&reconciler),
        ));
        let invites = Arc::new(InviteService::new(events, users.clone(), mailer));

        let state = AppState {
            config: Arc::new(config.clone()),
            hub,
            conversations,
            users: users.clone(),
            chat,
            friends,
            notifications: notification_service,
            devices: registrar,
            reminders: reconciler,
            schedule,
            feed,
            sync,
            invites,
            oauth,
            pkce_verifiers: Arc::new(dashmap::DashMap::new()),
        };

        Self {
            router: build_router(state),
            config,
            users,
        }
    }

    /// Create a user row and return a bearer token for it.
    pub async fn create_user(&self, display_name: &str) -> (Uuid, String) {
        use huddle_database::stores::UserStore;

        let id = Uuid::new_v4();
        self.users
            .upsert(&UpsertUser {
                id,
                email: Some(format!("{display_name}@test.local")),
                display_name: Some(display_name.to_string()),
                photo_url: None,
            })
            .await
            .expect("upsert test user");
        let token = issue_token(id, &self.config.auth).expect("issue token");
        (id, token)
    }

    /// Issue a JSON request against the router.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }

    /// Issue a request and return the raw body as text.
    pub async fn request_text(&self, uri: &str) -> (StatusCode, String, Option<String>) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        (
            status,
            String::from_utf8_lossy(&bytes).into_owned(),
            content_type,
        )
    }
}
