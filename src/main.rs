//! Huddle server entry point.
//!
//! Wires configuration, the database, outbound gateways, services,
//! the background worker, and the HTTP/WebSocket router together.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use huddle_api::AppState;
use huddle_connect::{MailClient, NoopLocalScheduler, OAuthClient, PushClient, TeamPlatformClient};
use huddle_core::config::AppConfig;
use huddle_core::error::AppError;
use huddle_database::DatabasePool;
use huddle_database::repositories::{
    conversation::PgConversationStore, device::PgDeviceStore, event::PgEventStore,
    feed::PgFeedTokenStore, friendship::PgFriendshipStore, message::PgMessageStore,
    notification::PgNotificationStore, reminder::PgReminderStore, user::PgUserStore,
};
use huddle_realtime::dispatcher::NotificationDispatcher;
use huddle_realtime::hub::ChangeFeedHub;
use huddle_service::{
    CalendarFeedService, ChatService, DeviceRegistrar, FriendService, InviteService,
    NotificationService, PlatformSyncService, ReminderReconciler, ScheduleService,
};
use huddle_worker::WorkerScheduler;
use huddle_worker::jobs::{DeviceCleanupJob, NotificationCleanupJob, ReminderDispatchJob};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load the base configuration plus an environment overlay file.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("HUDDLE_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("HUDDLE_ENV").unwrap_or_else(|_| "development".to_string());
    let overlay = format!("config/{env}.toml");

    AppConfig::load_layered(&config_path, &overlay)
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Huddle v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database).await?;
    huddle_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    // ── Stores ───────────────────────────────────────────────────
    let pool = db.pool().clone();
    let users = Arc::new(PgUserStore::new(pool.clone()));
    let conversations = Arc::new(PgConversationStore::new(pool.clone()));
    let messages = Arc::new(PgMessageStore::new(pool.clone()));
    let friendships = Arc::new(PgFriendshipStore::new(pool.clone()));
    let notifications = Arc::new(PgNotificationStore::new(pool.clone()));
    let devices = Arc::new(PgDeviceStore::new(pool.clone()));
    let reminders = Arc::new(PgReminderStore::new(pool.clone()));
    let events = Arc::new(PgEventStore::new(pool.clone()));
    let feed_tokens = Arc::new(PgFeedTokenStore::new(pool.clone()));

    // ── Outbound gateways ────────────────────────────────────────
    let push = Arc::new(PushClient::new(&config.push)?);
    let mailer = Arc::new(MailClient::new(&config.mail)?);
    let oauth = Arc::new(OAuthClient::new(&config.platform)?);
    let platform = Arc::new(TeamPlatformClient::new(&config.platform)?);
    let local_scheduler = Arc::new(NoopLocalScheduler);

    // ── Realtime hub + dispatcher ────────────────────────────────
    let hub = Arc::new(ChangeFeedHub::new(&config.realtime));
    let dispatcher = Arc::new(NotificationDispatcher::new(
        notifications.clone(),
        devices.clone(),
        push,
        Arc::clone(&hub),
        &config.push,
        &config.realtime,
    ));

    // ── Services ─────────────────────────────────────────────────
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
        local_scheduler,
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

    // ── Background worker ────────────────────────────────────────
    let mut worker = WorkerScheduler::new(
        &config.worker,
        Arc::new(ReminderDispatchJob::new(
            Arc::clone(&reconciler),
            reminders,
            config.worker.reminder_retention_days,
        )),
        Arc::new(NotificationCleanupJob::new(
            notifications,
            config.worker.notification_retention_days,
            config.worker.max_notifications_per_user,
        )),
        Arc::new(DeviceCleanupJob::new(
            devices,
            config.worker.device_inactive_days,
        )),
    )
    .await?;
    worker.start().await?;

    // ── HTTP server ──────────────────────────────────────────────
    let state = AppState {
        config: Arc::new(config.clone()),
        hub,
        conversations,
        users,
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

    let app = huddle_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Huddle server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Shutting down...");
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    if tokio::time::timeout(grace, worker.shutdown()).await.is_err() {
        tracing::warn!("Worker shutdown timed out");
    }
    db.close().await;
    tracing::info!("Huddle server shut down gracefully");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
