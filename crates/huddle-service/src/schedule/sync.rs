//! Pull-based synchronization with the third-party team platform.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_core::traits::gateway::TeamPlatform;
use huddle_database::stores::{EventStore, UpsertOutcome};
use huddle_entity::event::{EventSource, NewTeamEvent};
use huddle_entity::notification::NotificationPayload;

use crate::reminder::ReminderReconciler;
use crate::schedule::ScheduleService;

/// Counts from one synchronization run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SyncSummary {
    /// Events seen for the first time.
    pub created: u64,
    /// Events whose schedule fields changed.
    pub updated: u64,
    /// Events already up to date.
    pub unchanged: u64,
}

/// Mirrors a user's platform teams into their Huddle schedule.
///
/// Events are keyed by (owner, platform event id); re-running a sync
/// is idempotent and only notifies on actual change.
pub struct PlatformSyncService {
    platform: Arc<dyn TeamPlatform>,
    events: Arc<dyn EventStore>,
    schedule: Arc<ScheduleService>,
    reminders: Arc<ReminderReconciler>,
}

impl PlatformSyncService {
    /// Creates a new sync service.
    pub fn new(
        platform: Arc<dyn TeamPlatform>,
        events: Arc<dyn EventStore>,
        schedule: Arc<ScheduleService>,
        reminders: Arc<ReminderReconciler>,
    ) -> Self {
        Self {
            platform,
            events,
            schedule,
            reminders,
        }
    }

    /// Pull every team visible to the access token and upsert its
    /// events into the owner's schedule.
    pub async fn sync_account(&self, owner_id: Uuid, access_token: &str) -> AppResult<SyncSummary> {
        let mut summary = SyncSummary::default();
        for team in self.platform.fetch_teams(access_token).await? {
            for event in self.platform.fetch_events(access_token, &team.id).await? {
                let incoming = NewTeamEvent {
                    owner_id,
                    team_name: team.name.clone(),
                    title: event.title,
                    location: event.location,
                    starts_at: event.starts_at,
                    ends_at: event.ends_at,
                    source: EventSource::Platform,
                    external_id: Some(event.id),
                };
                let (stored, outcome) = self.events.upsert_external(&incoming).await?;
                match outcome {
                    UpsertOutcome::Created => {
                        summary.created += 1;
                        self.schedule
                            .notify_followers(
                                owner_id,
                                format!("New event: {}", stored.title),
                                stored.team_name.clone(),
                                NotificationPayload::NewEvent {
                                    event_id: stored.id,
                                },
                            )
                            .await?;
                    }
                    UpsertOutcome::Updated => {
                        summary.updated += 1;
                        // Reminders scheduled against the old time are stale.
                        self.reminders.cancel_for_event(stored.id).await?;
                        self.schedule
                            .notify_followers(
                                owner_id,
                                format!("Schedule change: {}", stored.title),
                                stored.team_name.clone(),
                                NotificationPayload::ScheduleChange {
                                    event_id: stored.id,
                                    description: "Event details changed".to_string(),
                                },
                            )
                            .await?;
                    }
                    UpsertOutcome::Unchanged => summary.unchanged += 1,
                }
            }
        }
        info!(
            owner_id = %owner_id,
            created = summary.created,
            updated = summary.updated,
            unchanged = summary.unchanged,
            "Platform sync finished"
        );
        Ok(summary)
    }
}
