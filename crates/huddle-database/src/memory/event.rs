//! In-memory team event store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::event::{NewTeamEvent, TeamEvent};

use crate::stores::{EventStore, UpsertOutcome};

/// Map-backed team event store.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    rows: Mutex<HashMap<Uuid, TeamEvent>>,
}

impl MemoryEventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn build_row(event: &NewTeamEvent) -> TeamEvent {
    let now = Utc::now();
    TeamEvent {
        id: Uuid::new_v4(),
        owner_id: event.owner_id,
        team_name: event.team_name.clone(),
        title: event.title.clone(),
        location: event.location.clone(),
        starts_at: event.starts_at,
        ends_at: event.ends_at,
        source: event.source,
        external_id: event.external_id.clone(),
        created_at: now,
        updated_at: now,
    }
}

fn schedule_matches(existing: &TeamEvent, incoming: &NewTeamEvent) -> bool {
    existing.title == incoming.title
        && existing.team_name == incoming.team_name
        && existing.location == incoming.location
        && existing.starts_at == incoming.starts_at
        && existing.ends_at == incoming.ends_at
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TeamEvent>> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<TeamEvent>> {
        let mut list: Vec<TeamEvent> = self
            .rows
            .lock()
            .await
            .values()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        Ok(list)
    }

    async fn insert(&self, event: &NewTeamEvent) -> AppResult<TeamEvent> {
        let row = build_row(event);
        self.rows.lock().await.insert(row.id, row.clone());
        Ok(row)
    }

    async fn upsert_external(
        &self,
        event: &NewTeamEvent,
    ) -> AppResult<(TeamEvent, UpsertOutcome)> {
        let mut rows = self.rows.lock().await;
        let existing = rows
            .values()
            .find(|e| e.owner_id == event.owner_id && e.external_id == event.external_id)
            .cloned();

        match existing {
            None => {
                let row = build_row(event);
                rows.insert(row.id, row.clone());
                Ok((row, UpsertOutcome::Created))
            }
            Some(row) if schedule_matches(&row, event) => Ok((row, UpsertOutcome::Unchanged)),
            Some(row) => {
                let updated = rows
                    .get_mut(&row.id)
                    .map(|r| {
                        r.team_name = event.team_name.clone();
                        r.title = event.title.clone();
                        r.location = event.location.clone();
                        r.starts_at = event.starts_at;
                        r.ends_at = event.ends_at;
                        r.updated_at = Utc::now();
                        r.clone()
                    })
                    .unwrap_or(row);
                Ok((updated, UpsertOutcome::Updated))
            }
        }
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().await;
        let owned = rows.get(&id).is_some_and(|e| e.owner_id == owner_id);
        if owned {
            rows.remove(&id);
        }
        Ok(owned)
    }
}
