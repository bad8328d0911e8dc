//! Team event repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::event::{NewTeamEvent, TeamEvent};

use super::db_err;
use crate::stores::{EventStore, UpsertOutcome};

/// PostgreSQL-backed team event store.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// Create a new event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
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
impl EventStore for PgEventStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TeamEvent>> {
        sqlx::query_as::<_, TeamEvent>("SELECT * FROM team_events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find event", e))
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<TeamEvent>> {
        sqlx::query_as::<_, TeamEvent>(
            "SELECT * FROM team_events WHERE owner_id = $1 ORDER BY starts_at",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list events", e))
    }

    async fn insert(&self, event: &NewTeamEvent) -> AppResult<TeamEvent> {
        sqlx::query_as::<_, TeamEvent>(
            "INSERT INTO team_events \
             (owner_id, team_name, title, location, starts_at, ends_at, source, external_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(event.owner_id)
        .bind(&event.team_name)
        .bind(&event.title)
        .bind(&event.location)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(event.source)
        .bind(&event.external_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to insert event", e))
    }

    async fn upsert_external(
        &self,
        event: &NewTeamEvent,
    ) -> AppResult<(TeamEvent, UpsertOutcome)> {
        let existing = sqlx::query_as::<_, TeamEvent>(
            "SELECT * FROM team_events WHERE owner_id = $1 AND external_id = $2",
        )
        .bind(event.owner_id)
        .bind(&event.external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to look up external event", e))?;

        match existing {
            None => {
                let inserted = self.insert(event).await?;
                Ok((inserted, UpsertOutcome::Created))
            }
            Some(row) if schedule_matches(&row, event) => Ok((row, UpsertOutcome::Unchanged)),
            Some(row) => {
                let updated = sqlx::query_as::<_, TeamEvent>(
                    "UPDATE team_events SET team_name = $2, title = $3, location = $4, \
                     starts_at = $5, ends_at = $6, updated_at = NOW() \
                     WHERE id = $1 RETURNING *",
                )
                .bind(row.id)
                .bind(&event.team_name)
                .bind(&event.title)
                .bind(&event.location)
                .bind(event.starts_at)
                .bind(event.ends_at)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_err("Failed to update external event", e))?;
                Ok((updated, UpsertOutcome::Updated))
            }
        }
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM team_events WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete event", e))?;
        Ok(result.rows_affected() > 0)
    }
}
