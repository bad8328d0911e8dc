//! In-memory user store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::user::{UpsertUser, User};

use crate::stores::UserStore;

/// Map-backed user store.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    rows: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn upsert(&self, user: &UpsertUser) -> AppResult<User> {
        let mut rows = self.rows.lock().await;
        let now = Utc::now();
        let row = match rows.get(&user.id) {
            Some(existing) => User {
                id: user.id,
                email: user.email.clone().or_else(|| existing.email.clone()),
                display_name: user
                    .display_name
                    .clone()
                    .or_else(|| existing.display_name.clone()),
                photo_url: user.photo_url.clone().or_else(|| existing.photo_url.clone()),
                created_at: existing.created_at,
                updated_at: now,
            },
            None => User {
                id: user.id,
                email: user.email.clone(),
                display_name: user.display_name.clone(),
                photo_url: user.photo_url.clone(),
                created_at: now,
                updated_at: now,
            },
        };
        rows.insert(row.id, row.clone());
        Ok(row)
    }
}
