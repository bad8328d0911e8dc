//! In-memory feed token store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::feed::FeedToken;

use crate::stores::FeedTokenStore;

/// Map-backed feed token store, keyed by owner.
#[derive(Debug, Default)]
pub struct MemoryFeedTokenStore {
    rows: Mutex<HashMap<Uuid, FeedToken>>,
}

impl MemoryFeedTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedTokenStore for MemoryFeedTokenStore {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<FeedToken>> {
        Ok(self.rows.lock().await.get(&user_id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<FeedToken>> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn replace(&self, user_id: Uuid, token: &str) -> AppResult<FeedToken> {
        let row = FeedToken {
            user_id,
            token: token.to_string(),
            created_at: Utc::now(),
        };
        self.rows.lock().await.insert(user_id, row.clone());
        Ok(row)
    }
}
