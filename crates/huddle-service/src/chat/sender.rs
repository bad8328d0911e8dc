//! Per-conversation sender display-name cache.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_database::stores::UserStore;

/// Caches sender display names for one conversation's lifetime.
///
/// A two-party conversation only ever has two senders; every message
/// insert after the first two hits the cache.
pub struct SenderCache {
    users: Arc<dyn UserStore>,
    names: HashMap<Uuid, Option<String>>,
}

impl SenderCache {
    /// Create a cache over the user store.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            names: HashMap::new(),
        }
    }

    /// Resolve a sender's display name, consulting the store at most
    /// once per sender. Unknown users cache as `None`.
    pub async fn display_name(&mut self, sender_id: Uuid) -> AppResult<Option<String>> {
        if let Some(name) = self.names.get(&sender_id) {
            return Ok(name.clone());
        }
        let name = self
            .users
            .find_by_id(sender_id)
            .await?
            .and_then(|u| u.display_name);
        self.names.insert(sender_id, name.clone());
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use huddle_database::memory::MemoryUserStore;
    use huddle_database::stores::UserStore as _;
    use huddle_entity::user::UpsertUser;

    use super::*;

    #[tokio::test]
    async fn test_caches_after_first_lookup() {
        let users = Arc::new(MemoryUserStore::new());
        let id = Uuid::new_v4();
        users
            .upsert(&UpsertUser {
                id,
                email: None,
                display_name: Some("Alice".to_string()),
                photo_url: None,
            })
            .await
            .unwrap();

        let mut cache = SenderCache::new(users.clone());
        assert_eq!(cache.display_name(id).await.unwrap().as_deref(), Some("Alice"));

        // A later profile change is not observed within this session.
        users
            .upsert(&UpsertUser {
                id,
                email: None,
                display_name: Some("Alicia".to_string()),
                photo_url: None,
            })
            .await
            .unwrap();
        assert_eq!(cache.display_name(id).await.unwrap().as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_unknown_user_resolves_to_none() {
        let mut cache = SenderCache::new(Arc::new(MemoryUserStore::new()));
        assert_eq!(cache.display_name(Uuid::new_v4()).await.unwrap(), None);
    }
}
