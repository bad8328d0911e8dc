//! In-memory friendship store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use huddle_core::error::AppError;
use huddle_core::result::AppResult;
use huddle_entity::friendship::{
    FriendRequest, Friendship, NewFriendRequest, NewFriendship, RequestStatus,
};

use crate::stores::FriendshipStore;

#[derive(Debug, Default)]
struct Inner {
    requests: HashMap<Uuid, FriendRequest>,
    edges: HashMap<Uuid, Friendship>,
}

/// Map-backed friendship store. A single mutex over requests and
/// edges stands in for the database transaction in `accept_request`.
#[derive(Debug, Default)]
pub struct MemoryFriendshipStore {
    inner: Mutex<Inner>,
}

impl MemoryFriendshipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FriendshipStore for MemoryFriendshipStore {
    async fn insert_request(&self, request: &NewFriendRequest) -> AppResult<FriendRequest> {
        let row = FriendRequest {
            id: Uuid::new_v4(),
            requester_id: request.requester_id,
            requested_id: request.requested_id,
            role: request.role,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        };
        self.inner
            .lock()
            .await
            .requests
            .insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_request(&self, id: Uuid) -> AppResult<Option<FriendRequest>> {
        Ok(self.inner.lock().await.requests.get(&id).cloned())
    }

    async fn pending_requests_for(&self, user_id: Uuid) -> AppResult<Vec<FriendRequest>> {
        let mut list: Vec<FriendRequest> = self
            .inner
            .lock()
            .await
            .requests
            .values()
            .filter(|r| r.requested_id == user_id && r.is_pending())
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn accept_request(
        &self,
        request_id: Uuid,
        edges: (NewFriendship, NewFriendship),
    ) -> AppResult<(Friendship, Friendship)> {
        let mut inner = self.inner.lock().await;
        let request = inner
            .requests
            .get_mut(&request_id)
            .ok_or_else(|| AppError::conflict("Friend request is not pending"))?;
        if !request.is_pending() {
            return Err(AppError::conflict("Friend request is not pending"));
        }
        request.status = RequestStatus::Accepted;
        request.responded_at = Some(Utc::now());

        let mut insert_edge = |new: NewFriendship| {
            let edge = Friendship {
                id: Uuid::new_v4(),
                user_id: new.user_id,
                friend_id: new.friend_id,
                role: new.role,
                created_at: Utc::now(),
            };
            inner.edges.insert(edge.id, edge.clone());
            edge
        };
        let edge_a = insert_edge(edges.0);
        let edge_b = insert_edge(edges.1);
        Ok((edge_a, edge_b))
    }

    async fn decline_request(&self, request_id: Uuid) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        let request = inner
            .requests
            .get_mut(&request_id)
            .ok_or_else(|| AppError::conflict("Friend request is not pending"))?;
        if !request.is_pending() {
            return Err(AppError::conflict("Friend request is not pending"));
        }
        request.status = RequestStatus::Declined;
        request.responded_at = Some(Utc::now());
        Ok(())
    }

    async fn find_edge(&self, user_id: Uuid, friend_id: Uuid) -> AppResult<Option<Friendship>> {
        Ok(self
            .inner
            .lock()
            .await
            .edges
            .values()
            .find(|e| e.user_id == user_id && e.friend_id == friend_id)
            .cloned())
    }

    async fn list_friends(&self, user_id: Uuid) -> AppResult<Vec<Friendship>> {
        let mut list: Vec<Friendship> = self
            .inner
            .lock()
            .await
            .edges
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(list)
    }

    async fn delete_edges(&self, user_id: Uuid, friend_id: Uuid) -> AppResult<u64> {
        let mut inner = self.inner.lock().await;
        let before = inner.edges.len();
        inner.edges.retain(|_, e| {
            !((e.user_id == user_id && e.friend_id == friend_id)
                || (e.user_id == friend_id && e.friend_id == user_id))
        });
        Ok((before - inner.edges.len()) as u64)
    }
}
