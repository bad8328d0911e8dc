//! Friendship and friend-request repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use huddle_core::error::AppError;
use huddle_core::result::AppResult;
use huddle_entity::friendship::{FriendRequest, Friendship, NewFriendRequest, NewFriendship};

use super::db_err;
use crate::stores::FriendshipStore;

/// PostgreSQL-backed friendship store.
///
/// Accepting a request creates both directional edges inside a single
/// transaction, so a partial failure can never leave an asymmetric
/// friendship.
#[derive(Debug, Clone)]
pub struct PgFriendshipStore {
    pool: PgPool,
}

impl PgFriendshipStore {
    /// Create a new friendship repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendshipStore for PgFriendshipStore {
    async fn insert_request(&self, request: &NewFriendRequest) -> AppResult<FriendRequest> {
        sqlx::query_as::<_, FriendRequest>(
            "INSERT INTO friend_requests (requester_id, requested_id, role, status) \
             VALUES ($1, $2, $3, 'pending') RETURNING *",
        )
        .bind(request.requester_id)
        .bind(request.requested_id)
        .bind(request.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to insert friend request", e))
    }

    async fn find_request(&self, id: Uuid) -> AppResult<Option<FriendRequest>> {
        sqlx::query_as::<_, FriendRequest>("SELECT * FROM friend_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find friend request", e))
    }

    async fn pending_requests_for(&self, user_id: Uuid) -> AppResult<Vec<FriendRequest>> {
        sqlx::query_as::<_, FriendRequest>(
            "SELECT * FROM friend_requests \
             WHERE requested_id = $1 AND status = 'pending' \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list pending requests", e))
    }

    async fn accept_request(
        &self,
        request_id: Uuid,
        edges: (NewFriendship, NewFriendship),
    ) -> AppResult<(Friendship, Friendship)> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_err("Failed to begin accept transaction", e))?;

        let updated = sqlx::query(
            "UPDATE friend_requests \
             SET status = 'accepted', responded_at = NOW() \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(request_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("Failed to accept request", e))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::conflict("Friend request is not pending"));
        }

        let (first, second) = edges;
        let edge_a = sqlx::query_as::<_, Friendship>(
            "INSERT INTO friendships (user_id, friend_id, role) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(first.user_id)
        .bind(first.friend_id)
        .bind(first.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_err("Failed to insert friendship edge", e))?;

        let edge_b = sqlx::query_as::<_, Friendship>(
            "INSERT INTO friendships (user_id, friend_id, role) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(second.user_id)
        .bind(second.friend_id)
        .bind(second.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_err("Failed to insert friendship edge", e))?;

        tx.commit()
            .await
            .map_err(|e| db_err("Failed to commit accept transaction", e))?;

        Ok((edge_a, edge_b))
    }

    async fn decline_request(&self, request_id: Uuid) -> AppResult<()> {
        let updated = sqlx::query(
            "UPDATE friend_requests \
             SET status = 'declined', responded_at = NOW() \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(request_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to decline request", e))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::conflict("Friend request is not pending"));
        }
        Ok(())
    }

    async fn find_edge(&self, user_id: Uuid, friend_id: Uuid) -> AppResult<Option<Friendship>> {
        sqlx::query_as::<_, Friendship>(
            "SELECT * FROM friendships WHERE user_id = $1 AND friend_id = $2",
        )
        .bind(user_id)
        .bind(friend_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to find friendship edge", e))
    }

    async fn list_friends(&self, user_id: Uuid) -> AppResult<Vec<Friendship>> {
        sqlx::query_as::<_, Friendship>(
            "SELECT * FROM friendships WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list friends", e))
    }

    async fn delete_edges(&self, user_id: Uuid, friend_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM friendships \
             WHERE (user_id = $1 AND friend_id = $2) OR (user_id = $2 AND friend_id = $1)",
        )
        .bind(user_id)
        .bind(friend_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to delete friendship edges", e))?;
        Ok(result.rows_affected())
    }
}
