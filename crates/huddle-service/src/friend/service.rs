//! Friend lifecycle: request, accept, decline, unfriend.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use huddle_core::error::AppError;
use huddle_core::result::AppResult;
use huddle_database::stores::{FriendshipStore, UserStore};
use huddle_entity::friendship::{FriendRequest, FriendRole, Friendship, NewFriendRequest};
use huddle_entity::notification::{NewNotification, NotificationPayload};
use huddle_realtime::dispatcher::NotificationDispatcher;

/// Friendship use cases over the friendship store.
pub struct FriendService {
    friendships: Arc<dyn FriendshipStore>,
    users: Arc<dyn UserStore>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl FriendService {
    /// Creates a new friend service.
    pub fn new(
        friendships: Arc<dyn FriendshipStore>,
        users: Arc<dyn UserStore>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            friendships,
            users,
            dispatcher,
        }
    }

    /// Send a friend request, notifying the requested user.
    ///
    /// `role` is what the requested user will hold over the
    /// requester's schedule once accepted.
    pub async fn send_request(
        &self,
        requester_id: Uuid,
        requested_id: Uuid,
        role: FriendRole,
    ) -> AppResult<FriendRequest> {
        if requester_id == requested_id {
            return Err(AppError::validation("Cannot befriend yourself"));
        }
        if self
            .friendships
            .find_edge(requester_id, requested_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Already friends"));
        }
        let already_asked = self
            .friendships
            .pending_requests_for(requested_id)
            .await?
            .iter()
            .any(|r| r.requester_id == requester_id);
        if already_asked {
            return Err(AppError::conflict("Friend request already pending"));
        }

        let request = self
            .friendships
            .insert_request(&NewFriendRequest {
                requester_id,
                requested_id,
                role,
            })
            .await?;

        let requester_name = self
            .users
            .find_by_id(requester_id)
            .await?
            .and_then(|u| u.display_name)
            .unwrap_or_else(|| "Someone".to_string());
        self.dispatcher
            .notify(NewNotification {
                user_id: requested_id,
                title: "New friend request".to_string(),
                body: format!("{requester_name} wants to share schedules with you"),
                payload: NotificationPayload::FriendRequest {
                    request_id: request.id,
                    requester_id,
                },
            })
            .await?;

        info!(request_id = %request.id, "Friend request sent");
        Ok(request)
    }

    /// Accept a pending request addressed to `user_id`.
    ///
    /// Both directional edges appear atomically: the accepter's edge
    /// toward the requester carries the requested role, the reverse
    /// edge defaults to viewer. Accepting twice is a `Conflict`.
    pub async fn accept(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> AppResult<(Friendship, Friendship)> {
        let request = self
            .friendships
            .find_request(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Friend request not found"))?;
        if request.requested_id != user_id {
            return Err(AppError::authorization(
                "Only the requested user may accept",
            ));
        }

        let edges = request.edges_on_accept();
        let created = self.friendships.accept_request(request_id, edges).await?;
        info!(request_id = %request_id, "Friend request accepted");
        Ok(created)
    }

    /// Decline a pending request addressed to `user_id`.
    pub async fn decline(&self, user_id: Uuid, request_id: Uuid) -> AppResult<()> {
        let request = self
            .friendships
            .find_request(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Friend request not found"))?;
        if request.requested_id != user_id {
            return Err(AppError::authorization(
                "Only the requested user may decline",
            ));
        }
        self.friendships.decline_request(request_id).await
    }

    /// Remove a friendship: both directional edges disappear together.
    pub async fn remove_friend(&self, user_id: Uuid, friend_id: Uuid) -> AppResult<u64> {
        let removed = self.friendships.delete_edges(user_id, friend_id).await?;
        if removed == 0 {
            return Err(AppError::not_found("Not friends"));
        }
        Ok(removed)
    }

    /// List the user's friends (their outgoing edges).
    pub async fn list_friends(&self, user_id: Uuid) -> AppResult<Vec<Friendship>> {
        self.friendships.list_friends(user_id).await
    }

    /// List pending requests addressed to the user.
    pub async fn pending_requests(&self, user_id: Uuid) -> AppResult<Vec<FriendRequest>> {
        self.friendships.pending_requests_for(user_id).await
    }

    /// The role `friend_id` holds over `user_id`'s schedule, if any.
    pub async fn role_of(&self, user_id: Uuid, friend_id: Uuid) -> AppResult<Option<FriendRole>> {
        Ok(self
            .friendships
            .find_edge(user_id, friend_id)
            .await?
            .map(|e| e.role))
    }
}
