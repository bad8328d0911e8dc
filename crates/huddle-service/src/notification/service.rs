//! Notification center CRUD.

use std::sync::Arc;

use uuid::Uuid;

use huddle_core::error::AppError;
use huddle_core::result::AppResult;
use huddle_database::stores::NotificationStore;
use huddle_entity::notification::Notification;

use crate::context::RequestContext;

const DEFAULT_PAGE: u32 = 50;

/// Manages a user's notification center entries.
pub struct NotificationService {
    notifications: Arc<dyn NotificationStore>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notifications: Arc<dyn NotificationStore>) -> Self {
        Self { notifications }
    }

    /// Lists the current user's notifications, most recent first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        limit: Option<u32>,
    ) -> AppResult<Vec<Notification>> {
        self.notifications
            .list_for_user(ctx.user_id, limit.unwrap_or(DEFAULT_PAGE))
            .await
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.notifications.count_unread(ctx.user_id).await
    }

    /// Marks one notification as read.
    pub async fn mark_read(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        self.notifications.mark_read(id, ctx.user_id).await
    }

    /// Marks all of the user's notifications as read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notifications.mark_all_read(ctx.user_id).await
    }

    /// Deletes one notification.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if !self.notifications.delete(id, ctx.user_id).await? {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    /// Deletes all of the user's notifications.
    pub async fn delete_all(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notifications.delete_all(ctx.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use huddle_database::memory::MemoryNotificationStore;
    use huddle_entity::notification::{NewNotification, NotificationPayload};

    use super::*;

    async fn seed(store: &MemoryNotificationStore, user_id: Uuid, n: usize) {
        for _ in 0..n {
            store
                .insert(&NewNotification {
                    user_id,
                    title: "t".to_string(),
                    body: "b".to_string(),
                    payload: NotificationPayload::NewEvent {
                        event_id: Uuid::new_v4(),
                    },
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_mark_all_then_unread_zero() {
        let store = Arc::new(MemoryNotificationStore::new());
        let ctx = RequestContext::new(Uuid::new_v4());
        seed(&store, ctx.user_id, 3).await;

        let service = NotificationService::new(store);
        assert_eq!(service.unread_count(&ctx).await.unwrap(), 3);
        assert_eq!(service.mark_all_read(&ctx).await.unwrap(), 3);
        assert_eq!(service.unread_count(&ctx).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let service = NotificationService::new(Arc::new(MemoryNotificationStore::new()));
        let ctx = RequestContext::new(Uuid::new_v4());
        let err = service.delete(&ctx, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, huddle_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_all_scoped_to_user() {
        let store = Arc::new(MemoryNotificationStore::new());
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        seed(&store, a, 2).await;
        seed(&store, b, 1).await;

        let service = NotificationService::new(store);
        assert_eq!(service.delete_all(&RequestContext::new(a)).await.unwrap(), 2);
        assert_eq!(
            service
                .unread_count(&RequestContext::new(b))
                .await
                .unwrap(),
            1
        );
    }
}
