//! In-memory device store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use huddle_core::error::AppError;
use huddle_core::result::AppResult;
use huddle_entity::device::{Device, NewDevice};

use crate::stores::DeviceStore;

/// Map-backed device store enforcing (user, token) uniqueness.
#[derive(Debug, Default)]
pub struct MemoryDeviceStore {
    rows: Mutex<HashMap<Uuid, Device>>,
}

impl MemoryDeviceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeviceStore for MemoryDeviceStore {
    async fn find_by_token(&self, user_id: Uuid, push_token: &str) -> AppResult<Option<Device>> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|d| d.user_id == user_id && d.push_token == push_token)
            .cloned())
    }

    async fn find_by_device(&self, user_id: Uuid, device_id: &str) -> AppResult<Option<Device>> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|d| d.user_id == user_id && d.device_id == device_id)
            .cloned())
    }

    async fn insert(&self, device: &NewDevice) -> AppResult<Device> {
        let mut rows = self.rows.lock().await;
        if rows
            .values()
            .any(|d| d.user_id == device.user_id && d.push_token == device.push_token)
        {
            return Err(AppError::conflict("Push token already registered"));
        }

        let now = Utc::now();
        let row = Device {
            id: Uuid::new_v4(),
            user_id: device.user_id,
            device_id: device.device_id.clone(),
            device_name: device.device_name.clone(),
            platform: device.platform,
            push_token: device.push_token.clone(),
            last_active: now,
            created_at: now,
        };
        rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.rows.lock().await.remove(&id).is_some())
    }

    async fn touch_last_active(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(row) = self.rows.lock().await.get_mut(&id) {
            row.last_active = at;
        }
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Device>> {
        let mut list: Vec<Device> = self
            .rows
            .lock()
            .await
            .values()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.last_active.cmp(&a.last_active));
        Ok(list)
    }

    async fn delete_inactive_since(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().await;
        let count = rows.len();
        rows.retain(|_, d| d.last_active >= before);
        Ok((count - rows.len()) as u64)
    }
}
