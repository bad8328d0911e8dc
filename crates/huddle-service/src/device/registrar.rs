//! Push-token registrar with token and device churn reconciliation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_database::stores::DeviceStore;
use huddle_entity::device::{Device, NewDevice};

/// Reconciles device registrations to exactly one row per
/// currently-valid push token per user.
///
/// Tokens rotate under the device (provider refresh) and device
/// identifiers rotate under the token (OS upgrades); both converge on
/// delete-then-insert, never an in-place overwrite.
pub struct DeviceRegistrar {
    devices: Arc<dyn DeviceStore>,
}

impl DeviceRegistrar {
    /// Creates a new registrar.
    pub fn new(devices: Arc<dyn DeviceStore>) -> Self {
        Self { devices }
    }

    /// Register a device, reconciling stale rows. Idempotent.
    pub async fn register(&self, registration: NewDevice) -> AppResult<Device> {
        if let Some(existing) = self
            .devices
            .find_by_token(registration.user_id, &registration.push_token)
            .await?
        {
            if existing.device_id == registration.device_id {
                self.devices
                    .touch_last_active(existing.id, Utc::now())
                    .await?;
                return Ok(existing);
            }
            // Same token reported by a new device identifier.
            debug!(device_id = %existing.device_id, "Replacing device row for migrated token");
            self.devices.delete(existing.id).await?;
        }

        if let Some(stale) = self
            .devices
            .find_by_device(registration.user_id, &registration.device_id)
            .await?
        {
            // Token churn: the device re-registered with a fresh token.
            debug!(device_id = %stale.device_id, "Replacing device row for rotated token");
            self.devices.delete(stale.id).await?;
        }

        match self.devices.insert(&registration).await {
            Ok(device) => Ok(device),
            Err(e) if e.is_conflict() => {
                // A concurrent register for the same token won; adopt its row.
                self.devices
                    .find_by_token(registration.user_id, &registration.push_token)
                    .await?
                    .ok_or(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Register without surfacing errors to the caller.
    ///
    /// Registration rides along on app launch; a failure must never
    /// block the session.
    pub async fn register_best_effort(&self, registration: NewDevice) -> Option<Device> {
        match self.register(registration).await {
            Ok(device) => Some(device),
            Err(e) => {
                warn!(error = %e, "Device registration failed");
                None
            }
        }
    }

    /// Remove the row holding a push token, e.g. on sign-out.
    pub async fn unregister(&self, user_id: Uuid, push_token: &str) -> AppResult<bool> {
        match self.devices.find_by_token(user_id, push_token).await? {
            Some(device) => self.devices.delete(device.id).await,
            None => Ok(false),
        }
    }

    /// List the user's registered devices.
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<Device>> {
        self.devices.list_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::DateTime;

    use huddle_core::error::{AppError, ErrorKind};
    use huddle_database::memory::MemoryDeviceStore;
    use huddle_entity::device::DevicePlatform;

    use super::*;

    fn registration(user_id: Uuid, device_id: &str, token: &str) -> NewDevice {
        NewDevice {
            user_id,
            device_id: device_id.to_string(),
            device_name: Some("Pixel".to_string()),
            platform: DevicePlatform::Android,
            push_token: token.to_string(),
        }
    }

    #[tokio::test]
    async fn test_same_triple_twice_keeps_one_row() {
        let registrar = DeviceRegistrar::new(Arc::new(MemoryDeviceStore::new()));
        let user = Uuid::new_v4();

        let first = registrar
            .register(registration(user, "dev-1", "tok-1"))
            .await
            .unwrap();
        let second = registrar
            .register(registration(user, "dev-1", "tok-1"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(registrar.list(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_token_migrates_to_new_device_id() {
        let registrar = DeviceRegistrar::new(Arc::new(MemoryDeviceStore::new()));
        let user = Uuid::new_v4();

        registrar
            .register(registration(user, "dev-old", "tok-1"))
            .await
            .unwrap();
        let replaced = registrar
            .register(registration(user, "dev-new", "tok-1"))
            .await
            .unwrap();

        let rows = registrar.list(user).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(replaced.device_id, "dev-new");
    }

    #[tokio::test]
    async fn test_token_rotation_replaces_device_row() {
        let registrar = DeviceRegistrar::new(Arc::new(MemoryDeviceStore::new()));
        let user = Uuid::new_v4();

        registrar
            .register(registration(user, "dev-1", "tok-old"))
            .await
            .unwrap();
        registrar
            .register(registration(user, "dev-1", "tok-new"))
            .await
            .unwrap();

        let rows = registrar.list(user).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].push_token, "tok-new");
    }

    struct DownDeviceStore;

    fn store_down() -> AppError {
        AppError::new(ErrorKind::Database, "store unavailable")
    }

    #[async_trait]
    impl DeviceStore for DownDeviceStore {
        async fn find_by_token(&self, _: Uuid, _: &str) -> AppResult<Option<Device>> {
            Err(store_down())
        }

        async fn find_by_device(&self, _: Uuid, _: &str) -> AppResult<Option<Device>> {
            Err(store_down())
        }

        async fn insert(&self, _: &NewDevice) -> AppResult<Device> {
            Err(store_down())
        }

        async fn delete(&self, _: Uuid) -> AppResult<bool> {
            Err(store_down())
        }

        async fn touch_last_active(&self, _: Uuid, _: DateTime<Utc>) -> AppResult<()> {
            Err(store_down())
        }

        async fn list_for_user(&self, _: Uuid) -> AppResult<Vec<Device>> {
            Err(store_down())
        }

        async fn delete_inactive_since(&self, _: DateTime<Utc>) -> AppResult<u64> {
            Err(store_down())
        }
    }

    #[tokio::test]
    async fn test_best_effort_swallows_store_errors() {
        let registrar = DeviceRegistrar::new(Arc::new(DownDeviceStore));
        let outcome = registrar
            .register_best_effort(registration(Uuid::new_v4(), "dev-1", "tok-1"))
            .await;
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_best_effort_returns_registered_device() {
        let registrar = DeviceRegistrar::new(Arc::new(MemoryDeviceStore::new()));
        let user = Uuid::new_v4();
        let device = registrar
            .register_best_effort(registration(user, "dev-1", "tok-1"))
            .await;
        assert_eq!(device.map(|d| d.device_id), Some("dev-1".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_removes_token_row() {
        let registrar = DeviceRegistrar::new(Arc::new(MemoryDeviceStore::new()));
        let user = Uuid::new_v4();
        registrar
            .register(registration(user, "dev-1", "tok-1"))
            .await
            .unwrap();

        assert!(registrar.unregister(user, "tok-1").await.unwrap());
        assert!(!registrar.unregister(user, "tok-1").await.unwrap());
        assert!(registrar.list(user).await.unwrap().is_empty());
    }
}
