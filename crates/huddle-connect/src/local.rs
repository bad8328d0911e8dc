//! Device-local notification scheduling stub.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use huddle_core::result::AppResult;
use huddle_core::traits::gateway::LocalNotificationScheduler;

/// No-op scheduler for deployments where reminder delivery is fully
/// server-side.
///
/// Legacy clients that scheduled notifications on-device clear them
/// when they observe the reminder's delete event over the change feed,
/// so the server has nothing to do here beyond logging.
pub struct NoopLocalScheduler;

#[async_trait]
impl LocalNotificationScheduler for NoopLocalScheduler {
    async fn schedule(
        &self,
        local_id: i32,
        _title: &str,
        _body: &str,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        debug!(local_id, at = %at, "Ignoring device-local schedule request");
        Ok(())
    }

    async fn cancel(&self, local_id: i32) -> AppResult<()> {
        debug!(local_id, "Ignoring device-local cancel request");
        Ok(())
    }
}
