//! Stale device pruning.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use huddle_core::result::AppResult;
use huddle_database::stores::DeviceStore;

/// Deletes device rows whose push token has not checked in for the
/// configured window. The provider has almost certainly expired the
/// token by then.
pub struct DeviceCleanupJob {
    devices: Arc<dyn DeviceStore>,
    inactive_days: i64,
}

impl DeviceCleanupJob {
    /// Creates the job.
    pub fn new(devices: Arc<dyn DeviceStore>, inactive_days: i64) -> Self {
        Self {
            devices,
            inactive_days,
        }
    }

    /// Prune inactive rows. Returns the number removed.
    pub async fn run(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::days(self.inactive_days);
        let removed = self.devices.delete_inactive_since(cutoff).await?;
        if removed > 0 {
            info!(removed, "Pruned inactive devices");
        }
        Ok(removed)
    }
}
