use std::sync::Arc;
use std::time::Duration;

use crate::errors::{ApiError, DeviceError};
use crate::models::Device;
use crate::repositories::DeviceRepository;
use crate::services::CacheService;

const DEVICES_CACHE_KEY: &str = "homewatch-devices";
// Short TTLs: the registry changes rarely but out-of-band renames must
// surface without a restart.
const DEVICES_TTL: Duration = Duration::from_secs(60);
const DEVICE_TTL: Duration = Duration::from_secs(300);

/// Device registry with a short-TTL cache in front. Cache writes are
/// synchronous and lookups always fall back to storage, so correctness
/// never depends on a cache hit.
pub struct DeviceService {
    repository: Arc<DeviceRepository>,
    cache: Arc<CacheService>,
}

impl DeviceService {
    pub fn new(repository: Arc<DeviceRepository>, cache: Arc<CacheService>) -> Self {
        Self { repository, cache }
    }

    fn device_cache_key(device_id: &str) -> String {
        format!("homewatch-device-{device_id}")
    }

    pub async fn get_devices(&self) -> Result<Vec<Device>, ApiError> {
        if let Some(devices) = self.cache.get_json::<Vec<Device>>(DEVICES_CACHE_KEY).await {
            tracing::debug!("returning devices from cache");
            return Ok(devices);
        }

        let devices = self.repository.find_all().await?;

        self.cache
            .set_json(DEVICES_CACHE_KEY, &devices, Some(DEVICES_TTL))
            .await;

        Ok(devices)
    }

    /// Absence is a caller invariant violation at every call site in the
    /// core, so it surfaces as a typed not-found error rather than None.
    pub async fn get_device(&self, device_id: &str) -> Result<Device, ApiError> {
        let key = Self::device_cache_key(device_id);

        if let Some(device) = self.cache.get_json::<Device>(&key).await {
            tracing::debug!("returning device from cache: {}", device_id);
            return Ok(device);
        }

        let device = self
            .repository
            .find_by_id(device_id)
            .await?
            .ok_or(DeviceError::DeviceNotFound)?;

        self.cache.set_json(&key, &device, Some(DEVICE_TTL)).await;

        Ok(device)
    }

    pub async fn create_device(&self, device: &Device) -> Result<(), ApiError> {
        if self.repository.find_by_name(&device.device_name).await?.is_some() {
            return Err(DeviceError::DeviceNameExists.into());
        }

        let pool = self.repository.get_pool();
        let mut tx = pool.begin().await?;
        self.repository.create(device, &mut tx).await?;
        tx.commit().await?;

        // New device must show up in the next listing
        self.cache.delete(DEVICES_CACHE_KEY).await;

        Ok(())
    }
}
