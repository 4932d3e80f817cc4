use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    expires_at: Option<OffsetDateTime>,
}

/// Short-TTL JSON cache fronting device lookups. An optional
/// optimization only: every consumer must stay correct with the cache
/// disabled or empty.
pub struct CacheService {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    default_ttl: Option<Duration>,
}

impl CacheService {
    pub fn new(default_ttl: Option<Duration>) -> Self {
        let service = Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        };

        service.start_cleanup_task();

        service
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("failed to serialize cache entry '{}': {}", key, e);
                return;
            }
        };

        let expires_at = ttl
            .or(self.default_ttl)
            .map(|d| OffsetDateTime::now_utc() + time::Duration::milliseconds(d.as_millis() as i64));

        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), CacheEntry { value, expires_at });
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.write().await;

        let entry = entries.get(key)?;

        if let Some(expires_at) = entry.expires_at {
            if OffsetDateTime::now_utc() > expires_at {
                entries.remove(key);
                return None;
            }
        }

        serde_json::from_value(entry.value.clone()).ok()
    }

    pub async fn delete(&self, key: &str) -> bool {
        let mut entries = self.entries.write().await;
        entries.remove(key).is_some()
    }

    fn start_cleanup_task(&self) {
        let entries = Arc::clone(&self.entries);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));

            loop {
                interval.tick().await;

                let now = OffsetDateTime::now_utc();
                let mut entries = entries.write().await;
                entries.retain(|_, entry| entry.expires_at.is_none_or(|expires| expires >= now));
            }
        });
    }
}
