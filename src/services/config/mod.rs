//! Persisted settings. The only value that survives a restart is the last
//! confirmed destination directory.

use std::future::Future;
use std::sync::Mutex;

use sqlx::SqlitePool;

use crate::database::settings_repo;
use crate::types::errors::CommandError;

pub const LAST_DESTINATION_KEY: &str = "last_destination_dir";

/// Where the save flow remembers its last destination.
pub trait DestinationStore: Send + Sync {
    /// `None` when nothing was stored or the store could not be read.
    fn last_destination(&self) -> Option<String>;

    /// Best effort; failures are logged, never surfaced.
    fn remember_destination(&self, directory: &str) -> impl Future<Output = ()> + Send;
}

pub struct ConfigService {
    pool: SqlitePool,
    last_destination: Mutex<Option<String>>,
}

impl ConfigService {
    /// Create the settings table if needed and load the cached value.
    pub async fn init(pool: SqlitePool) -> Self {
        if let Err(e) = settings_repo::ensure_settings_table(&pool).await {
            log::error!("Failed to create settings table: {e}");
        }

        let last_destination = match settings_repo::get_setting(&pool, LAST_DESTINATION_KEY).await
        {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                log::warn!("Failed to load last destination: {e}");
                None
            }
        };

        Self {
            pool,
            last_destination: Mutex::new(last_destination),
        }
    }

    pub fn get_last_destination(&self) -> Option<String> {
        self.last_destination
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Persist first, then update the cache.
    pub async fn set_last_destination(&self, directory: &str) -> Result<(), CommandError> {
        settings_repo::set_setting(&self.pool, LAST_DESTINATION_KEY, directory).await?;
        *self
            .last_destination
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(directory.to_string());
        Ok(())
    }
}

impl DestinationStore for ConfigService {
    fn last_destination(&self) -> Option<String> {
        self.get_last_destination()
    }

    async fn remember_destination(&self, directory: &str) {
        if let Err(e) = self.set_last_destination(directory).await {
            log::warn!("Failed to persist last destination {directory}: {e}");
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
