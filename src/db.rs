use std::sync::Arc;
use std::time::Duration;

use sqlx::mysql::MySqlPoolOptions;
use tracing::{info, warn};

use crate::config::{Config, StorageBackend};
use crate::store::{MemoryStore, MySqlStore, Store};

/// Builds the store handle the rest of the service is given.
///
/// The MySQL pool connects lazily: an unreachable database leaves the
/// service running in degraded mode, with storage calls failing and
/// `/ready` reporting unavailable, instead of refusing to start.
pub async fn init_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Mysql => {
            let pool = MySqlPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
                .connect_lazy(&config.database_url)?;

            let store = MySqlStore::new(pool);
            match store.bootstrap_schema().await {
                Ok(()) => info!("Connected to MySQL"),
                Err(e) => warn!(error = %e, "MySQL unavailable, starting in degraded mode"),
            }

            Ok(Arc::new(store))
        }
    }
}
