//! CRMLink — HubSpot OAuth connector.
//!
//! Library crate shared by the `crmlink` binary and the integration tests in `tests/`.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod integrations;
pub mod jobs;
pub mod models;

use std::sync::Arc;
use std::time::Duration;

use cache::{EphemeralStore, MemoryStore, RedisStore};
use config::{Config, StoreBackend};
use integrations::hubspot::{HubSpotClient, HubSpotIntegration};

/// Shared application state passed to handlers.
pub struct AppState {
    pub hubspot: HubSpotIntegration,
    pub config: Config,
}

impl AppState {
    /// Assemble state around an already-built store.
    pub fn new(config: Config, store: Arc<dyn EphemeralStore>) -> anyhow::Result<Self> {
        let client = HubSpotClient::new(config.hubspot.clone(), config.http_timeout())?;
        let hubspot = HubSpotIntegration::new(
            store,
            client,
            config.state_ttl(),
            config.credentials_ttl(),
        );
        Ok(Self { hubspot, config })
    }

    /// Connect the configured store backend and assemble state.
    ///
    /// For the in-memory backend this also starts the expiry sweep, so it
    /// must run inside a Tokio runtime.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn EphemeralStore> = match config.store {
            StoreBackend::Redis => {
                tracing::info!("Connecting to Redis...");
                Arc::new(RedisStore::connect(&config.redis_url).await?)
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store: state is lost on restart and not shared between instances");
                let store = MemoryStore::new();
                jobs::cleanup::spawn(store.clone(), Duration::from_secs(60));
                Arc::new(store)
            }
        };
        Self::new(config, store)
    }
}
