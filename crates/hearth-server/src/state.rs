use anyhow::{Context, Result};
use hearth::db::MemoryStore;
use hearth::services::{ConfigService, SiteConfig, SiteService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub site: Arc<SiteService>,
    pub config: SiteConfig,
}

impl AppState {
    /// Load `hearth.toml` plus `HEARTH_` env overrides and build the store
    pub fn from_env() -> Result<Self> {
        let config = ConfigService::from_env()?.load()?;
        Self::new(config)
    }

    pub fn new(config: SiteConfig) -> Result<Self> {
        let store = if config.seed {
            MemoryStore::seeded(config.newsletter.clone()).context("Failed to seed store")?
        } else {
            MemoryStore::new(config.newsletter.clone())
        };
        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(config: SiteConfig, store: Arc<MemoryStore>) -> Self {
        Self {
            site: Arc::new(SiteService::new(store)),
            config,
        }
    }
}
