use super::types::SiteConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "hearth.toml";
pub const ENV_PREFIX: &str = "HEARTH_";

/// Service for site configuration
pub struct ConfigService {
    config_path: PathBuf,
}

impl ConfigService {
    /// Create a config service rooted at `project_root`
    pub fn new(project_root: &Path) -> Self {
        Self {
            config_path: project_root.join(CONFIG_FILE),
        }
    }

    /// Root from `HEARTH_ROOT`, falling back to the working directory
    pub fn from_env() -> Result<Self> {
        let root = match std::env::var_os("HEARTH_ROOT") {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir().context("Failed to resolve working directory")?,
        };
        Ok(Self::new(&root))
    }

    /// Load configuration: defaults, then the TOML file if present, then
    /// `HEARTH_` env vars (`__` separates sections)
    pub fn load(&self) -> Result<SiteConfig> {
        let mut figment = Figment::from(Serialized::defaults(SiteConfig::default()));

        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: SiteConfig = figment.extract().context("Failed to load configuration")?;
        Ok(config)
    }
}
