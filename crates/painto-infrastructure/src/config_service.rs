//! Configuration service implementation.
//!
//! Loads [`StorefrontConfig`] from `config.toml` and applies environment
//! overrides for the Shopify connection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use painto_core::config::StorefrontConfig;
use painto_core::error::Result;

use crate::paths::PaintoPaths;
use crate::storage::AtomicTomlFile;

pub const ENV_SHOPIFY_DOMAIN: &str = "PAINTO_SHOPIFY_DOMAIN";
pub const ENV_SHOPIFY_TOKEN: &str = "PAINTO_SHOPIFY_TOKEN";
pub const ENV_SHOPIFY_API_VERSION: &str = "PAINTO_SHOPIFY_API_VERSION";

/// Loads the storefront configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses `config.toml` in the default (or given base) config directory.
    pub fn new(base: Option<&Path>) -> Result<Self> {
        Ok(Self {
            path: PaintoPaths::new(base).config_file()?,
        })
    }

    /// Uses an explicit config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file (defaults when absent) and applies process
    /// environment overrides.
    pub fn load(&self) -> Result<StorefrontConfig> {
        let env: HashMap<String, String> = std::env::vars().collect();
        self.load_with_env(&env)
    }

    /// Like [`load`](Self::load) with an explicit environment map.
    pub fn load_with_env(&self, env: &HashMap<String, String>) -> Result<StorefrontConfig> {
        let mut config = match AtomicTomlFile::<StorefrontConfig>::new(self.path.clone()).load()? {
            Some(config) => config,
            None => {
                tracing::info!(path = %self.path.display(), "No config file, using defaults");
                StorefrontConfig::default()
            }
        };
        apply_env_overrides(&mut config, env);
        Ok(config)
    }

    /// Writes `config` to the file.
    pub fn save(&self, config: &StorefrontConfig) -> Result<()> {
        AtomicTomlFile::<StorefrontConfig>::new(self.path.clone()).save(config)?;
        Ok(())
    }
}

fn apply_env_overrides(config: &mut StorefrontConfig, env: &HashMap<String, String>) {
    let non_empty = |key: &str| env.get(key).filter(|v| !v.trim().is_empty()).cloned();

    if let Some(domain) = non_empty(ENV_SHOPIFY_DOMAIN) {
        config.shopify.store_domain = domain;
    }
    if let Some(token) = non_empty(ENV_SHOPIFY_TOKEN) {
        config.shopify.public_access_token = token;
    }
    if let Some(version) = non_empty(ENV_SHOPIFY_API_VERSION) {
        config.shopify.api_version = version;
    }
}
