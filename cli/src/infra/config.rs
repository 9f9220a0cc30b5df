//! YAML-backed configuration store.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::domain::config::ApxConfig;

/// Directory name used under the local data dir for config and instances.
pub const APP_DIR: &str = "apx-wsl";

/// Loads `ApxConfig` from a YAML file on disk.
pub struct YamlConfigStore;

impl YamlConfigStore {
    /// Load and validate the config. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(&self) -> Result<ApxConfig> {
        let path = self.path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(ApxConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        // An empty file parses as YAML null.
        let config: ApxConfig = if content.trim().is_empty() {
            ApxConfig::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("cannot parse {}", path.display()))?
        };
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Config file location: `$APX_CONFIG`, else `<local data dir>/apx-wsl/config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the local data directory cannot be determined.
    pub fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var("APX_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        Ok(default_root()?.join("config.yaml"))
    }
}

/// Instance root used when the config does not override it.
///
/// # Errors
///
/// Returns an error if the local data directory cannot be determined.
pub fn default_root() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("cannot determine local data directory"))?;
    Ok(base.join(APP_DIR))
}

/// Instance root for `config`: its override, else [`default_root`].
///
/// # Errors
///
/// Returns an error if no override is set and the local data directory
/// cannot be determined.
pub fn resolve_root(config: &ApxConfig) -> Result<PathBuf> {
    match &config.root_dir {
        Some(root) => Ok(root.clone()),
        None => default_root(),
    }
}
