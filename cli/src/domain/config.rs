//! Domain types and validators for apx configuration.
//!
//! Pure functions only. No I/O or filesystem access.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Defaults ─────────────────────────────────────────────────────────────────

/// Reference environment the base image is exported from.
pub const DEFAULT_SEED_DISTRO: &str = "Ubuntu";

/// Non-root user provisioned into every new environment.
pub const DEFAULT_USER: &str = "apx";

/// Polls per phase while waiting for a freshly imported environment.
pub const DEFAULT_APPEAR_TRIES: u32 = 10;

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static USER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_-]{0,31}$").expect("valid regex"));

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApxConfig {
    /// Instance root override (base image cache and default instance dirs).
    pub root_dir: Option<PathBuf>,
    /// Virtualization CLI override; defaults to `wsl.exe`.
    pub wsl_exe: Option<PathBuf>,
    /// Reference environment the base image is exported from.
    pub seed_distro: String,
    /// Default guest user.
    pub default_user: String,
    /// Polls per phase while waiting for an imported environment to appear.
    pub appear_tries: u32,
    /// Bind-mount the instance's `wkdir` into new environments.
    pub mount_workdir: bool,
}

impl Default for ApxConfig {
    fn default() -> Self {
        Self {
            root_dir: None,
            wsl_exe: None,
            seed_distro: DEFAULT_SEED_DISTRO.to_string(),
            default_user: DEFAULT_USER.to_string(),
            appear_tries: DEFAULT_APPEAR_TRIES,
            mount_workdir: true,
        }
    }
}

impl ApxConfig {
    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seed_distro.trim().is_empty() {
            return Err(ConfigError::EmptySeedDistro);
        }
        if !USER_NAME.is_match(&self.default_user) {
            return Err(ConfigError::InvalidUser(self.default_user.clone()));
        }
        if self.appear_tries == 0 {
            return Err(ConfigError::InvalidTries(self.appear_tries));
        }
        Ok(())
    }

    /// The provisioning knobs the command pipelines consume.
    #[must_use]
    pub fn settings(&self) -> ProvisionSettings {
        ProvisionSettings {
            seed_distro: self.seed_distro.trim().to_string(),
            default_user: self.default_user.clone(),
            appear_tries: self.appear_tries,
        }
    }
}

/// Settings threaded into every command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSettings {
    pub seed_distro: String,
    pub default_user: String,
    pub appear_tries: u32,
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        ApxConfig::default().settings()
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
