//! Infrastructure implementation of the `DistroRegistry` port.
//!
//! WSL records every distro under `HKCU\...\Lxss\{GUID}` with its
//! `DistributionName`, `BasePath` and `Version`. On Windows the key is read
//! directly, so values keep their full UTF-16 text. Other hosts have no
//! metadata.

use std::path::PathBuf;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::application::ports::DistroRegistry;
use crate::domain::DistroInfo;

/// Key under `HKEY_CURRENT_USER` holding one subkey per registered distro.
pub const LXSS_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Lxss";

/// One distro subkey. Values that are missing or of the wrong type are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LxssEntry {
    pub name: Option<String>,
    pub base_path: Option<String>,
    pub version: Option<u32>,
}

impl LxssEntry {
    /// Metadata for this entry, if it has a non-blank base path.
    #[must_use]
    pub fn info(&self) -> Option<DistroInfo> {
        let base_path = self.base_path.as_deref().map(str::trim).filter(|p| !p.is_empty())?;
        Some(DistroInfo {
            base_path: PathBuf::from(base_path),
            version: self.version.unwrap_or(0),
        })
    }
}

/// Metadata of the entry registered as `name` (case-insensitive).
#[must_use]
pub fn find_entry(entries: impl IntoIterator<Item = LxssEntry>, name: &str) -> Option<DistroInfo> {
    entries
        .into_iter()
        .find(|entry| {
            entry
                .name
                .as_deref()
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name.trim()))
        })
        .and_then(|entry| entry.info())
}

/// Production `DistroRegistry` over the current user's Lxss key.
#[derive(Debug, Default, Clone, Copy)]
pub struct LxssRegistry;

impl DistroRegistry for LxssRegistry {
    async fn lookup(&self, name: &str, _cancel: &CancellationToken) -> Result<Option<DistroInfo>> {
        Ok(find_entry(read_entries()?, name))
    }
}

#[cfg(windows)]
fn read_entries() -> Result<Vec<LxssEntry>> {
    use anyhow::Context;
    use winreg::RegKey;
    use winreg::enums::{HKEY_CURRENT_USER, KEY_READ};

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let lxss = match hkcu.open_subkey_with_flags(LXSS_KEY, KEY_READ) {
        Ok(key) => key,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no Lxss key; no metadata");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err).context("opening HKCU\\...\\Lxss"),
    };

    let mut entries = Vec::new();
    for subkey in lxss.enum_keys() {
        let subkey = subkey.context("enumerating Lxss subkeys")?;
        let key = lxss
            .open_subkey_with_flags(&subkey, KEY_READ)
            .with_context(|| format!("opening Lxss\\{subkey}"))?;
        entries.push(LxssEntry {
            name: key.get_value::<String, _>("DistributionName").ok(),
            base_path: key.get_value::<String, _>("BasePath").ok(),
            version: key.get_value::<u32, _>("Version").ok(),
        });
    }
    Ok(entries)
}

#[cfg(not(windows))]
#[allow(clippy::unnecessary_wraps)]
fn read_entries() -> Result<Vec<LxssEntry>> {
    tracing::debug!("no Windows registry on this host; no metadata");
    Ok(Vec::new())
}
