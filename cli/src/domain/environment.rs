//! Environment metadata and guest provisioning constants.

use std::path::PathBuf;

/// Guest directory the host working directory is mounted on, and the
/// default start directory for interactive shells.
pub const GUEST_WORKDIR: &str = "/wkdir";

/// Host subfolder of an instance directory that is bind-mounted into the guest.
pub const HOST_WORKDIR: &str = "wkdir";

/// Disk image file WSL2 keeps under an environment's base path.
pub const VHDX_FILE: &str = "ext4.vhdx";

/// Registry format version of a virtual-disk-backed (WSL2) environment.
pub const VHD_VERSION: u32 = 2;

/// Metadata the host keeps for a registered environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistroInfo {
    /// Host directory holding the environment's storage.
    pub base_path: PathBuf,
    /// Format version (1 = directory-backed, 2 = virtual disk).
    pub version: u32,
}

impl DistroInfo {
    /// Path of the virtual disk, when this is a disk-backed environment.
    #[must_use]
    pub fn vhdx_path(&self) -> Option<PathBuf> {
        (self.version == VHD_VERSION).then(|| self.base_path.join(VHDX_FILE))
    }
}

/// Whether a quiet-list line names an environment (contains a letter or digit).
#[must_use]
pub fn is_listable_name(line: &str) -> bool {
    line.chars().any(char::is_alphanumeric)
}
