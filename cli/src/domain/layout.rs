//! On-disk layout of the instance root.
//!
//! ```text
//! <root>/
//!   base/ubuntu-base.tar     cached base image
//!   instances/<name>/        default instance directories
//! ```

use std::path::{Path, PathBuf};

/// File name of the cached base image.
pub const BASE_IMAGE_FILE: &str = "ubuntu-base.tar";

/// Resolves every well-known path under the instance root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceLayout {
    root: PathBuf,
}

impl InstanceLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn base_dir(&self) -> PathBuf {
        self.root.join("base")
    }

    #[must_use]
    pub fn instances_dir(&self) -> PathBuf {
        self.root.join("instances")
    }

    #[must_use]
    pub fn base_image_path(&self) -> PathBuf {
        self.base_dir().join(BASE_IMAGE_FILE)
    }

    /// Default instance directory for an environment.
    #[must_use]
    pub fn instance_dir(&self, name: &str) -> PathBuf {
        self.instances_dir().join(name)
    }
}
