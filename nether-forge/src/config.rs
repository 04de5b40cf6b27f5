//! Asset storage configuration
//!
//! The storage root is resolved once at startup and handed to
//! [`AssetGenerator::new`](crate::AssetGenerator::new); nothing in the pipeline
//! reads the environment mid-request.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default storage root when nothing else is configured
pub const DEFAULT_ASSETS_DIR: &str = "./generated_assets";

/// Subdirectory used under a mounted persistent disk
pub const DISK_ASSETS_SUBDIR: &str = "generated_assets";

/// Persistent disk mount point; takes precedence over `ASSETS_DIR`
pub const ENV_DISK_PATH: &str = "RENDER_DISK_PATH";

/// Explicit storage root
pub const ENV_ASSETS_DIR: &str = "ASSETS_DIR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeConfig {
    /// Directory generated assets are written into
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

fn default_assets_dir() -> PathBuf { PathBuf::from(DEFAULT_ASSETS_DIR) }

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
        }
    }
}

impl ForgeConfig {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
        }
    }

    /// Resolve from `RENDER_DISK_PATH` / `ASSETS_DIR`
    pub fn from_env() -> Self {
        Self::new(resolve_assets_dir(
            std::env::var_os(ENV_DISK_PATH),
            std::env::var_os(ENV_ASSETS_DIR),
        ))
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Pick the storage root from the two environment values
///
/// A persistent disk wins (assets go into its `generated_assets`
/// subdirectory), then an explicit `ASSETS_DIR`, then the default. Empty
/// values count as unset.
pub fn resolve_assets_dir(disk_path: Option<OsString>, assets_dir: Option<OsString>) -> PathBuf {
    let disk_path = disk_path.filter(|v| !v.is_empty());
    let assets_dir = assets_dir.filter(|v| !v.is_empty());

    match (disk_path, assets_dir) {
        (Some(disk), _) => PathBuf::from(disk).join(DISK_ASSETS_SUBDIR),
        (None, Some(dir)) => PathBuf::from(dir),
        (None, None) => default_assets_dir(),
    }
}
