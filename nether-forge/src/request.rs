//! Generation request and result types

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

/// Material slots reported for every generated asset
pub const MATERIAL_SLOTS: u32 = 1;

/// Triangle budget used when a request does not name one
pub const DEFAULT_TARGET_POLY_COUNT: NonZeroU32 = match NonZeroU32::new(1000) {
    Some(count) => count,
    None => panic!("default triangle budget must be positive"),
};

/// Parameters for one asset generation
///
/// `target_poly_count` and `lod_level` are hints. The procedural shapes do not
/// remesh to meet them; they are copied into the result metadata unchanged.
/// A zero triangle budget is rejected when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_asset_type")]
    pub asset_type: String,
    #[serde(default = "default_poly_count", alias = "poly_count")]
    pub target_poly_count: NonZeroU32,
    #[serde(default)]
    pub lod_level: u32,
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

fn default_style() -> String { "low-poly".to_string() }
fn default_asset_type() -> String { "prop".to_string() }
fn default_poly_count() -> NonZeroU32 { DEFAULT_TARGET_POLY_COUNT }
fn default_output_format() -> String { "gltf".to_string() }

impl GenerationRequest {
    /// Create a request with default parameters
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style: default_style(),
            asset_type: default_asset_type(),
            target_poly_count: default_poly_count(),
            lod_level: 0,
            output_format: default_output_format(),
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_asset_type(mut self, asset_type: impl Into<String>) -> Self {
        self.asset_type = asset_type.into();
        self
    }

    pub fn with_target_poly_count(mut self, target_poly_count: NonZeroU32) -> Self {
        self.target_poly_count = target_poly_count;
        self
    }

    pub fn with_lod_level(mut self, lod_level: u32) -> Self {
        self.lod_level = lod_level;
        self
    }

    pub fn with_output_format(mut self, output_format: impl Into<String>) -> Self {
        self.output_format = output_format.into();
        self
    }
}

/// Descriptive metadata for a generated asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    /// Measured triangle count
    pub poly_count: usize,
    /// Measured vertex count
    pub vertex_count: usize,
    pub material_slots: u32,
    pub style: String,
    pub asset_type: String,
    pub lod_level: u32,
    /// Requested triangle budget, passed through
    pub target_poly_count: NonZeroU32,
    /// Format actually written
    pub output_format: String,
    /// Requested format when it was replaced by `output_format`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substituted_from: Option<String>,
}

/// A written asset and its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    file_path: PathBuf,
    metadata: AssetMetadata,
}

impl GenerationResult {
    pub(crate) fn new(file_path: PathBuf, metadata: AssetMetadata) -> Self {
        Self {
            file_path,
            metadata,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn metadata(&self) -> &AssetMetadata {
        &self.metadata
    }
}
