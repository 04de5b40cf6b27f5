//! Generation orchestrator
//!
//! [`AssetGenerator::generate`] is the single entry point of the pipeline:
//! resolve format → synthesize → validate → export → describe. It holds no
//! per-request state, so one generator can serve concurrent callers.

use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::ForgeConfig;
use crate::error::{ForgeError, Result};
use crate::export::{Exporter, resolve_format};
use crate::mesh::Mesh;
use crate::request::{AssetMetadata, GenerationRequest, GenerationResult, MATERIAL_SLOTS};
use crate::synth::{MeshSynthesizer, ProceduralSynthesizer};

pub struct AssetGenerator {
    synthesizer: Box<dyn MeshSynthesizer>,
    exporter: Exporter,
}

impl AssetGenerator {
    /// Create a generator using the procedural synthesizer
    ///
    /// Creates the storage root if it does not exist.
    pub fn new(config: &ForgeConfig) -> Result<Self> {
        Self::with_synthesizer(config, Box::new(ProceduralSynthesizer))
    }

    /// Create a generator with a custom mesh source
    pub fn with_synthesizer(
        config: &ForgeConfig,
        synthesizer: Box<dyn MeshSynthesizer>,
    ) -> Result<Self> {
        fs::create_dir_all(&config.assets_dir)
            .map_err(|source| ForgeError::filesystem(&config.assets_dir, source))?;

        info!(
            "Asset generator ready: synthesizer={}, assets_dir={:?}",
            synthesizer.name(),
            config.assets_dir
        );

        Ok(Self {
            synthesizer,
            exporter: Exporter::new(&config.assets_dir),
        })
    }

    pub fn assets_dir(&self) -> &Path {
        self.exporter.output_dir()
    }

    /// Generate one asset
    ///
    /// On error nothing is left behind in the storage root and no path is
    /// returned.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        // Resolve first so unsupported formats fail before any work
        let choice = resolve_format(&request.output_format)?;

        let raw = self.synthesizer.synthesize(request)?;
        let mesh = Mesh::from_raw(raw)?;
        let exported = self.exporter.export_as(&mesh, choice)?;

        let metadata = AssetMetadata {
            poly_count: mesh.face_count(),
            vertex_count: mesh.vertex_count(),
            material_slots: MATERIAL_SLOTS,
            style: request.style.clone(),
            asset_type: request.asset_type.clone(),
            lod_level: request.lod_level,
            target_poly_count: request.target_poly_count,
            output_format: exported.format.name().to_string(),
            substituted_from: exported.substituted_from,
        };

        info!(
            "Generated {} asset for {:?}: {} triangles -> {:?}",
            request.asset_type, request.prompt, metadata.poly_count, exported.path
        );

        Ok(GenerationResult::new(exported.path, metadata))
    }
}
