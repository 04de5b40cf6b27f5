//! Mesh synthesis seam
//!
//! The orchestrator asks a [`MeshSynthesizer`] for geometry and never looks at
//! how it was produced. Today that is [`ProceduralSynthesizer`]: keyword
//! classification plus the shape library. A learned model plugs in by
//! implementing the same trait; if its inference is asynchronous it can block
//! on its own runtime inside `synthesize`.

use tracing::debug;

use crate::classify::classify;
use crate::error::Result;
use crate::mesh::RawMesh;
use crate::request::GenerationRequest;

/// Produces raw geometry for a request
pub trait MeshSynthesizer: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &str;

    /// Build the mesh for `request`
    ///
    /// The result is validated by the caller before export.
    fn synthesize(&self, request: &GenerationRequest) -> Result<RawMesh>;
}

/// Keyword-driven placeholder synthesizer
#[derive(Debug, Default, Clone, Copy)]
pub struct ProceduralSynthesizer;

impl MeshSynthesizer for ProceduralSynthesizer {
    fn name(&self) -> &str {
        "procedural"
    }

    fn synthesize(&self, request: &GenerationRequest) -> Result<RawMesh> {
        let kind = classify(&request.prompt, &request.asset_type);
        let mesh = kind.build();
        debug!(
            "built {} mesh: {} vertices, {} triangles (target {})",
            kind,
            mesh.vertex_count(),
            mesh.face_count(),
            request.target_poly_count
        );
        Ok(mesh)
    }
}
