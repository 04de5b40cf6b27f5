//! Prompt-driven procedural mesh asset generation
//!
//! Turns a text prompt plus generation hints into a mesh file on disk and a
//! metadata record. Shape choice is deterministic keyword dispatch over a
//! small library of primitives; the [`MeshSynthesizer`] trait is the seam
//! where a learned model can replace it.
//!
//! # Example
//! ```no_run
//! use nether_forge::{AssetGenerator, ForgeConfig, GenerationRequest};
//!
//! let generator = AssetGenerator::new(&ForgeConfig::from_env())?;
//! let request = GenerationRequest::new("a wooden crate").with_output_format("glb");
//!
//! let result = generator.generate(&request)?;
//! println!(
//!     "{:?}: {} triangles",
//!     result.file_path(),
//!     result.metadata().poly_count
//! );
//! # Ok::<(), nether_forge::ForgeError>(())
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod generate;
pub mod import;
pub mod mesh;
pub mod request;
pub mod shapes;
pub mod synth;

pub use classify::{ShapeKind, classify};
pub use config::ForgeConfig;
pub use error::{ForgeError, Result, ValidationError};
pub use export::{ExportFormat, Exporter};
pub use generate::AssetGenerator;
pub use import::read_mesh;
pub use mesh::{Mesh, RawMesh};
pub use request::{AssetMetadata, GenerationRequest, GenerationResult};
pub use synth::{MeshSynthesizer, ProceduralSynthesizer};
