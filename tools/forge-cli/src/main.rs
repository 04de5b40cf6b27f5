//! nether-forge - prompt-driven mesh asset generator
//!
//! Generates procedural meshes from text prompts and writes them as
//! glTF/GLB/OBJ/STL/PLY/OFF files into the asset directory.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rayon::iter::Either;
use rayon::prelude::*;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use tracing::error;

use nether_forge::config::ForgeConfig;
use nether_forge::export::ExportFormat;
use nether_forge::{
    AssetGenerator, ForgeError, GenerationRequest, GenerationResult, classify, read_mesh,
};

#[derive(Parser)]
#[command(name = "nether-forge")]
#[command(about = "Prompt-driven procedural mesh asset generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a mesh asset from a prompt
    Generate {
        /// Text prompt describing the asset
        prompt: String,

        /// Art style tag (recorded in metadata)
        #[arg(long, default_value = "low-poly")]
        style: String,

        /// Asset type: prop, weapon, building
        #[arg(short, long, default_value = "prop")]
        asset_type: String,

        /// Target triangle count, at least 1 (recorded in metadata)
        #[arg(short, long, default_value = "1000")]
        poly_count: NonZeroU32,

        /// Level of detail (recorded in metadata)
        #[arg(short, long, default_value_t = 0)]
        lod: u32,

        /// Output format (gltf, glb, obj, stl, ply, off; fbx is written as obj)
        #[arg(short, long, default_value = "gltf")]
        format: String,

        /// Asset directory (overrides config file and environment)
        #[arg(short = 'o', long)]
        assets_dir: Option<PathBuf>,

        /// Path to a forge.toml config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of assets to generate in parallel
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Show which shape a prompt maps to
    Classify {
        /// Text prompt
        prompt: String,

        /// Asset type: prop, weapon, building
        #[arg(short, long, default_value = "prop")]
        asset_type: String,
    },

    /// Read back a generated asset and print its counts and bounds
    Inspect {
        /// Mesh file (gltf/glb/obj/stl/ply/off)
        input: PathBuf,
    },

    /// List supported output formats
    Formats,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            prompt,
            style,
            asset_type,
            poly_count,
            lod,
            format,
            assets_dir,
            config,
            count,
        } => {
            if count == 0 {
                bail!("--count must be at least 1");
            }

            let config = resolve_config(assets_dir, config.as_deref())?;
            let generator = AssetGenerator::new(&config)
                .with_context(|| format!("Failed to prepare {:?}", config.assets_dir))?;

            let request = GenerationRequest::new(prompt)
                .with_style(style)
                .with_asset_type(asset_type)
                .with_target_poly_count(poly_count)
                .with_lod_level(lod)
                .with_output_format(format);

            let (results, failures) = generate_batch(&generator, &request, count);

            // Assets that were written are reported even when others failed
            if count == 1 {
                if let Some(result) = results.first() {
                    println!("{}", serde_json::to_string_pretty(result)?);
                }
            } else if !results.is_empty() {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }

            let failed = failures.len();
            for err in &failures {
                error!("Asset generation failed: {}", err);
            }
            if let Some(first) = failures.into_iter().next() {
                return Err(anyhow::Error::new(first)
                    .context(format!("{} of {} asset generations failed", failed, count)));
            }
        }

        Commands::Classify { prompt, asset_type } => {
            println!("{}", classify(&prompt, &asset_type));
        }

        Commands::Inspect { input } => {
            let mesh = read_mesh(&input).with_context(|| format!("Failed to read {:?}", input))?;
            let (min, max) = mesh.bounds();
            println!("vertices: {}", mesh.vertex_count());
            println!("triangles: {}", mesh.face_count());
            println!("bounds: {:?} .. {:?}", min, max);
        }

        Commands::Formats => {
            for format in ExportFormat::ALL {
                println!("{}", format);
            }
            for (from, to) in ExportFormat::substitutions() {
                println!("{} -> {}", from, to);
            }
        }
    }

    Ok(())
}

/// Run `count` independent generations in parallel, keeping successes and
/// failures apart
fn generate_batch(
    generator: &AssetGenerator,
    request: &GenerationRequest,
    count: usize,
) -> (Vec<GenerationResult>, Vec<ForgeError>) {
    (0..count)
        .into_par_iter()
        .map(|_| generator.generate(request))
        .partition_map(|result| match result {
            Ok(generated) => Either::Left(generated),
            Err(err) => Either::Right(err),
        })
}

/// Command-line directory > config file > environment
fn resolve_config(assets_dir: Option<PathBuf>, config: Option<&Path>) -> Result<ForgeConfig> {
    if let Some(dir) = assets_dir {
        return Ok(ForgeConfig::new(dir));
    }
    if let Some(path) = config {
        return ForgeConfig::load(path).with_context(|| format!("Failed to load {:?}", path));
    }
    Ok(ForgeConfig::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nether_forge::{MeshSynthesizer, RawMesh, ShapeKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    /// Every second call yields an empty mesh, which fails validation
    struct AlternatingSynthesizer {
        calls: AtomicUsize,
    }

    impl MeshSynthesizer for AlternatingSynthesizer {
        fn name(&self) -> &str {
            "alternating"
        }

        fn synthesize(&self, _request: &GenerationRequest) -> nether_forge::Result<RawMesh> {
            if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                Ok(ShapeKind::Box.build())
            } else {
                Ok(RawMesh::new())
            }
        }
    }

    #[test]
    fn test_batch_keeps_written_assets_when_some_fail() {
        let dir = tempdir().unwrap();
        let generator = AssetGenerator::with_synthesizer(
            &ForgeConfig::new(dir.path()),
            Box::new(AlternatingSynthesizer {
                calls: AtomicUsize::new(0),
            }),
        )
        .unwrap();

        let request = GenerationRequest::new("crate").with_output_format("obj");
        let (results, failures) = generate_batch(&generator, &request, 6);

        assert_eq!(results.len(), 3);
        assert_eq!(failures.len(), 3);
        assert!(failures.iter().all(|e| matches!(e, ForgeError::Validation(_))));
        for result in &results {
            assert!(result.file_path().exists());
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_zero_poly_count_is_rejected() {
        let parsed = Cli::try_parse_from(["nether-forge", "generate", "crate", "-p", "0"]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from(["nether-forge", "generate", "crate"]).unwrap();
        match parsed.command {
            Commands::Generate { poly_count, .. } => assert_eq!(poly_count.get(), 1000),
            _ => panic!("expected generate"),
        }
    }
}
