//! Mesh export
//!
//! Writes a validated [`Mesh`] into the asset directory as `<uuid>.<ext>`.
//! Files are opened with create-new semantics, so an existing asset is never
//! overwritten, and a failed write removes its partial file before the error is
//! returned.

mod format;
mod glb;
pub(crate) mod stl;
mod text;

pub use format::{ExportFormat, FormatChoice, resolve_format};
pub use glb::write_glb;
pub use stl::write_stl;
pub use text::{write_obj, write_off, write_ply};

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ForgeError, Result};
use crate::mesh::Mesh;

/// A file written by the exporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedAsset {
    pub path: PathBuf,
    pub format: ExportFormat,
    /// Requested format name when it was substituted
    pub substituted_from: Option<String>,
}

/// Serialize `mesh` in `format` to any writer
pub fn encode<W: Write>(mesh: &Mesh, format: ExportFormat, writer: &mut W) -> io::Result<()> {
    match format {
        ExportFormat::Gltf | ExportFormat::Glb => write_glb(mesh, writer),
        ExportFormat::Obj => write_obj(mesh, writer),
        ExportFormat::Stl => write_stl(mesh, writer),
        ExportFormat::Ply => write_ply(mesh, writer),
        ExportFormat::Off => write_off(mesh, writer),
    }
}

/// Writes uniquely named asset files into one directory
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Resolve `requested` and export
    pub fn export(&self, mesh: &Mesh, requested: &str) -> Result<ExportedAsset> {
        let choice = resolve_format(requested)?;
        self.export_as(mesh, choice)
    }

    /// Export with an already resolved format
    pub fn export_as(&self, mesh: &Mesh, choice: FormatChoice) -> Result<ExportedAsset> {
        let FormatChoice {
            format,
            substituted_from,
        } = choice;

        if let Some(requested) = &substituted_from {
            warn!(
                "{} export is not supported, writing {} instead",
                requested,
                format.name()
            );
        }

        let file_name = format!("{}.{}", Uuid::new_v4(), format.extension());
        let path = self.output_dir.join(file_name);

        write_new_file(&path, |writer| encode(mesh, format, writer))
            .map_err(|source| ForgeError::filesystem(&path, source))?;

        debug!(
            "Exported {} mesh: {} vertices, {} triangles -> {:?}",
            format.name(),
            mesh.vertex_count(),
            mesh.face_count(),
            path
        );

        Ok(ExportedAsset {
            path,
            format,
            substituted_from,
        })
    }
}

/// Create `path` (failing if it exists) and fill it with `write`
///
/// On any error after creation the partial file is removed.
fn write_new_file<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<fs::File>) -> io::Result<()>,
{
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let mut writer = BufWriter::new(file);

    let result = write(&mut writer)
        .and_then(|()| writer.flush())
        .and_then(|()| writer.get_ref().sync_all());

    if let Err(err) = result {
        drop(writer);
        if let Err(cleanup) = fs::remove_file(path) {
            warn!("Failed to remove partial file {:?}: {}", path, cleanup);
        }
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ShapeKind;
    use tempfile::tempdir;

    fn unit_box() -> Mesh {
        Mesh::from_raw(ShapeKind::Box.build()).unwrap()
    }

    #[test]
    fn test_export_uses_requested_extension() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::new(dir.path());
        let asset = exporter.export(&unit_box(), "gltf").unwrap();

        assert_eq!(asset.format, ExportFormat::Gltf);
        assert_eq!(asset.path.extension().unwrap(), "gltf");
        assert_eq!(asset.path.parent().unwrap(), dir.path());
        assert!(asset.path.exists());

        // gltf requests are written as binary glTF
        let bytes = fs::read(&asset.path).unwrap();
        assert_eq!(&bytes[..4], b"glTF");
    }

    #[test]
    fn test_export_file_stem_is_uuid() {
        let dir = tempdir().unwrap();
        let asset = Exporter::new(dir.path()).export(&unit_box(), "obj").unwrap();
        let stem = asset.path.file_stem().unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(stem).is_ok());
    }

    #[test]
    fn test_fbx_is_substituted_with_obj() {
        let dir = tempdir().unwrap();
        let asset = Exporter::new(dir.path()).export(&unit_box(), "fbx").unwrap();

        assert_eq!(asset.format, ExportFormat::Obj);
        assert_eq!(asset.substituted_from.as_deref(), Some("fbx"));
        assert_eq!(asset.path.extension().unwrap(), "obj");
        assert!(asset.path.exists());
    }

    #[test]
    fn test_unsupported_format_writes_nothing() {
        let dir = tempdir().unwrap();
        let err = Exporter::new(dir.path())
            .export(&unit_box(), "blend")
            .unwrap_err();

        assert!(matches!(err, ForgeError::UnsupportedFormat { ref format } if format == "blend"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_directory_is_filesystem_error() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::new(dir.path().join("missing"));
        let err = exporter.export(&unit_box(), "obj").unwrap_err();
        assert!(matches!(err, ForgeError::Filesystem { .. }));
    }

    #[test]
    fn test_exports_never_share_a_path() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::new(dir.path());
        let mesh = unit_box();
        let a = exporter.export(&mesh, "glb").unwrap();
        let b = exporter.export(&mesh, "glb").unwrap();
        assert_ne!(a.path, b.path);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_write_new_file_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("taken.obj");
        fs::write(&path, b"keep me").unwrap();

        let err = write_new_file(&path, |w| w.write_all(b"replaced")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&path).unwrap(), b"keep me");
    }

    #[test]
    fn test_write_new_file_removes_partial_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.obj");

        let err = write_new_file(&path, |w| {
            w.write_all(b"v 0 0 0\n")?;
            Err(io::Error::other("disk full"))
        })
        .unwrap_err();

        assert_eq!(err.to_string(), "disk full");
        assert!(!path.exists());
    }
}
