//! Output format resolution

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ForgeError, Result};

/// Formats the exporter can write natively
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Binary glTF container saved with a `.gltf` extension
    Gltf,
    /// Binary glTF container
    Glb,
    /// Wavefront OBJ (text)
    Obj,
    /// Binary STL
    Stl,
    /// Stanford PLY (ASCII)
    Ply,
    /// Object File Format (text)
    Off,
}

/// Requested formats with no writer, and what is written instead
const SUBSTITUTIONS: &[(&str, ExportFormat)] = &[("fbx", ExportFormat::Obj)];

impl ExportFormat {
    pub const ALL: [ExportFormat; 6] = [
        ExportFormat::Gltf,
        ExportFormat::Glb,
        ExportFormat::Obj,
        ExportFormat::Stl,
        ExportFormat::Ply,
        ExportFormat::Off,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Gltf => "gltf",
            ExportFormat::Glb => "glb",
            ExportFormat::Obj => "obj",
            ExportFormat::Stl => "stl",
            ExportFormat::Ply => "ply",
            ExportFormat::Off => "off",
        }
    }

    /// File extension (without the dot)
    pub fn extension(self) -> &'static str {
        self.name()
    }

    /// Look up a native format by name or extension (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = normalize(name);
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Substitutions as (requested, written) pairs
    pub fn substitutions() -> impl Iterator<Item = (&'static str, ExportFormat)> {
        SUBSTITUTIONS.iter().copied()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn normalize(name: &str) -> String {
    name.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Outcome of format resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatChoice {
    pub format: ExportFormat,
    /// Original request when `format` is a substitute
    pub substituted_from: Option<String>,
}

/// Map a requested format name to what will actually be written
///
/// Native formats map to themselves. Formats with a registered substitute
/// (currently `fbx` → `obj`) resolve to the substitute and record the original
/// request. Anything else is an [`ForgeError::UnsupportedFormat`].
pub fn resolve_format(requested: &str) -> Result<FormatChoice> {
    if let Some(format) = ExportFormat::from_name(requested) {
        return Ok(FormatChoice {
            format,
            substituted_from: None,
        });
    }

    let name = normalize(requested);
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == name)
        .map(|&(from, format)| FormatChoice {
            format,
            substituted_from: Some(from.to_string()),
        })
        .ok_or_else(|| ForgeError::UnsupportedFormat {
            format: requested.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_formats_resolve_to_themselves() {
        for format in ExportFormat::ALL {
            let choice = resolve_format(format.name()).unwrap();
            assert_eq!(choice.format, format);
            assert_eq!(choice.substituted_from, None);
        }
    }

    #[test]
    fn test_names_are_normalized() {
        assert_eq!(ExportFormat::from_name("GLB"), Some(ExportFormat::Glb));
        assert_eq!(ExportFormat::from_name(".obj"), Some(ExportFormat::Obj));
        assert_eq!(ExportFormat::from_name(" Stl "), Some(ExportFormat::Stl));
    }

    #[test]
    fn test_fbx_resolves_to_obj() {
        let choice = resolve_format("FBX").unwrap();
        assert_eq!(choice.format, ExportFormat::Obj);
        assert_eq!(choice.substituted_from.as_deref(), Some("fbx"));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        for requested in ["usdz", "", "blend"] {
            match resolve_format(requested) {
                Err(ForgeError::UnsupportedFormat { format }) => assert_eq!(format, requested),
                other => panic!("expected unsupported format for {requested:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_substitutes_are_native() {
        for (from, to) in ExportFormat::substitutions() {
            assert!(ExportFormat::from_name(from).is_none());
            assert!(ExportFormat::ALL.contains(&to));
        }
    }
}
