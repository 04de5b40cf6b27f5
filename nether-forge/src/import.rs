//! Asset import
//!
//! Reads back any file the exporter writes. Used to verify exports and by the
//! CLI `inspect` command. The format is picked from the file extension; both
//! `.gltf` and `.glb` are parsed as glTF (binary or JSON).

use hashbrown::HashMap;
use std::path::Path;

use crate::error::{ForgeError, Result};
use crate::export::ExportFormat;
use crate::mesh::{Mesh, RawMesh};

type ParseResult<T> = std::result::Result<T, String>;

/// Read a mesh file written in any supported export format
///
/// glTF, OBJ, PLY and OFF return the written vertex list unchanged. STL has no
/// vertex list: positions are welded, so duplicated positions collapse into
/// one vertex and unreferenced vertices are lost.
pub fn read_mesh(path: &Path) -> Result<Mesh> {
    let import_error = |reason: String| ForgeError::Import {
        path: path.to_path_buf(),
        reason,
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let format = ExportFormat::from_name(extension)
        .ok_or_else(|| import_error(format!("unrecognized extension {:?}", extension)))?;

    let bytes = std::fs::read(path).map_err(|source| ForgeError::filesystem(path, source))?;

    let raw = match format {
        ExportFormat::Gltf | ExportFormat::Glb => parse_gltf(&bytes),
        ExportFormat::Stl => parse_stl(&bytes),
        ExportFormat::Obj => as_text(&bytes).and_then(parse_obj),
        ExportFormat::Ply => as_text(&bytes).and_then(parse_ply),
        ExportFormat::Off => as_text(&bytes).and_then(parse_off),
    }
    .map_err(import_error)?;

    Ok(Mesh::from_raw(raw)?)
}

fn as_text(bytes: &[u8]) -> ParseResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| format!("not valid UTF-8: {}", e))
}

/// Parse glTF (JSON or GLB); every triangle primitive of every mesh is merged
pub fn parse_gltf(bytes: &[u8]) -> ParseResult<RawMesh> {
    let (document, buffers, _images) =
        gltf::import_slice(bytes).map_err(|e| format!("invalid glTF: {}", e))?;

    let mut mesh = RawMesh::new();
    for primitive in document.meshes().flat_map(|m| m.primitives()) {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            continue;
        }
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .ok_or("primitive has no positions")?
            .collect();

        // Non-indexed primitives use consecutive vertex triples
        let indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let offset = mesh.vertices.len() as u32;
        mesh.vertices.extend(positions);
        mesh.faces.extend(
            indices
                .chunks_exact(3)
                .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]),
        );
    }

    Ok(mesh)
}

/// Parse binary STL, welding bit-identical corner positions
pub fn parse_stl(bytes: &[u8]) -> ParseResult<RawMesh> {
    use crate::export::stl::{STL_HEADER_LEN, STL_TRIANGLE_LEN};

    let count_bytes = bytes
        .get(STL_HEADER_LEN..STL_HEADER_LEN + 4)
        .ok_or("file too short for binary STL header")?;
    let count = u32::from_le_bytes([count_bytes[0], count_bytes[1], count_bytes[2], count_bytes[3]])
        as usize;

    let body = &bytes[STL_HEADER_LEN + 4..];
    if body.len() < count * STL_TRIANGLE_LEN {
        return Err(format!(
            "expected {} triangles ({} bytes), found {} bytes",
            count,
            count * STL_TRIANGLE_LEN,
            body.len()
        ));
    }

    let mut mesh = RawMesh::new();
    let mut welded: HashMap<[u32; 3], u32> = HashMap::new();

    for record in body.chunks_exact(STL_TRIANGLE_LEN).take(count) {
        let floats: Vec<f32> = record[..48]
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        // floats[0..3] is the facet normal; corners follow
        let mut face = [0u32; 3];
        for (corner, slot) in face.iter_mut().enumerate() {
            let p = [
                floats[3 + corner * 3],
                floats[4 + corner * 3],
                floats[5 + corner * 3],
            ];
            let key = p.map(f32::to_bits);
            *slot = *welded.entry(key).or_insert_with(|| {
                mesh.vertices.push(p);
                (mesh.vertices.len() - 1) as u32
            });
        }
        mesh.faces.push(face);
    }

    Ok(mesh)
}

/// Parse Wavefront OBJ positions and faces; polygons are fan-triangulated
pub fn parse_obj(text: &str) -> ParseResult<RawMesh> {
    let mut mesh = RawMesh::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" if parts.len() >= 4 => {
                mesh.vertices
                    .push(parse_point(&parts[1..4]).map_err(|e| at_line(line_no, e))?);
            }
            "f" if parts.len() >= 4 => {
                let vertex_count = mesh.vertices.len();
                let corners = parts[1..]
                    .iter()
                    .map(|v| parse_obj_vertex(v, vertex_count))
                    .collect::<ParseResult<Vec<u32>>>()
                    .map_err(|e| at_line(line_no, e))?;
                fan_triangulate(&mut mesh, &corners);
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Parse an OBJ face vertex reference ("v", "v/vt", "v/vt/vn", "v//vn")
///
/// Returns the 0-based position index. Negative references count back from
/// the most recent vertex.
fn parse_obj_vertex(s: &str, vertex_count: usize) -> ParseResult<u32> {
    let index: i64 = s
        .split('/')
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| format!("bad face vertex {:?}", s))?;

    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => vertex_count as i64 + i,
        _ => return Err("face index 0 is invalid (OBJ is 1-based)".to_string()),
    };

    u32::try_from(resolved).map_err(|_| format!("face vertex {:?} out of range", s))
}

/// Parse ASCII PLY with x/y/z as the first three vertex properties
pub fn parse_ply(text: &str) -> ParseResult<RawMesh> {
    let mut lines = text.lines();
    if lines.next().map(str::trim) != Some("ply") {
        return Err("missing ply magic".to_string());
    }

    let mut vertex_count = 0usize;
    let mut face_count = 0usize;
    for line in lines.by_ref() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["format", kind, ..] if *kind != "ascii" => {
                return Err(format!("unsupported PLY encoding {:?}", kind));
            }
            ["element", "vertex", n] => vertex_count = parse_count(n)?,
            ["element", "face", n] => face_count = parse_count(n)?,
            ["end_header"] => break,
            _ => {}
        }
    }

    let mut body = lines.filter(|l| !l.trim().is_empty());
    parse_indexed_body(&mut body, vertex_count, face_count)
}

/// Parse OFF
pub fn parse_off(text: &str) -> ParseResult<RawMesh> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'));

    if lines.next() != Some("OFF") {
        return Err("missing OFF magic".to_string());
    }

    let counts: Vec<&str> = lines
        .next()
        .ok_or("missing OFF counts")?
        .split_whitespace()
        .collect();
    if counts.len() < 2 {
        return Err("OFF counts line needs vertex and face counts".to_string());
    }
    let vertex_count = parse_count(counts[0])?;
    let face_count = parse_count(counts[1])?;

    parse_indexed_body(&mut lines, vertex_count, face_count)
}

/// Shared PLY/OFF body: `vertex_count` point lines then `face_count` polygon lines
fn parse_indexed_body<'a>(
    lines: &mut impl Iterator<Item = &'a str>,
    vertex_count: usize,
    face_count: usize,
) -> ParseResult<RawMesh> {
    let mut mesh = RawMesh::new();

    for i in 0..vertex_count {
        let line = lines
            .next()
            .ok_or_else(|| format!("expected {} vertices, found {}", vertex_count, i))?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(format!("vertex {} has fewer than 3 coordinates", i));
        }
        mesh.vertices.push(parse_point(&parts[..3])?);
    }

    for i in 0..face_count {
        let line = lines
            .next()
            .ok_or_else(|| format!("expected {} faces, found {}", face_count, i))?;
        let values = line
            .split_whitespace()
            .map(|v| v.parse::<u32>().map_err(|e| format!("face {}: {}", i, e)))
            .collect::<ParseResult<Vec<u32>>>()?;

        let (&n, corners) = values
            .split_first()
            .ok_or_else(|| format!("face {} is empty", i))?;
        let corners = corners
            .get(..n as usize)
            .ok_or_else(|| format!("face {} declares {} corners", i, n))?;
        fan_triangulate(&mut mesh, corners);
    }

    Ok(mesh)
}

fn fan_triangulate(mesh: &mut RawMesh, corners: &[u32]) {
    for i in 1..corners.len().saturating_sub(1) {
        mesh.add_triangle(corners[0], corners[i], corners[i + 1]);
    }
}

fn parse_point(parts: &[&str]) -> ParseResult<[f32; 3]> {
    let mut point = [0.0f32; 3];
    for (slot, part) in point.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("bad coordinate {:?}: {}", part, e))?;
    }
    Ok(point)
}

fn parse_count(s: &str) -> ParseResult<usize> {
    s.parse().map_err(|e| format!("bad count {:?}: {}", s, e))
}

fn at_line(line_no: usize, reason: String) -> String {
    format!("line {}: {}", line_no + 1, reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obj_quad_is_fan_triangulated() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = parse_obj(obj).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_obj_slash_and_negative_references() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2//1 -1\n";
        let mesh = parse_obj(obj).unwrap();
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_obj_zero_index_is_rejected() {
        let err = parse_obj("v 0 0 0\nf 0 1 2\n").unwrap_err();
        assert!(err.starts_with("line 2:"), "{err}");
    }

    #[test]
    fn test_off_and_ply_parse() {
        let off = "OFF\n# comment\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";
        assert_eq!(parse_off(off).unwrap().face_count(), 1);

        let ply = "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\n\
                   property float y\nproperty float z\nelement face 1\n\
                   property list uchar uint vertex_indices\nend_header\n\
                   0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";
        let mesh = parse_ply(ply).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_binary_ply_is_rejected() {
        let ply = "ply\nformat binary_little_endian 1.0\nend_header\n";
        assert!(parse_ply(ply).is_err());
    }

    #[test]
    fn test_truncated_files_are_errors() {
        assert!(parse_off("OFF\n3 1 0\n0 0 0\n").is_err());
        assert!(parse_stl(&[0u8; 10]).is_err());

        let mut stl = vec![0u8; 84];
        stl[80] = 2;
        assert!(parse_stl(&stl).is_err());
    }

    #[test]
    fn test_stl_welds_duplicate_and_drops_unreferenced_vertices() {
        let mesh = Mesh::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [9.0, 9.0, 9.0],
            ],
            vec![[0, 1, 2], [3, 4, 2]],
        )
        .unwrap();
        let mut stl = Vec::new();
        crate::export::write_stl(&mesh, &mut stl).unwrap();

        let read = parse_stl(&stl).unwrap();
        assert_eq!(read.vertex_count(), 4);
        assert_eq!(read.faces, vec![[0, 1, 2], [1, 3, 2]]);
    }

    #[test]
    fn test_unknown_extension_is_import_error() {
        let err = read_mesh(Path::new("model.fbx")).unwrap_err();
        assert!(matches!(err, ForgeError::Import { .. }));
    }

    #[test]
    fn test_missing_file_is_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_mesh(&dir.path().join("absent.obj")).unwrap_err();
        assert!(matches!(err, ForgeError::Filesystem { .. }));
    }

    #[test]
    fn test_import_validates_indices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.off");
        std::fs::write(&path, "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 7\n").unwrap();
        let err = read_mesh(&path).unwrap_err();
        assert!(matches!(err, ForgeError::Validation(_)));
    }
}
