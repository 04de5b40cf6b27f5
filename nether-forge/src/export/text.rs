//! Text mesh writers: OBJ, PLY (ASCII), OFF
//!
//! Floats are written with Rust's shortest round-trip formatting, so parsing
//! the file back yields bit-identical positions.

use std::io::{self, Write};

use crate::mesh::Mesh;

/// Write `mesh` as Wavefront OBJ (positions and faces only)
pub fn write_obj<W: Write>(mesh: &Mesh, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "# nether-forge")?;
    writeln!(writer, "o generated")?;

    for [x, y, z] in mesh.vertices() {
        writeln!(writer, "v {} {} {}", x, y, z)?;
    }

    // OBJ indices are 1-based
    for [a, b, c] in mesh.faces() {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }

    Ok(())
}

/// Write `mesh` as ASCII Stanford PLY
pub fn write_ply<W: Write>(mesh: &Mesh, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment nether-forge")?;
    writeln!(writer, "element vertex {}", mesh.vertex_count())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "element face {}", mesh.face_count())?;
    writeln!(writer, "property list uchar uint vertex_indices")?;
    writeln!(writer, "end_header")?;

    for [x, y, z] in mesh.vertices() {
        writeln!(writer, "{} {} {}", x, y, z)?;
    }
    for [a, b, c] in mesh.faces() {
        writeln!(writer, "3 {} {} {}", a, b, c)?;
    }

    Ok(())
}

/// Write `mesh` as OFF
pub fn write_off<W: Write>(mesh: &Mesh, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "OFF")?;
    writeln!(writer, "{} {} 0", mesh.vertex_count(), mesh.face_count())?;

    for [x, y, z] in mesh.vertices() {
        writeln!(writer, "{} {} {}", x, y, z)?;
    }
    for [a, b, c] in mesh.faces() {
        writeln!(writer, "3 {} {} {}", a, b, c)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh::new(
            vec![[0.0, 0.0, 0.0], [1.5, 0.0, 0.0], [0.0, 0.1, -2.0]],
            vec![[0, 1, 2]],
        )
        .unwrap()
    }

    fn render(write: fn(&Mesh, &mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        write(&triangle(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_obj_output() {
        let obj = render(write_obj);
        assert!(obj.contains("v 1.5 0 0\n"));
        assert!(obj.contains("v 0 0.1 -2\n"));
        assert!(obj.ends_with("f 1 2 3\n"));
    }

    #[test]
    fn test_ply_output() {
        let ply = render(write_ply);
        assert!(ply.starts_with("ply\nformat ascii 1.0\n"));
        assert!(ply.contains("element vertex 3\n"));
        assert!(ply.contains("element face 1\n"));
        assert!(ply.ends_with("end_header\n0 0 0\n1.5 0 0\n0 0.1 -2\n3 0 1 2\n"));
    }

    #[test]
    fn test_off_output() {
        let off = render(write_off);
        assert_eq!(off, "OFF\n3 1 0\n0 0 0\n1.5 0 0\n0 0.1 -2\n3 0 1 2\n");
    }
}
