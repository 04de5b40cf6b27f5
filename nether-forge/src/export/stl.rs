//! Binary STL writer

use std::io::{self, Write};

use crate::mesh::Mesh;

/// Size of the (unused) binary STL header
pub(crate) const STL_HEADER_LEN: usize = 80;
/// Bytes per triangle record: normal + 3 corners (12 f32) + attribute u16
pub(crate) const STL_TRIANGLE_LEN: usize = 50;

/// Write `mesh` as binary STL
///
/// STL stores each triangle independently; shared vertices are recovered on
/// import by welding identical positions. Vertex counts therefore survive a
/// round trip only when every vertex is referenced by a face and no two
/// vertices share a position, which holds for the built-in shapes.
pub fn write_stl<W: Write>(mesh: &Mesh, writer: &mut W) -> io::Result<()> {
    let mut header = [0u8; STL_HEADER_LEN];
    let tag = b"nether-forge binary STL";
    header[..tag.len()].copy_from_slice(tag);
    writer.write_all(&header)?;

    let count = u32::try_from(mesh.face_count())
        .map_err(|_| io::Error::other("too many triangles for STL"))?;
    writer.write_all(&count.to_le_bytes())?;

    for face in 0..mesh.face_count() {
        let mut record = [0u8; STL_TRIANGLE_LEN];
        let normal = mesh.face_normal(face);
        let corners = mesh.triangle(face).map(|c| c.to_array());

        let floats = std::iter::once(normal).chain(corners).flatten();
        for (slot, value) in record.chunks_exact_mut(4).zip(floats) {
            slot.copy_from_slice(&value.to_le_bytes());
        }
        // Trailing attribute byte count stays zero
        writer.write_all(&record)?;
    }

    Ok(())
}
