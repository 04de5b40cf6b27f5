//! Mesh combining and composite shapes
//!
//! Composite shapes are built by concatenating primitives. Concatenation
//! appends vertex arrays and shifts each later mesh's face indices by the
//! number of vertices already emitted. A wrong offset does not fail loudly,
//! it silently rewires faces to unrelated vertices, so the tests below check
//! index ranges per component.

use crate::mesh::RawMesh;

use super::complex::generate_cylinder;
use super::simple::generate_box;
use super::RADIAL_SEGMENTS;

/// Weapon barrel radius
const WEAPON_BARREL_RADIUS: f32 = 0.1;
/// Weapon barrel length
const WEAPON_BARREL_LENGTH: f32 = 1.0;
/// Weapon body (receiver) extents
const WEAPON_BODY_EXTENTS: [f32; 3] = [0.3, 0.2, 0.1];
/// Building footprint (X, Z) and height (Y)
const BUILDING_EXTENTS: [f32; 3] = [2.0, 3.0, 2.0];

/// Combine multiple meshes into one
///
/// Merges meshes by concatenating their vertex and face data. Face indices of
/// each mesh are offset by the combined vertex count of all meshes before it.
///
/// # Example
/// ```
/// use nether_forge::shapes::*;
///
/// let barrel = generate_cylinder(0.1, 1.0, 32);
/// let body = generate_box([0.3, 0.2, 0.1]);
///
/// let combined = combine(&[&barrel, &body]);
/// assert_eq!(combined.vertex_count(), barrel.vertex_count() + body.vertex_count());
/// ```
pub fn combine(meshes: &[&RawMesh]) -> RawMesh {
    let mut result = RawMesh::new();

    let total_vertices: usize = meshes.iter().map(|m| m.vertices.len()).sum();
    let total_faces: usize = meshes.iter().map(|m| m.faces.len()).sum();
    result.vertices.reserve(total_vertices);
    result.faces.reserve(total_faces);

    for mesh in meshes {
        let vertex_offset = result.vertices.len() as u32;

        result.vertices.extend_from_slice(&mesh.vertices);
        result
            .faces
            .extend(mesh.faces.iter().map(|face| face.map(|i| vertex_offset + i)));
    }

    result
}

/// Generate a simple weapon silhouette: a barrel (cylinder) plus a body (box)
pub fn generate_weapon() -> RawMesh {
    let barrel = generate_cylinder(WEAPON_BARREL_RADIUS, WEAPON_BARREL_LENGTH, RADIAL_SEGMENTS);
    let body = generate_box(WEAPON_BODY_EXTENTS);
    combine(&[&barrel, &body])
}

/// Generate a simple building block: one large box
pub fn generate_building() -> RawMesh {
    generate_box(BUILDING_EXTENTS)
}
