//! Revolved primitive shapes: cylinder, cone

use glam::Vec3;
use std::f32::consts::PI;
use tracing::warn;

use crate::mesh::RawMesh;

fn clamp_positive(name: &str, param: &str, value: f32) -> f32 {
    if value <= 0.0 {
        warn!("{}: {} must be > 0.0, clamping to 0.001", name, param);
        0.001
    } else {
        value
    }
}

/// Ring of `segments` vertices at height `y`, counter-clockwise seen from +Y
fn add_ring(mesh: &mut RawMesh, radius: f32, y: f32, segments: u32) -> Vec<u32> {
    (0..segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * 2.0 * PI;
            mesh.add_vertex(Vec3::new(radius * theta.cos(), y, radius * theta.sin()))
        })
        .collect()
}

/// Fan of triangles closing a ring around a center vertex
///
/// `facing_up` selects +Y winding (top cap) or -Y winding (bottom cap).
fn add_cap(mesh: &mut RawMesh, center: u32, ring: &[u32], facing_up: bool) {
    let segments = ring.len();
    for i in 0..segments {
        let i0 = ring[i];
        let i1 = ring[(i + 1) % segments];
        if facing_up {
            mesh.add_triangle(center, i1, i0);
        } else {
            mesh.add_triangle(center, i0, i1);
        }
    }
}

/// Generate a capped cylinder along the Y axis, centered at the origin
///
/// # Arguments
/// * `radius` - Cylinder radius (> 0.0)
/// * `height` - Cylinder height (> 0.0)
/// * `segments` - Number of radial divisions (min 3, max 256)
///
/// # Returns
/// `2 * segments + 2` vertices, `4 * segments` triangles
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> RawMesh {
    let radius = clamp_positive("generate_cylinder", "radius", radius);
    let height = clamp_positive("generate_cylinder", "height", height);
    let segments = segments.clamp(3, 256);
    let half_height = height * 0.5;

    let mut mesh = RawMesh::new();
    let bottom = add_ring(&mut mesh, radius, -half_height, segments);
    let top = add_ring(&mut mesh, radius, half_height, segments);

    // Body: two triangles per quad (CCW winding for outward normals)
    let n = segments as usize;
    for i in 0..n {
        let next = (i + 1) % n;
        mesh.add_triangle(bottom[i], top[i], top[next]);
        mesh.add_triangle(bottom[i], top[next], bottom[next]);
    }

    let bottom_center = mesh.add_vertex(Vec3::new(0.0, -half_height, 0.0));
    add_cap(&mut mesh, bottom_center, &bottom, false);

    let top_center = mesh.add_vertex(Vec3::new(0.0, half_height, 0.0));
    add_cap(&mut mesh, top_center, &top, true);

    mesh
}

/// Generate a cone along the Y axis with its apex at +Y
///
/// # Arguments
/// * `radius` - Base radius (> 0.0)
/// * `height` - Base to apex distance (> 0.0)
/// * `segments` - Number of radial divisions (min 3, max 256)
///
/// # Returns
/// `segments + 2` vertices, `2 * segments` triangles
pub fn generate_cone(radius: f32, height: f32, segments: u32) -> RawMesh {
    let radius = clamp_positive("generate_cone", "radius", radius);
    let height = clamp_positive("generate_cone", "height", height);
    let segments = segments.clamp(3, 256);
    let half_height = height * 0.5;

    let mut mesh = RawMesh::new();
    let base = add_ring(&mut mesh, radius, -half_height, segments);
    let apex = mesh.add_vertex(Vec3::new(0.0, half_height, 0.0));

    let n = segments as usize;
    for i in 0..n {
        mesh.add_triangle(base[i], apex, base[(i + 1) % n]);
    }

    let base_center = mesh.add_vertex(Vec3::new(0.0, -half_height, 0.0));
    add_cap(&mut mesh, base_center, &base, false);

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_volume(mesh: &RawMesh) -> f32 {
        mesh.faces
            .iter()
            .map(|f| {
                let [a, b, c] = f.map(|i| Vec3::from_array(mesh.vertices[i as usize]));
                a.dot(b.cross(c)) / 6.0
            })
            .sum()
    }

    #[test]
    fn test_cylinder_counts() {
        let mesh = generate_cylinder(0.5, 1.0, 32);
        assert_eq!(mesh.vertex_count(), 66);
        assert_eq!(mesh.face_count(), 128);
    }

    #[test]
    fn test_cylinder_volume_approaches_analytic() {
        let mesh = generate_cylinder(0.5, 1.0, 128);
        let analytic = PI * 0.25;
        let volume = signed_volume(&mesh);
        assert!(volume > 0.0, "winding should be outward");
        assert!((volume - analytic).abs() / analytic < 0.01);
    }

    #[test]
    fn test_cylinder_clamps_segments() {
        let mesh = generate_cylinder(1.0, 1.0, 1);
        assert_eq!(mesh.face_count(), 12);
    }

    #[test]
    fn test_cone_counts() {
        let mesh = generate_cone(0.5, 1.0, 32);
        assert_eq!(mesh.vertex_count(), 34);
        assert_eq!(mesh.face_count(), 64);
    }

    #[test]
    fn test_cone_winding_is_outward() {
        let mesh = generate_cone(0.5, 1.0, 32);
        assert!(signed_volume(&mesh) > 0.0);
    }

    #[test]
    fn test_cone_apex_on_axis() {
        let mesh = generate_cone(0.5, 2.0, 16);
        let top = mesh
            .vertices
            .iter()
            .fold(f32::MIN, |acc, v| acc.max(v[1]));
        assert_eq!(top, 1.0);
    }
}
