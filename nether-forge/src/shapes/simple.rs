//! Simple primitive shapes: box, icosphere

use glam::Vec3;
use hashbrown::HashMap;
use tracing::warn;

use crate::mesh::RawMesh;

/// Maximum icosphere subdivision level (81,920 triangles)
const MAX_SUBDIVISIONS: u32 = 6;

/// Unit box corners: bottom ring (-Z) then top ring (+Z), counter-clockwise
const BOX_CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Two CCW triangles per side, outward facing
const BOX_FACES: [[u32; 3]; 12] = [
    // -Z
    [0, 2, 1],
    [0, 3, 2],
    // +Z
    [4, 5, 6],
    [4, 6, 7],
    // -Y
    [0, 1, 5],
    [0, 5, 4],
    // +Y
    [3, 7, 6],
    [3, 6, 2],
    // -X
    [0, 4, 7],
    [0, 7, 3],
    // +X
    [1, 2, 6],
    [1, 6, 5],
];

/// Generate an axis-aligned box centered at the origin
///
/// # Arguments
/// * `extents` - Full size along X, Y and Z (each > 0.0)
///
/// # Returns
/// 8 vertices, 12 triangles
pub fn generate_box(extents: [f32; 3]) -> RawMesh {
    let extents = extents.map(|e| {
        if e <= 0.0 {
            warn!("generate_box: extents must be > 0.0, clamping to 0.001");
            0.001
        } else {
            e
        }
    });
    let half = Vec3::from_array(extents) * 0.5;

    let mut mesh = RawMesh::new();
    for corner in BOX_CORNERS {
        mesh.add_vertex(Vec3::from_array(corner) * half);
    }
    for [i0, i1, i2] in BOX_FACES {
        mesh.add_triangle(i0, i1, i2);
    }
    mesh
}

/// Generate an icosphere by subdividing an icosahedron
///
/// Each subdivision splits every triangle into four. Midpoints are cached per
/// edge so neighbouring triangles share them.
///
/// # Arguments
/// * `radius` - Sphere radius (> 0.0)
/// * `subdivisions` - Subdivision passes (max 6)
///
/// # Returns
/// `10 * 4^n + 2` vertices, `20 * 4^n` triangles
pub fn generate_icosphere(radius: f32, subdivisions: u32) -> RawMesh {
    let radius = if radius <= 0.0 {
        warn!("generate_icosphere: radius must be > 0.0, clamping to 0.001");
        0.001
    } else {
        radius
    };

    let subdivisions = if subdivisions > MAX_SUBDIVISIONS {
        warn!(
            "generate_icosphere: subdivisions {} exceeds {}, clamping",
            subdivisions, MAX_SUBDIVISIONS
        );
        MAX_SUBDIVISIONS
    } else {
        subdivisions
    };

    let t = (1.0 + 5.0_f32.sqrt()) * 0.5;
    let mut points: Vec<Vec3> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .into_iter()
    .map(|p| Vec3::from_array(p).normalize())
    .collect();

    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, points: &mut Vec<Vec3>| -> u32 {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let mid = (points[a as usize] + points[b as usize]).normalize();
                points.push(mid);
                (points.len() - 1) as u32
            })
        };

        let mut next = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut points);
            let bc = midpoint(b, c, &mut points);
            let ca = midpoint(c, a, &mut points);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        faces = next;
    }

    let mut mesh = RawMesh::new();
    for p in points {
        mesh.add_vertex(p * radius);
    }
    for [i0, i1, i2] in faces {
        mesh.add_triangle(i0, i1, i2);
    }
    mesh
}
