//! Mesh assembly and validation
//!
//! Shape constructors (and any future learned synthesizer) produce a
//! [`RawMesh`]: plain vertex and face arrays with no guarantees. [`Mesh`] is the
//! validated form handed to the exporter. It always has at least one face and
//! every face index is in range.

use glam::Vec3;

use crate::error::ValidationError;

/// Unvalidated triangle mesh
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMesh {
    /// Vertex positions as [x, y, z]
    pub vertices: Vec<[f32; 3]>,
    /// Triangles as vertex index triples
    pub faces: Vec<[u32; 3]>,
}

impl RawMesh {
    /// Create empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, position: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position.to_array());
        index
    }

    /// Add a triangle using three vertex indices
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.faces.push([i0, i1, i2]);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// Validated triangle mesh
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    vertices: Vec<[f32; 3]>,
    faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Assemble a mesh from raw arrays
    ///
    /// Fails if `faces` is empty or any index points past the end of `vertices`.
    pub fn new(vertices: Vec<[f32; 3]>, faces: Vec<[u32; 3]>) -> Result<Self, ValidationError> {
        if faces.is_empty() {
            return Err(ValidationError::NoFaces);
        }

        let vertex_count = vertices.len();
        for (face, triangle) in faces.iter().enumerate() {
            if let Some(&index) = triangle.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(ValidationError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(Self { vertices, faces })
    }

    /// Assemble a mesh from builder output
    pub fn from_raw(raw: RawMesh) -> Result<Self, ValidationError> {
        Self::new(raw.vertices, raw.faces)
    }

    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles (reported as `poly_count` in asset metadata)
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Axis-aligned bounds as (min, max) over every vertex
    ///
    /// Unreferenced vertices count too: the GLB position accessor stores all of
    /// them and its min/max must cover each element.
    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for &position in &self.vertices {
            let p = Vec3::from_array(position);
            min = min.min(p);
            max = max.max(p);
        }
        (min.to_array(), max.to_array())
    }

    /// Face normal of triangle `face` (zero for degenerate triangles)
    pub fn face_normal(&self, face: usize) -> [f32; 3] {
        let [a, b, c] = self.triangle(face);
        (b - a).cross(c - a).normalize_or_zero().to_array()
    }

    /// Corner positions of triangle `face`
    pub fn triangle(&self, face: usize) -> [Vec3; 3] {
        self.faces[face].map(|i| Vec3::from_array(self.vertices[i as usize]))
    }
}
