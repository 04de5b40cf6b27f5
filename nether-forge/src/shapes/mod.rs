//! Procedural shape library
//!
//! Pure constructors for the primitives the prompt classifier can pick.
//! Vertices are shared between adjacent triangles, so counts match what a
//! reader sees after loading the exported file.

mod combine;
mod complex;
mod simple;

pub use combine::{combine, generate_building, generate_weapon};
pub use complex::{generate_cone, generate_cylinder};
pub use simple::{generate_box, generate_icosphere};

/// Radial segments used for cylinders and cones
pub const RADIAL_SEGMENTS: u32 = 32;

/// Icosphere subdivision level used for prop spheres
pub const SPHERE_SUBDIVISIONS: u32 = 2;
