//! Prompt classification
//!
//! Maps a prompt and asset-type tag to exactly one [`ShapeKind`]. The policy is
//! a fixed, ordered keyword table so results are reproducible: the asset type
//! wins first, then the first prop keyword group that matches.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::mesh::RawMesh;
use crate::shapes::{
    RADIAL_SEGMENTS, SPHERE_SUBDIVISIONS, generate_box, generate_building, generate_cone,
    generate_cylinder, generate_icosphere, generate_weapon,
};

/// Shape constructor chosen for a request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Weapon,
    Building,
}

/// Prop keyword groups, checked in order; first match wins
const PROP_KEYWORDS: &[(&[&str], ShapeKind)] = &[
    (&["crate", "box"], ShapeKind::Box),
    (&["sphere", "ball"], ShapeKind::Sphere),
    (&["cylinder", "tube"], ShapeKind::Cylinder),
    (&["cone"], ShapeKind::Cone),
];

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Box,
        ShapeKind::Sphere,
        ShapeKind::Cylinder,
        ShapeKind::Cone,
        ShapeKind::Weapon,
        ShapeKind::Building,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Box => "box",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Cone => "cone",
            ShapeKind::Weapon => "weapon",
            ShapeKind::Building => "building",
        }
    }

    /// Construct the canonical mesh for this shape
    pub fn build(self) -> RawMesh {
        match self {
            ShapeKind::Box => generate_box([1.0, 1.0, 1.0]),
            ShapeKind::Sphere => generate_icosphere(1.0, SPHERE_SUBDIVISIONS),
            ShapeKind::Cylinder => generate_cylinder(0.5, 1.0, RADIAL_SEGMENTS),
            ShapeKind::Cone => generate_cone(0.5, 1.0, RADIAL_SEGMENTS),
            ShapeKind::Weapon => generate_weapon(),
            ShapeKind::Building => generate_building(),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick a shape for a prompt and asset type
///
/// `weapon` and `building` ignore the prompt. `prop` inspects the prompt
/// (case-insensitive substring match). Any other asset type falls back to a
/// box without looking at the prompt.
pub fn classify(prompt: &str, asset_type: &str) -> ShapeKind {
    let kind = match asset_type {
        "weapon" => ShapeKind::Weapon,
        "building" => ShapeKind::Building,
        "prop" => classify_prop(prompt),
        _ => ShapeKind::Box,
    };
    debug!("classified {:?} ({}) as {}", prompt, asset_type, kind);
    kind
}

fn classify_prop(prompt: &str) -> ShapeKind {
    let prompt = prompt.to_lowercase();
    PROP_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| prompt.contains(k)))
        .map(|&(_, kind)| kind)
        .unwrap_or(ShapeKind::Box)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_overrides_prompt() {
        assert_eq!(classify("a shiny ball", "weapon"), ShapeKind::Weapon);
        assert_eq!(classify("a cone-shaped roof", "building"), ShapeKind::Building);
    }

    #[test]
    fn test_prop_keywords() {
        let cases = [
            ("a wooden crate", ShapeKind::Box),
            ("cardboard box", ShapeKind::Box),
            ("glass sphere", ShapeKind::Sphere),
            ("a round ball", ShapeKind::Sphere),
            ("metal cylinder", ShapeKind::Cylinder),
            ("rubber tube", ShapeKind::Cylinder),
            ("traffic cone", ShapeKind::Cone),
            ("mystery object", ShapeKind::Box),
            ("", ShapeKind::Box),
        ];
        for (prompt, expected) in cases {
            assert_eq!(classify(prompt, "prop"), expected, "prompt {prompt:?}");
        }
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(classify("A Big BALL", "prop"), ShapeKind::Sphere);
        assert_eq!(classify("TRAFFIC CONE", "prop"), ShapeKind::Cone);
    }

    #[test]
    fn test_first_group_wins() {
        // box keywords are checked before sphere keywords
        assert_eq!(classify("a ball in a box", "prop"), ShapeKind::Box);
        // sphere before cylinder
        assert_eq!(classify("tube full of balls", "prop"), ShapeKind::Sphere);
        // cylinder before cone
        assert_eq!(classify("cone on a cylinder", "prop"), ShapeKind::Cylinder);
    }

    #[test]
    fn test_substring_match() {
        // "boxer" contains "box"
        assert_eq!(classify("boxer statue", "prop"), ShapeKind::Box);
    }

    #[test]
    fn test_unknown_asset_type_falls_back_to_box() {
        assert_eq!(classify("a round ball", "vehicle"), ShapeKind::Box);
        assert_eq!(classify("traffic cone", "Prop"), ShapeKind::Box);
    }

    #[test]
    fn test_classification_is_deterministic() {
        for asset_type in ["prop", "weapon", "building", "other"] {
            for prompt in ["crate", "ball", "tube", "cone", "tree"] {
                let first = classify(prompt, asset_type);
                for _ in 0..3 {
                    assert_eq!(classify(prompt, asset_type), first);
                }
            }
        }
    }

    #[test]
    fn test_every_shape_builds_a_closed_mesh() {
        for kind in ShapeKind::ALL {
            let mesh = kind.build();
            assert!(mesh.face_count() > 0, "{kind} has no faces");
        }
    }

    #[test]
    fn test_shape_counts() {
        assert_eq!(ShapeKind::Box.build().face_count(), 12);
        assert_eq!(ShapeKind::Sphere.build().face_count(), 320);
        assert_eq!(ShapeKind::Cylinder.build().vertex_count(), 66);
        assert_eq!(ShapeKind::Cone.build().vertex_count(), 34);
    }
}
