//! Category -> display shape mapping.

use serde::{Deserialize, Serialize};

use crate::{Category, Entity};

/// Sphere tessellation used for every non-hub entity.
pub const SPHERE_SEGMENTS: u32 = 32;

/// Geometry a renderer should build for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    /// Axis-aligned cube with the given edge length
    Cube { edge: f64 },
    /// UV sphere
    Sphere { radius: f64, segments: u32 },
}

impl Shape {
    /// Hubs are drawn as cubes, everything else as spheres.
    pub fn for_category(category: &Category, size: f64) -> Self {
        match category {
            Category::Hub => Shape::Cube { edge: size },
            _ => Shape::Sphere {
                radius: size,
                segments: SPHERE_SEGMENTS,
            },
        }
    }

    pub fn for_entity(entity: &Entity) -> Self {
        Self::for_category(&entity.category, entity.size)
    }
}
