//! Picking and collision math
//!
//! Re-exports the glam types the rest of the crate speaks in, plus the two
//! shapes the frame loop needs: axis-aligned boxes and rays.

pub use glam::{Mat4, Vec2, Vec3};

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// The 1x1x1 cube centred on the origin, used for entities without
    /// model bounds.
    pub const UNIT: Aabb = Aabb {
        min: Vec3::splat(-0.5),
        max: Vec3::splat(0.5),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Scale about the origin, then move by `offset`.
    pub fn scaled_translated(&self, scale: f32, offset: Vec3) -> Self {
        Self {
            min: self.min * scale + offset,
            max: self.max * scale + offset,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Touching boxes count as overlapping.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

/// Half-line used for cursor picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to where it enters `bounds`.
    ///
    /// A ray starting inside the box hits at distance 0.
    pub fn intersect_aabb(&self, bounds: &Aabb) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            let (lo, hi) = (bounds.min[axis], bounds.max[axis]);

            if dir.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let (t0, t1) = {
                let a = (lo - origin) * inv;
                let b = (hi - origin) * inv;
                (a.min(b), a.max(b))
            };
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        if t_max < 0.0 {
            return None;
        }
        Some(t_min.max(0.0))
    }

    /// Where the ray crosses the horizontal plane at height `y`.
    pub fn intersect_plane_y(&self, y: f32) -> Option<Vec3> {
        if self.direction.y == 0.0 {
            return None;
        }
        let t = (y - self.origin.y) / self.direction.y;
        Some(self.point_at(t))
    }
}
