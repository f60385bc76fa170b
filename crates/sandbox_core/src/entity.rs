//! The entity payload stored in the game's [`ThingsList`](crate::things::ThingsList).
//!
//! Spatial fields are optional: `None` means "never set", which the frame
//! loop treats differently from zero (an entity with no velocity is at
//! rest, one with no lifetime never expires).

use crate::math::{Aabb, Mat4, Vec3};
use crate::model::ModelHandle;
use crate::render::RenderState;
use crate::things::ThingRef;
use crate::traits::{HasTraits, TraitSet};
use glam::{EulerRot, Quat};

/// Interaction switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityFlags {
    pub collidable: bool,
    pub highlightable: bool,
    pub draggable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Entity {
    pub debug_name: String,
    pub model: Option<ModelHandle>,
    pub position: Option<Vec3>,
    /// Euler angles (XYZ order), radians.
    pub rotation: Option<Vec3>,
    pub scale: Option<f32>,
    /// Position relative to the spawner, kept while the spawner lives.
    pub parent_offset: Option<Vec3>,
    pub velocity: Option<Vec3>,
    /// Speed imparted to pushable entities this one touches.
    pub push_distance: Option<f32>,
    /// Seconds left to live.
    pub life_time: Option<f32>,
    pub render: RenderState,
    pub flags: EntityFlags,
    /// Text shown for `is_text` entities.
    pub label: String,
    /// Entity that spawned this one. Weak: the spawner may be gone.
    pub spawner: ThingRef,
    pub traits: TraitSet,
}

impl Entity {
    pub fn new(debug_name: impl Into<String>) -> Self {
        Self {
            debug_name: debug_name.into(),
            ..Default::default()
        }
    }

    pub fn position_or_origin(&self) -> Vec3 {
        self.position.unwrap_or(Vec3::ZERO)
    }

    pub fn rotation_or_zero(&self) -> Vec3 {
        self.rotation.unwrap_or(Vec3::ZERO)
    }

    pub fn scale_or_one(&self) -> f32 {
        self.scale.unwrap_or(1.0)
    }

    /// Model name for log lines.
    pub fn model_name(&self) -> &str {
        self.model.as_ref().map_or("???", |m| m.name())
    }

    /// `local` bounds placed in the world by this entity's scale and position.
    pub fn world_bounds(&self, local: Aabb) -> Aabb {
        local.scaled_translated(self.scale_or_one(), self.position_or_origin())
    }

    /// Scale, then rotate, then translate. A `scale` of `Some(s)` with
    /// `s > 0` replaces the entity's own scale.
    pub fn transform(&self, scale: Option<f32>) -> Mat4 {
        let s = scale.filter(|s| *s > 0.0).unwrap_or_else(|| self.scale_or_one());
        let r = self.rotation_or_zero();
        Mat4::from_scale_rotation_translation(
            Vec3::splat(s),
            Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z),
            self.position_or_origin(),
        )
    }

    /// Whether one of the pair spawned the other.
    pub fn is_family(a: (ThingRef, &Entity), b: (ThingRef, &Entity)) -> bool {
        let spawned = |child: &Entity, parent: ThingRef| {
            !child.spawner.is_nil() && child.spawner == parent
        };
        spawned(a.1, b.0) || spawned(b.1, a.0)
    }
}

impl HasTraits for Entity {
    fn traits(&self) -> &TraitSet {
        &self.traits
    }

    fn traits_mut(&mut self) -> &mut TraitSet {
        &mut self.traits
    }
}
