//! Built-in traits of the sandbox.

use super::TickCtx;
use crate::entity::Entity;
use crate::math::{Vec2, Vec3};
use crate::traits::{Behaviour, TraitRegistry};

/// Trait names understood by the frame loop.
pub mod names {
    pub const WSAD: &str = "wsad";
    pub const PICKUP: &str = "pickup";
    pub const CROSS_SLASH_HITBOX: &str = "cross_slash_hitbox";
    pub const IS_HITBOX: &str = "is_hitbox";
    pub const IS_TEXT: &str = "is_text";
    pub const IS_GRID_ALIGNED: &str = "is_grid_aligned";
    pub const IS_PUSHABLE: &str = "is_pushable";
    pub const NO_MODEL: &str = "no-model";
    pub const IS_BILLBOARD: &str = "is_billboard";
}

/// Moves with the movement keys and can be dragged around.
pub struct Wsad;

impl Behaviour<Entity, TickCtx> for Wsad {
    fn init(&self, entity: &mut Entity) {
        entity.flags.draggable = true;
    }

    fn update(&self, entity: &mut Entity, tick: &TickCtx) {
        if tick.movement == Vec2::ZERO {
            return;
        }
        let step = Vec3::new(tick.movement.x, 0.0, tick.movement.y) * tick.move_speed * tick.dt;
        entity.position = Some(entity.position_or_origin() + step);
    }
}

/// Slowly turns about the vertical axis.
pub struct Spin;

impl Behaviour<Entity, TickCtx> for Spin {
    fn init(&self, entity: &mut Entity) {
        entity.rotation = Some(entity.rotation_or_zero());
    }

    fn update(&self, entity: &mut Entity, tick: &TickCtx) {
        let mut rotation = entity.rotation_or_zero();
        rotation.y = (rotation.y + tick.spin_speed * tick.dt) % std::f32::consts::TAU;
        entity.rotation = Some(rotation);
    }
}

/// Register every built-in trait, in the order their ticks run.
pub fn register_builtin(registry: &mut TraitRegistry<Entity, TickCtx>) {
    registry.register_with(names::WSAD, Wsad);
    registry.register_with(names::PICKUP, Spin);
    registry.register_with(names::CROSS_SLASH_HITBOX, Spin);
    registry.register(names::IS_HITBOX);
    registry.register(names::IS_TEXT);
    registry.register(names::IS_GRID_ALIGNED);
    registry.register(names::IS_PUSHABLE);
    registry.register(names::IS_BILLBOARD);
    registry.register(names::NO_MODEL);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::things::ThingsList;

    fn tick(movement: Vec2) -> TickCtx {
        TickCtx {
            dt: 0.5,
            movement,
            move_speed: 2.0,
            spin_speed: 1.0,
        }
    }

    #[test]
    fn wsad_moves_on_the_ground_plane() {
        let mut registry = TraitRegistry::new();
        register_builtin(&mut registry);
        let mut e = Entity::new("player");
        e.position = Some(Vec3::new(0.0, 1.0, 0.0));
        registry.apply(&mut e, names::WSAD);
        assert!(e.flags.draggable);

        let mut things = ThingsList::with_capacity(2);
        let r = things.add(e);
        registry.tick_all(&mut things, &tick(Vec2::new(1.0, -1.0)));
        assert_eq!(things[r].position, Some(Vec3::new(1.0, 1.0, -1.0)));
    }

    #[test]
    fn pickups_spin() {
        let mut registry = TraitRegistry::new();
        register_builtin(&mut registry);
        let mut e = Entity::new("gem");
        registry.apply(&mut e, names::PICKUP);
        assert_eq!(e.rotation, Some(Vec3::ZERO));

        let mut things = ThingsList::with_capacity(2);
        let r = things.add(e);
        registry.tick_all(&mut things, &tick(Vec2::ZERO));
        registry.tick_all(&mut things, &tick(Vec2::ZERO));
        assert_eq!(things[r].rotation, Some(Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn builtin_names_register_once() {
        let mut registry = TraitRegistry::new();
        register_builtin(&mut registry);
        let count = registry.len();
        register_builtin(&mut registry);
        assert_eq!(registry.len(), count);
        assert_eq!(registry.names().next(), Some(names::WSAD));
    }
}
