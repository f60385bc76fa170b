// pairs.rs - Reactions to contacts that began this frame
//
// Handlers see the pair (a, b) from a's side; the same contact is also
// delivered as (b, a). Spawns and removals are deferred until both entities
// are released.
//
// Impacts are judged against the velocities entities had when the collide
// phase began, so velocity handed out by a push or an earlier impact in the
// same frame never turns its receiver into an impactor.

use super::{names, GameCtx};
use crate::entity::Entity;
use crate::math::Vec3;
use crate::things::ThingRef;
use std::collections::BTreeMap;

#[derive(Default)]
struct PairOutcome {
    messages: Vec<String>,
    labels: Vec<(String, ThingRef)>,
    remove_b: bool,
}

impl GameCtx {
    /// `moving` holds every entity's velocity from the start of the phase.
    pub(crate) fn handle_pair(
        &mut self,
        a: ThingRef,
        b: ThingRef,
        moving: &BTreeMap<ThingRef, Vec3>,
    ) {
        let traits = &self.traits;
        let Some((ea, eb)) = self.entities.get_pair_mut(a, b) else {
            return;
        };
        if Entity::is_family((a, ea), (b, eb)) {
            return;
        }

        let has = |e: &Entity, name: &str| traits.has(e, name);
        if has(ea, names::CROSS_SLASH_HITBOX) && has(eb, names::CROSS_SLASH_HITBOX) {
            return;
        }

        let mut outcome = PairOutcome::default();

        if let Some(push) = ea.push_distance {
            if has(eb, names::IS_PUSHABLE) {
                let mut dir = eb.position_or_origin() - ea.position_or_origin();
                dir.y = 0.0;
                let len = dir.length();
                if len > 0.001 {
                    eb.velocity = Some(dir / len * push);
                }
            }
        }

        if has(ea, names::WSAD) && has(eb, names::PICKUP) {
            let line = format!("Picked up {}", eb.model_name());
            outcome.labels.push((line.clone(), ThingRef::NIL));
            outcome.messages.push(line);
            outcome.remove_b = true;
        }

        if has(ea, names::CROSS_SLASH_HITBOX) {
            let line = format!("cross slash hit {}", eb.model_name());
            outcome.labels.push((line.clone(), b));
            outcome.messages.push(line);
        }

        // Running into a pusher is not an impact.
        if let (Some(&velocity), None, None) =
            (moving.get(&a), moving.get(&b), eb.push_distance)
        {
            let speed = velocity.length();
            outcome
                .labels
                .push((format!("hit {} ({:.1})", eb.model_name(), speed), a));
            if has(eb, names::IS_PUSHABLE) {
                eb.velocity = Some(velocity);
            }
            ea.velocity = None;
        }

        for message in outcome.messages {
            self.print(message);
        }
        for (text, spawner) in outcome.labels {
            self.spawn_label(text, spawner);
        }
        if outcome.remove_b {
            self.despawn(b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tests::{apply, catalog, labels, spawn_at, DT};
    use crate::game::{FrameInput, SpawnArgs};

    #[test]
    fn walking_into_a_pickup_collects_it() {
        let models = catalog();
        let mut ctx = GameCtx::default();
        let player = spawn_at(&mut ctx, &models, "cube", 0.0, 0.0);
        apply(&mut ctx, player, names::WSAD);
        let coin = spawn_at(&mut ctx, &models, "coin", 0.5, 0.0);
        apply(&mut ctx, coin, names::PICKUP);

        ctx.update(&FrameInput::default(), DT, &models);

        assert!(!ctx.entities.contains(coin));
        assert!(ctx.entities.contains(player));
        assert_eq!(ctx.drain_messages(), vec!["Picked up coin".to_string()]);
        assert_eq!(labels(&ctx), vec!["Picked up coin".to_string()]);
    }

    #[test]
    fn contacts_are_handled_only_when_they_begin() {
        let models = catalog();
        let mut ctx = GameCtx::default();
        let hitbox = spawn_at(&mut ctx, &models, "cube", 0.0, 0.0);
        apply(&mut ctx, hitbox, names::CROSS_SLASH_HITBOX);
        let target = spawn_at(&mut ctx, &models, "coin", 0.5, 0.0);

        ctx.update(&FrameInput::default(), DT, &models);
        assert_eq!(ctx.drain_messages(), vec!["cross slash hit coin".to_string()]);
        let pairs = &ctx.frames().current().collision_pairs;
        assert!(pairs.contains(&(hitbox, target)) && pairs.contains(&(target, hitbox)));

        ctx.update(&FrameInput::default(), DT, &models);
        assert!(ctx.drain_messages().is_empty());
        assert_eq!(labels(&ctx).len(), 1);
        assert!(ctx.frames().previous().collision_pairs.contains(&(hitbox, target)));
    }

    #[test]
    fn pushers_launch_pushable_entities() {
        let models = catalog();
        let mut ctx = GameCtx::default();
        let pusher = ctx.spawn(SpawnArgs::new("cube").push_distance(2.0), &models);
        let crate_ = spawn_at(&mut ctx, &models, "cube", 0.8, 0.0);
        apply(&mut ctx, crate_, names::IS_PUSHABLE);

        ctx.update(&FrameInput::default(), DT, &models);

        let velocity = ctx.entities[crate_].velocity.unwrap();
        assert!((velocity - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        assert!(ctx.entities[pusher].velocity.is_none());
        assert!(labels(&ctx).is_empty());
    }

    #[test]
    fn moving_entities_hand_their_velocity_to_pushables() {
        let models = catalog();
        let mut ctx = GameCtx::default();
        let ball = spawn_at(&mut ctx, &models, "cube", 0.0, 0.0);
        ctx.entities[ball].velocity = Some(Vec3::new(3.0, 0.0, 0.0));
        let block = spawn_at(&mut ctx, &models, "cube", 0.9, 0.0);
        apply(&mut ctx, block, names::IS_PUSHABLE);

        ctx.update(&FrameInput::default(), DT, &models);

        let expected = 3.0 * (-0.3f32).exp();
        assert!(ctx.entities[ball].velocity.is_none());
        let transferred = ctx.entities[block].velocity.unwrap();
        assert!((transferred.x - expected).abs() < 1e-4);
        assert_eq!(labels(&ctx), vec![format!("hit cube ({expected:.1})")]);
    }

    /// Spawn a pusher, a pushable crate and a wall, in the given order, and
    /// return the crate's velocity after one frame.
    fn pushed_crate_velocity(pusher_first: bool) -> Option<Vec3> {
        let models = catalog();
        let mut ctx = GameCtx::default();
        let spawn_pusher = |ctx: &mut GameCtx| {
            ctx.spawn(SpawnArgs::new("cube").push_distance(2.0), &models)
        };
        let spawn_wall = |ctx: &mut GameCtx| spawn_at(ctx, &models, "cube", 1.8, 0.0);

        if pusher_first {
            spawn_pusher(&mut ctx);
        } else {
            spawn_wall(&mut ctx);
        }
        let crate_ = spawn_at(&mut ctx, &models, "cube", 0.9, 0.0);
        apply(&mut ctx, crate_, names::IS_PUSHABLE);
        if pusher_first {
            spawn_wall(&mut ctx);
        } else {
            spawn_pusher(&mut ctx);
        }

        ctx.update(&FrameInput::default(), DT, &models);
        assert!(labels(&ctx).is_empty());
        ctx.entities[crate_].velocity
    }

    #[test]
    fn pushed_entities_are_not_impactors_in_the_same_frame() {
        let pusher_first = pushed_crate_velocity(true);
        let wall_first = pushed_crate_velocity(false);
        assert_eq!(pusher_first, wall_first);
        let velocity = pusher_first.unwrap();
        assert!((velocity - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }
}
