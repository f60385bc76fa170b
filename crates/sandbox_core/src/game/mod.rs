//! The game context: entity storage, trait registry and the frame loop.
//!
//! [`GameCtx::update`] runs one frame in a fixed phase order:
//!
//! 1. expire entities whose lifetime ran out
//! 2. pick against the cursor ray, update hover, selection and drags
//! 3. move entities (drag, follow spawner, integrate velocity)
//! 4. tick every trait
//! 5. find overlapping pairs and handle the ones that began this frame
//! 6. spawn slash hitboxes when a drag is released over a `wsad` entity
//! 7. flag the hovered and selected entities for rendering
//!
//! Rendering is a separate pass ([`GameCtx::render`]) reading the result.

mod behaviours;
mod commands;
mod draw;
mod frame;
mod pairs;

pub use behaviours::{names, register_builtin, Spin, Wsad};
pub use commands::CommandError;
pub use frame::{FrameBuffer, FrameCtx, FrameInput, Pair, RayHit};

use crate::config::GameConfig;
use crate::entity::Entity;
use crate::math::{Aabb, Mat4, Vec2, Vec3};
use crate::model::ModelLibrary;
use crate::things::{ThingRef, ThingsList};
use crate::time::FrameClock;
use crate::traits::TraitRegistry;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Context handed to trait updates.
#[derive(Debug, Clone, Copy)]
pub struct TickCtx {
    pub dt: f32,
    pub movement: Vec2,
    pub move_speed: f32,
    pub spin_speed: f32,
}

/// Arguments for [`GameCtx::spawn`].
#[derive(Debug, Clone)]
pub struct SpawnArgs {
    pub model_name: String,
    pub position: Vec3,
    pub scale: f32,
    /// `None` lives forever.
    pub life_time: Option<f32>,
    pub spawner: ThingRef,
    pub debug_name: String,
    pub push_distance: Option<f32>,
}

impl SpawnArgs {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            position: Vec3::ZERO,
            scale: 1.0,
            life_time: None,
            spawner: ThingRef::NIL,
            debug_name: "default_name".to_string(),
            push_distance: None,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn life_time(mut self, seconds: f32) -> Self {
        self.life_time = Some(seconds);
        self
    }

    pub fn spawner(mut self, spawner: ThingRef) -> Self {
        self.spawner = spawner;
        self
    }

    pub fn debug_name(mut self, name: impl Into<String>) -> Self {
        self.debug_name = name.into();
        self
    }

    pub fn push_distance(mut self, distance: f32) -> Self {
        self.push_distance = Some(distance);
        self
    }
}

/// Owns every entity and drives them frame by frame.
///
/// Other systems hold [`ThingRef`]s into `entities`, never references,
/// across frames.
pub struct GameCtx {
    pub entities: ThingsList<Entity>,
    pub traits: TraitRegistry<Entity, TickCtx>,
    pub selected: ThingRef,
    config: GameConfig,
    frames: FrameBuffer,
    clock: FrameClock,
    messages: Vec<String>,
}

impl GameCtx {
    /// Empty world with the built-in traits registered.
    pub fn new(config: GameConfig) -> Self {
        let mut traits = TraitRegistry::new();
        register_builtin(&mut traits);
        Self {
            entities: ThingsList::with_capacity(config.capacity),
            traits,
            selected: ThingRef::NIL,
            config,
            frames: FrameBuffer::default(),
            clock: FrameClock::new(),
            messages: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn frames(&self) -> &FrameBuffer {
        &self.frames
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Nearest highlightable entity under the cursor, or Nil.
    pub fn hovered(&self) -> ThingRef {
        self.frames
            .current()
            .hovered
            .first()
            .copied()
            .unwrap_or(ThingRef::NIL)
    }

    /// Console-bound lines produced since the last drain.
    pub fn drain_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    pub(crate) fn print(&mut self, message: String) {
        info!("{message}");
        self.messages.push(message);
    }

    /// Add an entity built from `args`.
    ///
    /// Returns Nil when the model is unknown or the entity list is full.
    /// The model name `no-model` spawns a model-less entity carrying the
    /// `no-model` trait.
    pub fn spawn(&mut self, args: SpawnArgs, models: &dyn ModelLibrary) -> ThingRef {
        let model = if args.model_name == names::NO_MODEL {
            None
        } else {
            match models.instance(&args.model_name) {
                Some(model) => Some(model),
                None => {
                    warn!(model = %args.model_name, "spawn skipped, model not loaded");
                    return ThingRef::NIL;
                }
            }
        };

        let mut entity = Entity::new(args.debug_name);
        entity.model = model;
        entity.position = Some(args.position);
        entity.scale = Some(args.scale);
        entity.life_time = args.life_time;
        entity.push_distance = args.push_distance;
        entity.spawner = args.spawner;
        if let Some(parent) = self.entities.get(args.spawner) {
            entity.parent_offset = Some(args.position - parent.position_or_origin());
        }
        entity.flags.highlightable = true;
        entity.flags.collidable = true;
        if entity.model.is_none() {
            self.traits.apply(&mut entity, names::NO_MODEL);
        }

        let thing = self.entities.add(entity);
        if thing.is_nil() {
            warn!(
                model = %args.model_name,
                capacity = self.entities.capacity(),
                "spawn failed, entity list full"
            );
        } else {
            debug!(%thing, model = %args.model_name, "spawned");
        }
        thing
    }

    /// Floating text that fades out, following `spawner` if it is alive.
    pub fn spawn_label(&mut self, text: impl Into<String>, spawner: ThingRef) -> ThingRef {
        let mut entity = Entity::new("log_text");
        entity.label = text.into();
        entity.life_time = Some(self.config.label_fade_secs);
        entity.spawner = spawner;
        entity.parent_offset = Some(self.config.label_offset);
        if let Some(parent) = self.entities.get(spawner) {
            entity.position = Some(parent.position_or_origin() + self.config.label_offset);
        }
        self.traits.apply(&mut entity, names::IS_TEXT);
        self.entities.add(entity)
    }

    /// Remove an entity, running teardown for each of its traits.
    pub fn despawn(&mut self, thing: ThingRef) -> bool {
        let Some(entity) = self.entities.get_mut(thing) else {
            return false;
        };
        self.traits.remove_all(entity);
        self.entities.remove(thing);
        if self.selected == thing {
            self.selected = ThingRef::NIL;
        }
        debug!(%thing, "despawned");
        true
    }

    /// Remove every entity and clear the selection.
    pub fn clear_entities(&mut self) {
        for thing in self.entities.refs() {
            self.despawn(thing);
        }
        self.selected = ThingRef::NIL;
    }

    /// Move an entity, snapping grid-aligned ones to whole X/Z units and
    /// refreshing the offset to its spawner.
    pub fn update_position(&mut self, thing: ThingRef, mut position: Vec3) -> bool {
        let Some(entity) = self.entities.get(thing) else {
            return false;
        };
        if self.traits.has(entity, names::IS_GRID_ALIGNED) {
            position.x = position.x.round();
            position.z = position.z.round();
        }
        let parent_position = self
            .entities
            .get(entity.spawner)
            .map(Entity::position_or_origin);

        let Some(entity) = self.entities.get_mut(thing) else {
            return false;
        };
        if let Some(parent_position) = parent_position {
            entity.parent_offset = Some(position - parent_position);
        }
        entity.position = Some(position);
        true
    }

    /// World-space bounds, falling back to a unit cube without model bounds.
    pub fn world_bounds(entity: &Entity, models: &dyn ModelLibrary) -> Aabb {
        let local = entity
            .model
            .as_ref()
            .and_then(|model| models.local_bounds(model))
            .unwrap_or(Aabb::UNIT);
        entity.world_bounds(local)
    }

    /// Model matrix for `entity`, optionally overriding its scale.
    pub fn entity_transform(entity: &Entity, scale: Option<f32>) -> Mat4 {
        entity.transform(scale)
    }

    /// Run one frame. `dt` is in seconds.
    pub fn update(&mut self, input: &FrameInput, dt: f32, models: &dyn ModelLibrary) {
        self.clock.advance(dt);
        let dt = self.clock.delta();
        let last = self.frames.begin();
        let mut frame = FrameCtx::new(input);

        self.expire(dt);
        self.pick(input, &last, &mut frame, models);
        self.move_entities(&frame, dt);

        let tick = TickCtx {
            dt,
            movement: input.movement,
            move_speed: self.config.move_speed,
            spin_speed: self.config.spin_speed,
        };
        self.traits.tick_all(&mut self.entities, &tick);

        self.collide(&last, &mut frame, models);
        self.release_slash(input, &last, &frame, models);
        self.mark_focus(frame.hovered.first().copied().unwrap_or(ThingRef::NIL));

        self.frames.finish(last, frame);
    }

    /// Copy hover and selection into each entity's render state.
    fn mark_focus(&mut self, hovered: ThingRef) {
        let selected = self.selected;
        for (thing, entity) in self.entities.iter_mut() {
            entity.render.highlighted = thing == hovered;
            entity.render.selected = thing == selected;
        }
    }

    fn expire(&mut self, dt: f32) {
        let mut expired = Vec::new();
        for (thing, entity) in self.entities.iter_mut() {
            if let Some(life) = entity.life_time.as_mut() {
                *life -= dt;
                if *life <= 0.0 {
                    expired.push(thing);
                }
            }
        }
        for thing in expired {
            self.despawn(thing);
        }
    }

    fn pick(
        &mut self,
        input: &FrameInput,
        last: &FrameCtx,
        frame: &mut FrameCtx,
        models: &dyn ModelLibrary,
    ) {
        if let Some(ray) = input.mouse_ray {
            for (thing, entity) in self.entities.iter() {
                if !entity.render.visible || entity.model.is_none() {
                    continue;
                }
                if let Some(distance) = ray.intersect_aabb(&Self::world_bounds(entity, models)) {
                    frame.under_mouse.push(RayHit { thing, distance });
                }
            }
            frame
                .under_mouse
                .sort_by(|a, b| a.distance.total_cmp(&b.distance));
        }

        if input.ui_wants_mouse {
            return;
        }

        if let Some(hit) = frame.under_mouse.iter().find(|hit| {
            self.entities
                .get(hit.thing)
                .is_some_and(|e| e.flags.highlightable)
        }) {
            frame.hovered.push(hit.thing);
        }
        if input.left_pressed {
            if let Some(&hovered) = frame.hovered.first() {
                self.selected = hovered;
            }
        }

        if input.left_down {
            for &thing in &last.dragging {
                if self.entities.contains(thing) {
                    frame.dragging.insert(thing);
                }
            }
            for hit in &frame.under_mouse {
                if self
                    .entities
                    .get(hit.thing)
                    .is_some_and(|e| e.flags.draggable)
                {
                    frame.dragging.insert(hit.thing);
                }
            }
        }
    }

    fn move_entities(&mut self, frame: &FrameCtx, dt: f32) {
        let friction = self.config.friction;
        let rest_speed = self.config.rest_speed;

        for thing in self.entities.refs() {
            if frame.dragging.contains(&thing) {
                let height = self.entities.get(thing).map(Entity::position_or_origin);
                if let (Some(ray), Some(current)) = (frame.mouse_ray, height) {
                    if let Some(point) = ray.intersect_plane_y(current.y) {
                        self.update_position(thing, Vec3::new(point.x, current.y, point.z));
                    }
                }
            } else {
                let spawner = self.entities.get(thing).map_or(ThingRef::NIL, |e| e.spawner);
                let parent = self
                    .entities
                    .get(spawner)
                    .map(|p| (p.position_or_origin(), p.rotation));
                if let (Some((parent_position, parent_rotation)), Some(entity)) =
                    (parent, self.entities.get_mut(thing))
                {
                    entity.position =
                        Some(parent_position + entity.parent_offset.unwrap_or(Vec3::ZERO));
                    entity.rotation = parent_rotation;
                }
            }

            let Some(entity) = self.entities.get_mut(thing) else {
                continue;
            };
            if let Some(velocity) = entity.velocity {
                entity.position = Some(entity.position_or_origin() + velocity * dt);
                let decayed = velocity * (-friction * dt).exp();
                entity.velocity = (decayed.length() >= rest_speed).then_some(decayed);
            }
        }
    }

    fn collide(&mut self, last: &FrameCtx, frame: &mut FrameCtx, models: &dyn ModelLibrary) {
        let collidables: Vec<(ThingRef, Aabb)> = self
            .entities
            .iter()
            .filter(|(_, e)| e.flags.collidable)
            .map(|(thing, e)| (thing, Self::world_bounds(e, models)))
            .collect();

        for (i, (a, bounds_a)) in collidables.iter().enumerate() {
            for (b, bounds_b) in &collidables[i + 1..] {
                if bounds_a.overlaps(bounds_b) {
                    frame.collision_pairs.insert((*a, *b));
                    frame.collision_pairs.insert((*b, *a));
                }
            }
        }

        let moving: BTreeMap<ThingRef, Vec3> = self
            .entities
            .iter()
            .filter_map(|(thing, e)| e.velocity.map(|v| (thing, v)))
            .collect();
        for &(a, b) in &frame.collision_pairs {
            if last.collision_pairs.contains(&(a, b)) {
                continue;
            }
            self.handle_pair(a, b, &moving);
        }
    }

    fn release_slash(
        &mut self,
        input: &FrameInput,
        last: &FrameCtx,
        frame: &FrameCtx,
        models: &dyn ModelLibrary,
    ) {
        if input.ui_wants_mouse || !input.left_released || last.dragging.is_empty() {
            return;
        }

        let Some((target, position, model_name)) = frame.under_mouse.iter().find_map(|hit| {
            let entity = self.entities.get(hit.thing)?;
            self.traits.has(entity, names::WSAD).then(|| {
                (
                    hit.thing,
                    entity.position_or_origin(),
                    entity
                        .model
                        .as_ref()
                        .map_or_else(|| names::NO_MODEL.to_string(), |m| m.name().to_string()),
                )
            })
        }) else {
            return;
        };

        info!(model = %model_name, "cross slash");
        self.spawn_label(
            format!(
                "cross slash at ({:.1}, {:.1}, {:.1})",
                position.x, position.y, position.z
            ),
            target,
        );

        const SLASHES: [(f32, f32, &str); 5] = [
            (0.0, 1.0, "north slash hitbox"),
            (0.0, -1.0, "south slash hitbox"),
            (1.0, 0.0, "east slash hitbox"),
            (-1.0, 0.0, "west slash hitbox"),
            (-2.0, 0.0, "west west slash hitbox"),
        ];
        for (dx, dz, name) in SLASHES {
            let args = SpawnArgs::new(model_name.clone())
                .at(position + Vec3::new(dx, 0.0, dz))
                .life_time(1.0)
                .spawner(target)
                .debug_name(name)
                .push_distance(1.0);
            let hitbox = self.spawn(args, models);
            if let Some(entity) = self.entities.get_mut(hitbox) {
                self.traits.apply(entity, names::CROSS_SLASH_HITBOX);
                self.traits.apply(entity, names::IS_HITBOX);
            }
        }
    }
}

impl Default for GameCtx {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
