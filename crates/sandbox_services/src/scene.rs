//! Scene descriptions
//!
//! A scene lists the models it needs, the entities to spawn (in order) and
//! optionally an input script to play back against them.

use crate::input::{InputState, InputStep};
use sandbox_core::game::{names, CommandError, GameCtx, SpawnArgs};
use sandbox_core::math::{Aabb, Vec3};
use sandbox_core::model::ModelCatalog;
use sandbox_core::things::ThingRef;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("entity {index} names parent {parent}, which is not an earlier entity")]
    BadParent { index: usize, parent: usize },

    #[error("entity {index} could not be spawned")]
    Spawn {
        index: usize,
        #[source]
        source: CommandError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDesc {
    pub name: String,
    pub min: Vec3,
    pub max: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDesc {
    #[serde(default)]
    pub name: Option<String>,
    pub model: String,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: f32,
    #[serde(default)]
    pub life_time: Option<f32>,
    #[serde(default)]
    pub push_distance: Option<f32>,
    #[serde(default)]
    pub traits: Vec<String>,
    /// Index of an earlier entity in the same scene.
    #[serde(default)]
    pub parent: Option<usize>,
}

fn unit_scale() -> f32 {
    1.0
}

impl EntityDesc {
    pub fn new(model: &str, position: Vec3) -> Self {
        Self {
            name: None,
            model: model.to_string(),
            position,
            scale: 1.0,
            life_time: None,
            push_distance: None,
            traits: Vec::new(),
            parent: None,
        }
    }

    fn with_traits(mut self, traits: &[&str]) -> Self {
        self.traits = traits.iter().map(|t| t.to_string()).collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub models: Vec<ModelDesc>,
    #[serde(default)]
    pub entities: Vec<EntityDesc>,
    #[serde(default)]
    pub input: Vec<InputStep>,
}

impl Scene {
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// A player that walks through three coins, then cross slashes next to
    /// a crate.
    pub fn demo() -> Self {
        let cube = ModelDesc {
            name: "cube".into(),
            min: Vec3::splat(-0.5),
            max: Vec3::splat(0.5),
        };
        let coin = ModelDesc {
            name: "coin".into(),
            min: Vec3::splat(-0.25),
            max: Vec3::splat(0.25),
        };

        let mut hat = EntityDesc::new("coin", Vec3::new(0.0, 1.0, 0.0));
        hat.name = Some("hat".into());
        hat.scale = 0.5;
        hat.parent = Some(0);

        let mut entities = vec![
            EntityDesc::new("cube", Vec3::ZERO).with_traits(&[names::WSAD]),
            hat,
        ];
        for x in [2.0, 4.0, 6.0] {
            entities.push(
                EntityDesc::new("coin", Vec3::new(x, 0.0, 0.0)).with_traits(&[names::PICKUP]),
            );
        }
        entities.push(
            EntityDesc::new("cube", Vec3::new(6.0, 0.0, 2.0)).with_traits(&[names::IS_PUSHABLE]),
        );
        entities.push(
            EntityDesc::new("cube", Vec3::new(-3.0, 0.0, -3.0))
                .with_traits(&[names::IS_GRID_ALIGNED]),
        );

        let walk = InputState {
            move_x: 1.0,
            ..Default::default()
        };
        let over_player = InputState {
            cursor: Some(Vec3::new(6.0, 0.0, 0.0)),
            ..Default::default()
        };
        let input = vec![
            InputStep { frames: 90, state: walk },
            InputStep {
                frames: 10,
                state: InputState {
                    button_down: true,
                    ..over_player
                },
            },
            InputStep { frames: 1, state: over_player },
        ];

        Self {
            models: vec![cube, coin],
            entities,
            input,
        }
    }

    /// Register the scene's models and spawn its entities in order.
    ///
    /// Spawning stops at the first failing entity; those already spawned
    /// stay in `ctx`.
    pub fn apply(
        &self,
        ctx: &mut GameCtx,
        catalog: &mut ModelCatalog,
    ) -> Result<Vec<ThingRef>, SceneError> {
        for model in &self.models {
            catalog.insert(&model.name, Aabb::new(model.min, model.max));
        }

        let mut spawned = Vec::with_capacity(self.entities.len());
        for (index, desc) in self.entities.iter().enumerate() {
            let spawner = match desc.parent {
                None => ThingRef::NIL,
                Some(parent) => *spawned
                    .get(parent)
                    .ok_or(SceneError::BadParent { index, parent })?,
            };
            if let Some(unknown) = desc.traits.iter().find(|t| ctx.traits.find(t).is_none()) {
                return Err(SceneError::Spawn {
                    index,
                    source: CommandError::UnknownTrait(unknown.clone()),
                });
            }

            let mut args = SpawnArgs::new(desc.model.as_str())
                .at(desc.position)
                .scale(desc.scale)
                .spawner(spawner)
                .debug_name(desc.name.as_deref().unwrap_or(&desc.model));
            args.life_time = desc.life_time;
            args.push_distance = desc.push_distance;

            let thing = ctx
                .spawn_checked(catalog, args)
                .map_err(|source| SceneError::Spawn { index, source })?;
            if let Some(entity) = ctx.entities.get_mut(thing) {
                for name in &desc.traits {
                    ctx.traits.apply(entity, name);
                }
            }
            spawned.push(thing);
        }

        tracing::info!(
            models = self.models.len(),
            entities = spawned.len(),
            "scene applied"
        );
        Ok(spawned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandbox_core::game::FrameInput;

    #[test]
    fn demo_scene_spawns_everything() {
        let mut ctx = GameCtx::default();
        let mut catalog = ModelCatalog::new();
        let spawned = Scene::demo().apply(&mut ctx, &mut catalog).unwrap();

        assert_eq!(spawned.len(), 7);
        assert_eq!(ctx.entity_count(), 7);
        assert_eq!(catalog.len(), 2);
        let player = &ctx.entities[spawned[0]];
        assert!(ctx.traits.has(player, names::WSAD));
        assert!(player.flags.draggable);
        let hat = &ctx.entities[spawned[1]];
        assert_eq!(hat.spawner, spawned[0]);
        assert_eq!(hat.debug_name, "hat");
        assert_eq!(ctx.entities[spawned[2]].debug_name, "coin");
    }

    #[test]
    fn demo_player_collects_the_coins() {
        let mut ctx = GameCtx::default();
        let mut catalog = ModelCatalog::new();
        Scene::demo().apply(&mut ctx, &mut catalog).unwrap();

        let walk = FrameInput {
            movement: sandbox_core::math::Vec2::X,
            ..Default::default()
        };
        for _ in 0..90 {
            ctx.update(&walk, 1.0 / 60.0, &catalog);
        }
        let picked = ctx
            .drain_messages()
            .into_iter()
            .filter(|m| m == "Picked up coin")
            .count();
        assert_eq!(picked, 3);
    }

    #[test]
    fn parsed_entities_take_defaults() {
        let scene = Scene::from_json(
            r#"{
                "models": [{ "name": "cube", "min": [-0.5, -0.5, -0.5], "max": [0.5, 0.5, 0.5] }],
                "entities": [
                    { "model": "cube", "traits": ["wsad"] },
                    { "model": "cube", "position": [0, 2, 0], "scale": 0.5, "parent": 0 }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(scene.entities[0].scale, 1.0);
        assert_eq!(scene.entities[0].position, Vec3::ZERO);
        assert!(scene.input.is_empty());

        let mut ctx = GameCtx::default();
        let mut catalog = ModelCatalog::new();
        let spawned = scene.apply(&mut ctx, &mut catalog).unwrap();
        assert_eq!(ctx.entities[spawned[1]].spawner, spawned[0]);
    }

    #[test]
    fn forward_parent_is_rejected() {
        let mut scene = Scene::demo();
        scene.entities[0].parent = Some(3);
        let err = scene
            .apply(&mut GameCtx::default(), &mut ModelCatalog::new())
            .unwrap_err();
        assert!(matches!(err, SceneError::BadParent { index: 0, parent: 3 }));
    }

    #[test]
    fn unknown_names_are_spawn_errors() {
        let mut scene = Scene::demo();
        scene.entities[2].traits.push("flying".into());
        let mut ctx = GameCtx::default();
        let err = scene.apply(&mut ctx, &mut ModelCatalog::new()).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Spawn {
                index: 2,
                source: CommandError::UnknownTrait(_)
            }
        ));
        assert_eq!(ctx.entity_count(), 2);

        let mut scene = Scene::demo();
        scene.entities[0].model = "teapot".into();
        let err = scene
            .apply(&mut GameCtx::default(), &mut ModelCatalog::new())
            .unwrap_err();
        assert!(matches!(
            err,
            SceneError::Spawn {
                source: CommandError::UnknownModel(_),
                ..
            }
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            Scene::load("/nonexistent/sandbox/scene.json"),
            Err(SceneError::Io { .. })
        ));
    }
}
