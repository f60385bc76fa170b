//! Operations exposed to scripts and the developer console.
//!
//! External callers address entities by their position in iteration order
//! (0 = lowest occupied slot); translating that to a [`ThingRef`] is a
//! linear scan.

use super::{names, GameCtx, SpawnArgs};
use crate::math::Vec3;
use crate::model::ModelLibrary;
use crate::things::ThingRef;
use crate::traits::TraitId;
use thiserror::Error;

/// Why a command did nothing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("model '{0}' is not loaded")]
    UnknownModel(String),

    #[error("entity list is full ({capacity} slots)")]
    Full { capacity: usize },

    #[error("no entity at index {0}")]
    InvalidIndex(usize),

    #[error("trait '{0}' is not registered")]
    UnknownTrait(String),
}

impl GameCtx {
    /// Ref of the `ordinal`-th live entity.
    pub fn ref_at(&self, ordinal: usize) -> Option<ThingRef> {
        self.entities.iter().nth(ordinal).map(|(thing, _)| thing)
    }

    pub fn spawn_model(
        &mut self,
        models: &dyn ModelLibrary,
        model_name: &str,
        position: Vec3,
        scale: f32,
    ) -> Result<ThingRef, CommandError> {
        self.spawn_checked(models, SpawnArgs::new(model_name).at(position).scale(scale))
    }

    /// Spawn attached to the entity at `parent_index`.
    pub fn spawn_child(
        &mut self,
        models: &dyn ModelLibrary,
        parent_index: usize,
        model_name: &str,
        position: Vec3,
        scale: f32,
    ) -> Result<ThingRef, CommandError> {
        let parent = self
            .ref_at(parent_index)
            .ok_or(CommandError::InvalidIndex(parent_index))?;
        self.spawn_checked(
            models,
            SpawnArgs::new(model_name)
                .at(position)
                .scale(scale)
                .spawner(parent),
        )
    }

    /// [`GameCtx::spawn`] with the failure reason spelled out.
    pub fn spawn_checked(
        &mut self,
        models: &dyn ModelLibrary,
        args: SpawnArgs,
    ) -> Result<ThingRef, CommandError> {
        if args.model_name != names::NO_MODEL && models.instance(&args.model_name).is_none() {
            return Err(CommandError::UnknownModel(args.model_name));
        }
        let thing = self.spawn(args, models);
        if thing.is_nil() {
            return Err(CommandError::Full {
                capacity: self.entities.capacity(),
            });
        }
        Ok(thing)
    }

    pub fn apply_trait(&mut self, index: usize, trait_name: &str) -> Result<(), CommandError> {
        let (thing, id) = self.resolve_trait_target(index, trait_name)?;
        if let Some(entity) = self.entities.get_mut(thing) {
            self.traits.apply_id(entity, id);
        }
        Ok(())
    }

    /// Returns whether the entity actually had the trait.
    pub fn remove_trait(&mut self, index: usize, trait_name: &str) -> Result<bool, CommandError> {
        let (thing, id) = self.resolve_trait_target(index, trait_name)?;
        Ok(self
            .entities
            .get_mut(thing)
            .is_some_and(|entity| self.traits.remove_id(entity, id)))
    }

    fn resolve_trait_target(
        &self,
        index: usize,
        trait_name: &str,
    ) -> Result<(ThingRef, TraitId), CommandError> {
        let thing = self.ref_at(index).ok_or(CommandError::InvalidIndex(index))?;
        let id = self
            .traits
            .find(trait_name)
            .ok_or_else(|| CommandError::UnknownTrait(trait_name.to_string()))?;
        Ok((thing, id))
    }
}
