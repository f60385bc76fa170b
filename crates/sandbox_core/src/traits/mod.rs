//! Named, toggleable behaviours attached to entities.
//!
//! A [`TraitRegistry`] owns the name table and the behaviour objects; each
//! entity only carries a [`TraitSet`] saying which traits it currently has.

mod behaviour;
mod registry;
mod trait_set;

pub use behaviour::{Behaviour, TraitHooks};
pub use registry::TraitRegistry;
pub use trait_set::{HasTraits, TraitId, TraitSet};
