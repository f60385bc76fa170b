//! Model handles and the catalog interface.
//!
//! Asset loading lives outside the core. Entities keep an opaque
//! [`ModelHandle`]; picking and collision only need the model's local bounds.

use crate::math::Aabb;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Opaque, cheaply clonable reference to a loaded model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelHandle {
    id: u32,
    name: Arc<str>,
}

impl ModelHandle {
    pub fn new(id: u32, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Source of model instances.
pub trait ModelLibrary {
    /// A handle for the model registered as `name`, if loaded.
    fn instance(&self, name: &str) -> Option<ModelHandle>;

    /// Model-space bounds of `model`.
    fn local_bounds(&self, model: &ModelHandle) -> Option<Aabb>;
}

/// In-memory [`ModelLibrary`] keyed by name.
#[derive(Debug, Default)]
pub struct ModelCatalog {
    models: Vec<(ModelHandle, Aabb)>,
    by_name: HashMap<String, u32>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace the bounds of) a model.
    pub fn insert(&mut self, name: &str, bounds: Aabb) -> ModelHandle {
        if let Some(&id) = self.by_name.get(name) {
            let entry = &mut self.models[id as usize];
            entry.1 = bounds;
            return entry.0.clone();
        }
        let handle = ModelHandle::new(self.models.len() as u32, name);
        self.by_name.insert(name.to_string(), handle.id());
        self.models.push((handle.clone(), bounds));
        handle
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Model names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|(handle, _)| handle.name())
    }
}

impl ModelLibrary for ModelCatalog {
    fn instance(&self, name: &str) -> Option<ModelHandle> {
        let id = *self.by_name.get(name)?;
        self.models.get(id as usize).map(|(handle, _)| handle.clone())
    }

    fn local_bounds(&self, model: &ModelHandle) -> Option<Aabb> {
        self.models
            .get(model.id() as usize)
            .filter(|(handle, _)| handle == model)
            .map(|(_, bounds)| *bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn catalog_hands_out_instances_by_name() {
        let mut catalog = ModelCatalog::new();
        let cube = catalog.insert("cube", Aabb::UNIT);
        let tall = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 3.0, 1.0));
        catalog.insert("tower", tall);

        assert_eq!(catalog.instance("cube"), Some(cube.clone()));
        assert_eq!(catalog.local_bounds(&cube), Some(Aabb::UNIT));
        assert!(catalog.instance("teapot").is_none());
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["cube", "tower"]);
    }

    #[test]
    fn reinserting_updates_bounds_and_keeps_handle() {
        let mut catalog = ModelCatalog::new();
        let first = catalog.insert("crate", Aabb::UNIT);
        let bigger = Aabb::UNIT.scaled_translated(2.0, Vec3::ZERO);
        let second = catalog.insert("crate", bigger);
        assert_eq!(first, second);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.local_bounds(&first), Some(bigger));
    }

    #[test]
    fn foreign_handles_have_no_bounds() {
        let catalog = ModelCatalog::new();
        let stranger = ModelHandle::new(0, "elsewhere");
        assert!(catalog.local_bounds(&stranger).is_none());
    }
}
