use super::{Behaviour, HasTraits, TraitId};
use crate::things::ThingsList;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Name -> trait table driving per-entity behaviours.
///
/// Registration is idempotent by name. Lookups by an unknown name are
/// reported as `false` and logged, never treated as errors.
pub struct TraitRegistry<E, C = ()> {
    entries: Vec<RegisteredTrait<E, C>>,
    name_lookup: HashMap<String, TraitId>,
}

struct RegisteredTrait<E, C> {
    id: TraitId,
    name: String,
    behaviour: Option<Box<dyn Behaviour<E, C>>>,
}

impl<E: HasTraits, C> TraitRegistry<E, C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            name_lookup: HashMap::new(),
        }
    }

    /// Register a marker trait with no behaviour.
    pub fn register(&mut self, name: &str) -> TraitId {
        self.insert(name, None)
    }

    /// Register a trait backed by `behaviour`.
    ///
    /// If `name` is already registered its existing id is returned and
    /// `behaviour` is discarded.
    pub fn register_with<B>(&mut self, name: &str, behaviour: B) -> TraitId
    where
        B: Behaviour<E, C> + 'static,
    {
        self.insert(name, Some(Box::new(behaviour)))
    }

    fn insert(&mut self, name: &str, behaviour: Option<Box<dyn Behaviour<E, C>>>) -> TraitId {
        if let Some(&id) = self.name_lookup.get(name) {
            debug!(trait_name = name, %id, "trait already registered");
            return id;
        }

        let id = TraitId::new(self.entries.len() as u32);
        self.name_lookup.insert(name.to_string(), id);
        self.entries.push(RegisteredTrait {
            id,
            name: name.to_string(),
            behaviour,
        });
        debug!(trait_name = name, %id, "registered trait");
        id
    }

    pub fn find(&self, name: &str) -> Option<TraitId> {
        self.name_lookup.get(name).copied()
    }

    pub fn name_of(&self, id: TraitId) -> Option<&str> {
        self.entries
            .get(id.index() as usize)
            .map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Give `entity` the trait called `name`, running its init hook the
    /// first time. Returns `false` for unknown names.
    pub fn apply(&self, entity: &mut E, name: &str) -> bool {
        match self.lookup(name) {
            Some(id) => self.apply_id(entity, id),
            None => false,
        }
    }

    pub fn apply_id(&self, entity: &mut E, id: TraitId) -> bool {
        let Some(entry) = self.entries.get(id.index() as usize) else {
            return false;
        };
        if entity.traits_mut().insert(id) {
            if let Some(behaviour) = &entry.behaviour {
                behaviour.init(entity);
            }
        }
        true
    }

    /// Take the trait called `name` off `entity`, running its teardown hook.
    /// Returns `true` only if the trait was present.
    pub fn remove(&self, entity: &mut E, name: &str) -> bool {
        match self.lookup(name) {
            Some(id) => self.remove_id(entity, id),
            None => false,
        }
    }

    pub fn remove_id(&self, entity: &mut E, id: TraitId) -> bool {
        if !entity.traits_mut().remove(id) {
            return false;
        }
        if let Some(behaviour) = self
            .entries
            .get(id.index() as usize)
            .and_then(|entry| entry.behaviour.as_ref())
        {
            behaviour.teardown(entity);
        }
        true
    }

    /// Strip every trait from `entity`, running teardown hooks in
    /// registration order.
    pub fn remove_all(&self, entity: &mut E) {
        let present = entity.traits_mut().take();
        for id in present.iter() {
            if let Some(behaviour) = self
                .entries
                .get(id.index() as usize)
                .and_then(|entry| entry.behaviour.as_ref())
            {
                behaviour.teardown(entity);
            }
        }
    }

    pub fn has(&self, entity: &E, name: &str) -> bool {
        self.find(name)
            .is_some_and(|id| entity.traits().contains(id))
    }

    /// Run every ticking trait over the entities holding it.
    ///
    /// Outer loop is registration order, inner loop is slot order: all
    /// entities see an earlier trait before any entity sees a later one.
    pub fn tick_all(&self, things: &mut ThingsList<E>, ctx: &C) {
        for entry in &self.entries {
            let Some(behaviour) = entry.behaviour.as_ref().filter(|b| b.ticks()) else {
                continue;
            };
            for (_, entity) in things.iter_mut() {
                if entity.traits().contains(entry.id) {
                    behaviour.update(entity, ctx);
                }
            }
        }
    }

    /// One `name [slot N]` line per registered trait.
    pub fn describe(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{} [slot {}]\n", entry.name, entry.id))
            .collect()
    }

    /// Names of the traits on `entity`, joined with ` | `.
    pub fn describe_entity(&self, entity: &E) -> String {
        entity
            .traits()
            .iter()
            .filter_map(|id| self.name_of(id))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn lookup(&self, name: &str) -> Option<TraitId> {
        let id = self.find(name);
        if id.is_none() {
            warn!(trait_name = name, "unknown trait");
        }
        id
    }
}

impl<E: HasTraits, C> Default for TraitRegistry<E, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{TraitHooks, TraitSet};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Critter {
        name: &'static str,
        counter: u32,
        inits: u32,
        teardowns: u32,
        traits: TraitSet,
    }

    impl HasTraits for Critter {
        fn traits(&self) -> &TraitSet {
            &self.traits
        }

        fn traits_mut(&mut self) -> &mut TraitSet {
            &mut self.traits
        }
    }

    fn critter(name: &'static str) -> Critter {
        Critter {
            name,
            ..Default::default()
        }
    }

    #[test]
    fn registering_twice_returns_same_slot() {
        let mut registry = TraitRegistry::<Critter>::new();
        let wsad = registry.register("wsad");
        let pickup = registry.register("pickup");
        assert_eq!(registry.register("wsad"), wsad);
        assert_ne!(wsad, pickup);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.name_of(pickup), Some("pickup"));
    }

    #[test]
    fn apply_has_remove() {
        let mut registry = TraitRegistry::<Critter>::new();
        registry.register("is_text");
        let mut e = critter("label");

        assert!(!registry.has(&e, "is_text"));
        assert!(registry.apply(&mut e, "is_text"));
        assert!(registry.has(&e, "is_text"));
        assert!(registry.remove(&mut e, "is_text"));
        assert!(!registry.has(&e, "is_text"));
        assert!(!registry.remove(&mut e, "is_text"));
    }

    #[test]
    fn unknown_names_are_ignored() {
        let registry = TraitRegistry::<Critter>::new();
        let mut e = critter("ghost");
        assert!(!registry.apply(&mut e, "flying"));
        assert!(!registry.remove(&mut e, "flying"));
        assert!(!registry.has(&e, "flying"));
        assert!(e.traits.is_empty());
    }

    #[test]
    fn second_apply_does_not_rerun_init() {
        let mut registry = TraitRegistry::<Critter>::new();
        registry.register_with("pickup", TraitHooks::new().on_init(|e: &mut Critter| e.inits += 1));
        let mut e = critter("gem");

        registry.apply(&mut e, "pickup");
        registry.apply(&mut e, "pickup");
        assert!(registry.has(&e, "pickup"));
        assert_eq!(e.inits, 1);
    }

    #[test]
    fn remove_runs_teardown() {
        let mut registry = TraitRegistry::<Critter>::new();
        registry.register_with(
            "glow",
            TraitHooks::new().on_teardown(|e: &mut Critter| e.teardowns += 1),
        );
        registry.register_with(
            "buzz",
            TraitHooks::new().on_teardown(|e: &mut Critter| e.teardowns += 10),
        );
        let mut e = critter("bee");
        registry.apply(&mut e, "glow");
        registry.apply(&mut e, "buzz");

        registry.remove(&mut e, "glow");
        assert_eq!(e.teardowns, 1);
        registry.remove_all(&mut e);
        assert_eq!(e.teardowns, 11);
        assert!(e.traits.is_empty());
    }

    #[test]
    fn ticking_three_times_counts_three() {
        let mut registry = TraitRegistry::<Critter>::new();
        registry.register_with(
            "wsad",
            TraitHooks::new().on_update(|e: &mut Critter, _: &()| e.counter += 1),
        );
        let mut things = ThingsList::with_capacity(4);
        let mut e = critter("player");
        registry.apply(&mut e, "wsad");
        let r = things.add(e);
        let bystander = things.add(critter("rock"));

        for _ in 0..3 {
            registry.tick_all(&mut things, &());
        }
        assert_eq!(things[r].counter, 3);
        assert_eq!(things[bystander].counter, 0);
    }

    #[test]
    fn earlier_traits_tick_all_entities_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = TraitRegistry::<Critter>::new();
        let log_a = Rc::clone(&log);
        registry.register_with(
            "a",
            TraitHooks::new().on_update(move |e: &mut Critter, _: &()| {
                log_a.borrow_mut().push(format!("a:{}", e.name))
            }),
        );
        let log_b = Rc::clone(&log);
        registry.register_with(
            "b",
            TraitHooks::new().on_update(move |e: &mut Critter, _: &()| {
                log_b.borrow_mut().push(format!("b:{}", e.name))
            }),
        );

        let mut things = ThingsList::with_capacity(4);
        for name in ["one", "two"] {
            let mut e = critter(name);
            registry.apply(&mut e, "b");
            registry.apply(&mut e, "a");
            things.add(e);
        }

        registry.tick_all(&mut things, &());
        assert_eq!(*log.borrow(), vec!["a:one", "a:two", "b:one", "b:two"]);
    }

    #[test]
    fn tick_passes_context_through() {
        let mut registry = TraitRegistry::<Critter, u32>::new();
        registry.register_with(
            "step",
            TraitHooks::new().on_update(|e: &mut Critter, step: &u32| e.counter += *step),
        );
        registry.register("marker");

        let mut things = ThingsList::with_capacity(2);
        let mut e = critter("walker");
        registry.apply(&mut e, "step");
        registry.apply(&mut e, "marker");
        let r = things.add(e);

        registry.tick_all(&mut things, &5);
        registry.tick_all(&mut things, &2);
        assert_eq!(things[r].counter, 7);
    }

    #[test]
    fn describe_lists_registry_and_entity() {
        let mut registry = TraitRegistry::<Critter>::new();
        registry.register("wsad");
        registry.register("pickup");
        registry.register("is_text");

        assert_eq!(
            registry.describe(),
            "wsad [slot 0]\npickup [slot 1]\nis_text [slot 2]\n"
        );

        let mut e = critter("gem");
        registry.apply(&mut e, "is_text");
        registry.apply(&mut e, "wsad");
        assert_eq!(registry.describe_entity(&e), "wsad | is_text");
    }
}
