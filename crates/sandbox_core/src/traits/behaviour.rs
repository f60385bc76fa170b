/// Per-entity behaviour attached under a trait name.
///
/// `C` is whatever frame context the owner passes to
/// [`TraitRegistry::tick_all`](super::TraitRegistry::tick_all).
pub trait Behaviour<E, C = ()> {
    /// Runs once when the trait is applied to an entity that lacked it.
    fn init(&self, _entity: &mut E) {}

    /// Runs once per tick for every entity holding the trait.
    fn update(&self, _entity: &mut E, _ctx: &C) {}

    /// Runs when the trait is removed, or its entity is despawned.
    fn teardown(&self, _entity: &mut E) {}

    /// Traits answering `false` are skipped by `tick_all`.
    fn ticks(&self) -> bool {
        true
    }
}

type EntityFn<E> = Box<dyn Fn(&mut E)>;
type UpdateFn<E, C> = Box<dyn Fn(&mut E, &C)>;

/// A [`Behaviour`] assembled from closures.
///
/// ```ignore
/// registry.register_with(
///     "wsad",
///     TraitHooks::new().on_update(|e: &mut Entity, tick: &Tick| e.step(tick)),
/// );
/// ```
pub struct TraitHooks<E, C = ()> {
    init: Option<EntityFn<E>>,
    update: Option<UpdateFn<E, C>>,
    teardown: Option<EntityFn<E>>,
}

impl<E, C> TraitHooks<E, C> {
    pub fn new() -> Self {
        Self {
            init: None,
            update: None,
            teardown: None,
        }
    }

    pub fn on_init(mut self, f: impl Fn(&mut E) + 'static) -> Self {
        self.init = Some(Box::new(f));
        self
    }

    pub fn on_update(mut self, f: impl Fn(&mut E, &C) + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn on_teardown(mut self, f: impl Fn(&mut E) + 'static) -> Self {
        self.teardown = Some(Box::new(f));
        self
    }
}

impl<E, C> Default for TraitHooks<E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, C> Behaviour<E, C> for TraitHooks<E, C> {
    fn init(&self, entity: &mut E) {
        if let Some(init) = &self.init {
            init(entity);
        }
    }

    fn update(&self, entity: &mut E, ctx: &C) {
        if let Some(update) = &self.update {
            update(entity, ctx);
        }
    }

    fn teardown(&self, entity: &mut E) {
        if let Some(teardown) = &self.teardown {
            teardown(entity);
        }
    }

    fn ticks(&self) -> bool {
        self.update.is_some()
    }
}
