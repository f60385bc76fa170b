use std::collections::BTreeSet;
use std::fmt;

/// Slot assigned to each registered trait, in registration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TraitId(u32);

impl TraitId {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the raw index backing this id.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TraitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The traits present on one entity.
///
/// Sparse and ordered: iteration follows registration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TraitSet {
    present: BTreeSet<TraitId>,
}

impl TraitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the trait was not already present.
    pub fn insert(&mut self, id: TraitId) -> bool {
        self.present.insert(id)
    }

    /// Returns `true` if the trait was present.
    pub fn remove(&mut self, id: TraitId) -> bool {
        self.present.remove(&id)
    }

    #[inline]
    pub fn contains(&self, id: TraitId) -> bool {
        self.present.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.present.len()
    }

    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TraitId> + '_ {
        self.present.iter().copied()
    }

    pub(crate) fn take(&mut self) -> TraitSet {
        std::mem::take(self)
    }
}

/// Anything that carries a [`TraitSet`] can be driven by a
/// [`TraitRegistry`](super::TraitRegistry).
pub trait HasTraits {
    fn traits(&self) -> &TraitSet;
    fn traits_mut(&mut self) -> &mut TraitSet;
}
