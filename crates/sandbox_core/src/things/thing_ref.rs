//! Stable handle into a [`ThingsList`](super::ThingsList).
//!
//! A ref is a plain value: copy it, store it, hash it. It never points at
//! memory directly and must be resolved through the list that issued it.

use std::fmt;

/// Whether a ref (or slot) names a live item.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThingKind {
    #[default]
    Nil,
    Item,
}

/// Handle to a slot (generation-checked)
///
/// Fields compare lexicographically: kind, then generation, then index.
/// A `Nil` ref never resolves to a live slot.
///
/// Example:
/// ```ignore
/// let r = things.add(enemy);
/// things.remove(r);
/// // r is now stale (generation mismatch), removing it again does nothing
/// things.remove(r);
/// ```
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThingRef {
    kind: ThingKind,
    generation: u32,
    index: u32,
}

impl ThingRef {
    /// The ref every failed lookup or empty relation uses.
    pub const NIL: ThingRef = ThingRef {
        kind: ThingKind::Nil,
        generation: 0,
        index: 0,
    };

    pub(crate) const fn item(index: u32, generation: u32) -> Self {
        Self {
            kind: ThingKind::Item,
            generation,
            index,
        }
    }

    pub fn kind(&self) -> ThingKind {
        self.kind
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        self.kind == ThingKind::Nil
    }

    /// Pack into 64 bits for callers that only speak integers.
    ///
    /// Layout: [32-bit generation | 32-bit index]. Generation 0 is never
    /// handed out by a list, so it doubles as the Nil encoding.
    pub fn to_bits(&self) -> u64 {
        if self.is_nil() {
            return 0;
        }
        ((self.generation as u64) << 32) | (self.index as u64)
    }

    /// Inverse of [`ThingRef::to_bits`].
    pub fn from_bits(bits: u64) -> Self {
        let generation = (bits >> 32) as u32;
        if generation == 0 {
            return Self::NIL;
        }
        Self::item(bits as u32, generation)
    }
}

impl fmt::Display for ThingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ThingKind::Nil => write!(f, "nil"),
            ThingKind::Item => write!(f, "#{}v{}", self.index, self.generation),
        }
    }
}
