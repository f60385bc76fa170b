//! Slot storage with stable, generation-checked refs.
//!
//! Everything outside a [`ThingsList`] talks about its contents through
//! [`ThingRef`] values; only the list itself hands out references.

mod list;
mod thing_ref;

pub use list::{Chain, Iter, IterMut, ThingsList};
pub use thing_ref::{ThingKind, ThingRef};
