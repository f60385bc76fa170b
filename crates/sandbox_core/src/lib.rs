//! Sandbox core
//!
//! The simulation side of the sandbox:
//! - Generational slot storage with intrusive sublists ([`things`])
//! - Named per-entity behaviours ([`traits`])
//! - The entity aggregate and the game context that drives it ([`game`])
//! - Math, model and render-call abstractions the host plugs into

pub mod config;
pub mod entity;
pub mod game;
pub mod math;
pub mod model;
pub mod render;
pub mod things;
pub mod time;
pub mod traits;

pub use glam;

/// Sandbox version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
