//! Gameplay tunables
//!
//! Loaded once at startup (see `sandbox_services::settings`); every field has
//! a default so partial config files work.

use crate::math::Vec3;
use crate::render::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed number of entity slots.
    pub capacity: usize,
    /// Seconds a floating label stays alive while fading out.
    pub label_fade_secs: f32,
    /// Label position relative to the entity it follows.
    pub label_offset: Vec3,
    /// Exponential velocity decay per second.
    pub friction: f32,
    /// Below this speed a moving entity comes to rest.
    pub rest_speed: f32,
    /// Units per second for entities driven by the movement keys.
    pub move_speed: f32,
    /// Radians per second for spinning pickups.
    pub spin_speed: f32,
    pub highlight_color: Color,
    pub highlight_scale: f32,
    pub selection_color: Color,
    pub selection_scale: f32,
}

impl GameConfig {
    /// Largest slot count a config may ask for; the slots are allocated up front.
    pub const MAX_CAPACITY: usize = 1 << 20;
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            label_fade_secs: 5.0,
            label_offset: Vec3::new(0.0, 1.5, 0.0),
            friction: 3.0,
            rest_speed: 0.05,
            move_speed: 4.0,
            spin_speed: 1.5,
            highlight_color: Color::YELLOW,
            highlight_scale: 1.1,
            selection_color: Color::ORANGE,
            selection_scale: 1.15,
        }
    }
}
