//! Render-facing view of the world.
//!
//! The core never talks to a GPU. It describes each frame as a sequence of
//! layer-scoped draw calls against a [`RenderSink`], which the host
//! implements on top of whatever rendering library it uses.

use crate::math::{Aabb, Mat4, Vec2, Vec3};
use crate::model::ModelHandle;
use serde::{Deserialize, Serialize};

/// RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(230, 41, 55);
    pub const YELLOW: Color = Color::rgb(253, 249, 0);
    pub const ORANGE: Color = Color::rgb(255, 161, 0);
    pub const TILE_LIGHT: Color = Color::rgb(60, 60, 60);
    pub const TILE_DARK: Color = Color::rgb(40, 40, 40);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha scaled by `factor` (clamped to 0..=1).
    pub fn faded(self, factor: f32) -> Self {
        Self {
            a: (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8,
            ..self
        }
    }
}

/// Composited render layers, drawn back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RenderLayer {
    Background,
    Highlight,
    #[default]
    Entities,
    Focus,
    UiWorld,
}

/// Per-entity render state. `highlighted` and `selected` are refreshed at
/// the end of every update from the hover and selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub visible: bool,
    pub highlighted: bool,
    pub selected: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            visible: true,
            highlighted: false,
            selected: false,
        }
    }
}

/// Draw-call receiver implemented by the host renderer.
pub trait RenderSink {
    /// Subsequent 3D draws go to `layer` until the next call.
    fn layer_start(&mut self, layer: RenderLayer);

    fn draw_plane(&mut self, center: Vec3, size: Vec2, color: Color);

    /// Draw a model with its own materials, or flat-shaded in `tint`.
    fn draw_model(&mut self, model: &ModelHandle, transform: Mat4, tint: Option<Color>);

    fn draw_bounding_box(&mut self, bounds: Aabb, color: Color);

    /// Camera-facing quad textured with the model's first material.
    fn draw_billboard(&mut self, model: &ModelHandle, position: Vec3, size: f32, tint: Color);

    /// Composite all layers to the screen.
    fn rasterize(&mut self);

    /// Screen-space text anchored at a world position.
    fn draw_text(&mut self, text: &str, anchor: Vec3, font_size: u32, color: Color);
}
