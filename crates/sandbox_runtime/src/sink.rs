//! A [`RenderSink`] for headless runs: counts draw calls per layer and
//! reports them at trace level each time the world is rasterized.

use sandbox_core::math::{Aabb, Mat4, Vec2, Vec3};
use sandbox_core::model::ModelHandle;
use sandbox_core::render::{Color, RenderLayer, RenderSink};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct CountingSink {
    layer: RenderLayer,
    frame: BTreeMap<RenderLayer, usize>,
    total: usize,
}

impl CountingSink {
    pub fn total_draws(&self) -> usize {
        self.total
    }

    fn count(&mut self) {
        *self.frame.entry(self.layer).or_default() += 1;
        self.total += 1;
    }
}

impl RenderSink for CountingSink {
    fn layer_start(&mut self, layer: RenderLayer) {
        self.layer = layer;
    }

    fn draw_plane(&mut self, _center: Vec3, _size: Vec2, _color: Color) {
        self.count();
    }

    fn draw_model(&mut self, _model: &ModelHandle, _transform: Mat4, _tint: Option<Color>) {
        self.count();
    }

    fn draw_bounding_box(&mut self, _bounds: Aabb, _color: Color) {
        self.count();
    }

    fn draw_billboard(&mut self, _model: &ModelHandle, _position: Vec3, _size: f32, _tint: Color) {
        self.count();
    }

    fn rasterize(&mut self) {
        tracing::trace!(layers = ?self.frame, "frame drawn");
        self.frame.clear();
    }

    fn draw_text(&mut self, text: &str, _anchor: Vec3, _font_size: u32, color: Color) {
        tracing::trace!(text, alpha = color.a, "label");
        self.total += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandbox_core::game::GameCtx;
    use sandbox_core::model::ModelCatalog;

    #[test]
    fn empty_world_draws_only_the_floor() {
        let mut sink = CountingSink::default();
        GameCtx::default().render(&mut sink, &ModelCatalog::new());
        assert_eq!(sink.total_draws(), 21 * 21);
        assert!(sink.frame.is_empty());
    }
}
