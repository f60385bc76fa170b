use super::{names, GameCtx};
use crate::math::{Vec2, Vec3};
use crate::model::ModelLibrary;
use crate::render::{Color, RenderLayer, RenderSink};

/// Floor tiles extend this many units from the origin on X and Z.
const FLOOR_HALF_EXTENT: i32 = 10;
const LABEL_FONT_SIZE: u32 = 20;

impl GameCtx {
    /// Describe the current state as draw calls, back layer first.
    pub fn render(&self, sink: &mut dyn RenderSink, models: &dyn ModelLibrary) {
        sink.layer_start(RenderLayer::Background);
        for x in -FLOOR_HALF_EXTENT..=FLOOR_HALF_EXTENT {
            for z in -FLOOR_HALF_EXTENT..=FLOOR_HALF_EXTENT {
                let color = if (x + z).rem_euclid(2) == 0 {
                    Color::TILE_LIGHT
                } else {
                    Color::TILE_DARK
                };
                sink.draw_plane(Vec3::new(x as f32, -0.1, z as f32), Vec2::ONE, color);
            }
        }

        sink.layer_start(RenderLayer::Highlight);
        for (_, entity) in self.entities.iter() {
            if let (true, true, Some(model)) = (
                entity.render.highlighted,
                entity.render.visible,
                entity.model.as_ref(),
            ) {
                let scale = entity.scale_or_one() * self.config.highlight_scale;
                sink.draw_model(
                    model,
                    Self::entity_transform(entity, Some(scale)),
                    Some(self.config.highlight_color),
                );
            }
        }

        sink.layer_start(RenderLayer::Entities);
        for (_, entity) in self.entities.iter() {
            let (true, Some(model)) = (entity.render.visible, entity.model.as_ref()) else {
                continue;
            };
            sink.draw_model(model, Self::entity_transform(entity, None), None);
            if self.traits.has(entity, names::IS_HITBOX) {
                sink.draw_bounding_box(Self::world_bounds(entity, models), Color::RED);
            }
        }

        sink.layer_start(RenderLayer::Focus);
        for (_, entity) in self.entities.iter() {
            if let (true, true, Some(model)) = (
                entity.render.selected,
                entity.render.visible,
                entity.model.as_ref(),
            ) {
                let scale = entity.scale_or_one() * self.config.selection_scale;
                sink.draw_model(
                    model,
                    Self::entity_transform(entity, Some(scale)),
                    Some(self.config.selection_color),
                );
            }
        }

        sink.layer_start(RenderLayer::UiWorld);
        for (_, entity) in self.entities.iter() {
            if !self.traits.has(entity, names::IS_BILLBOARD) {
                continue;
            }
            if let Some(model) = entity.model.as_ref() {
                sink.draw_billboard(
                    model,
                    entity.position_or_origin(),
                    entity.scale_or_one(),
                    Color::WHITE,
                );
            }
        }

        sink.rasterize();

        let fade = self.config.label_fade_secs;
        for (_, entity) in self.entities.iter() {
            if !self.traits.has(entity, names::IS_TEXT) {
                continue;
            }
            let alpha = match (entity.life_time, fade > 0.0) {
                (Some(life), true) => life / fade,
                _ => 1.0,
            };
            sink.draw_text(
                &entity.label,
                entity.position_or_origin(),
                LABEL_FONT_SIZE,
                Color::RED.faded(alpha),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tests::{apply, catalog, pointing_at, spawn_at, DT};
    use crate::game::FrameInput;
    use crate::math::{Aabb, Mat4};
    use crate::model::ModelHandle;
    use crate::things::ThingRef;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Layer(RenderLayer),
        Plane(Color),
        Model(String, Option<Color>),
        Bounds(Color),
        Billboard(String),
        Rasterize,
        Text(String, Color),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl RenderSink for Recorder {
        fn layer_start(&mut self, layer: RenderLayer) {
            self.calls.push(Call::Layer(layer));
        }

        fn draw_plane(&mut self, _center: Vec3, _size: Vec2, color: Color) {
            self.calls.push(Call::Plane(color));
        }

        fn draw_model(&mut self, model: &ModelHandle, _transform: Mat4, tint: Option<Color>) {
            self.calls.push(Call::Model(model.name().to_string(), tint));
        }

        fn draw_bounding_box(&mut self, _bounds: Aabb, color: Color) {
            self.calls.push(Call::Bounds(color));
        }

        fn draw_billboard(&mut self, model: &ModelHandle, _position: Vec3, _size: f32, _tint: Color) {
            self.calls.push(Call::Billboard(model.name().to_string()));
        }

        fn rasterize(&mut self) {
            self.calls.push(Call::Rasterize);
        }

        fn draw_text(&mut self, text: &str, _anchor: Vec3, _font_size: u32, color: Color) {
            self.calls.push(Call::Text(text.to_string(), color));
        }
    }

    #[test]
    fn render_emits_layers_back_to_front() {
        let models = catalog();
        let mut ctx = GameCtx::default();
        let cube = spawn_at(&mut ctx, &models, "cube", 0.0, 0.0);
        let hitbox = spawn_at(&mut ctx, &models, "coin", 4.0, 0.0);
        apply(&mut ctx, hitbox, names::IS_HITBOX);
        let sign = spawn_at(&mut ctx, &models, "coin", -4.0, 0.0);
        apply(&mut ctx, sign, names::IS_BILLBOARD);
        let click = FrameInput {
            left_pressed: true,
            ..pointing_at(0.0, 0.0)
        };
        ctx.update(&click, DT, &models);
        assert_eq!(ctx.selected, cube);
        ctx.spawn_label("note", cube);

        let mut sink = Recorder::default();
        ctx.render(&mut sink, &models);
        let calls = sink.calls;

        let layers: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Layer(layer) => Some(*layer),
                _ => None,
            })
            .collect();
        assert_eq!(
            layers,
            vec![
                RenderLayer::Background,
                RenderLayer::Highlight,
                RenderLayer::Entities,
                RenderLayer::Focus,
                RenderLayer::UiWorld,
            ]
        );

        let planes = calls.iter().filter(|c| matches!(c, Call::Plane(_))).count();
        assert_eq!(planes, 21 * 21);
        assert!(calls.contains(&Call::Model("cube".into(), Some(ctx.config().highlight_color))));
        assert!(calls.contains(&Call::Model("cube".into(), Some(ctx.config().selection_color))));
        assert_eq!(
            calls.iter().filter(|c| matches!(c, Call::Model(_, None))).count(),
            3
        );
        assert_eq!(calls.iter().filter(|c| **c == Call::Bounds(Color::RED)).count(), 1);
        assert!(calls.contains(&Call::Billboard("coin".into())));

        let raster = calls.iter().position(|c| *c == Call::Rasterize).unwrap();
        assert_eq!(calls[raster + 1..], [Call::Text("note".into(), Color::RED)]);
    }

    #[test]
    fn label_text_fades_with_remaining_life() {
        let models = catalog();
        let mut ctx = GameCtx::default();
        let label = ctx.spawn_label("fading", ThingRef::NIL);
        ctx.entities[label].life_time = Some(ctx.config().label_fade_secs / 2.0);

        let mut sink = Recorder::default();
        ctx.render(&mut sink, &models);
        let text = sink.calls.last().unwrap();
        assert_eq!(*text, Call::Text("fading".into(), Color::RED.faded(0.5)));
    }
}
