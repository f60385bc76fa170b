//! Sandbox Runtime
//!
//! Headless binary: loads settings and a scene, plays the scene's input
//! script through the game loop and logs what happened.
//!
//! Usage: `sandbox [settings.json] [scene.json]`

mod sink;

use anyhow::{Context, Result};
use sandbox_core::game::GameCtx;
use sandbox_core::model::ModelCatalog;
use sandbox_services::input::ScriptedInput;
use sandbox_services::scene::Scene;
use sandbox_services::settings::Settings;
use sink::CountingSink;

/// Frames between entity-count reports.
const REPORT_INTERVAL: u64 = 60;

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG overrides the default level)
    tracing_subscriber::fmt::init();

    tracing::info!("Sandbox v{}", sandbox_core::VERSION);

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => {
            Settings::load(&path).with_context(|| format!("loading settings from {path}"))?
        }
        None => Settings::default(),
    };
    let scene = match args.next() {
        Some(path) => Scene::load(&path).with_context(|| format!("loading scene from {path}"))?,
        None => Scene::demo(),
    };

    let mut ctx = GameCtx::new(settings.game.clone());
    let mut catalog = ModelCatalog::new();
    scene.apply(&mut ctx, &mut catalog).context("applying scene")?;
    tracing::debug!("registered traits:\n{}", ctx.traits.describe());

    let mut input = ScriptedInput::new(scene.input.clone());
    let mut sink = CountingSink::default();
    let dt = settings.runtime.frame_dt;

    for _ in 0..settings.runtime.frames {
        let frame_input = input.next_frame();
        ctx.update(&frame_input, dt, &catalog);
        ctx.render(&mut sink, &catalog);

        for message in ctx.drain_messages() {
            tracing::info!(frame = ctx.clock().frame_count(), "{message}");
        }
        if ctx.clock().frame_count() % REPORT_INTERVAL == 0 {
            tracing::info!(
                frame = ctx.clock().frame_count(),
                entities = ctx.entity_count(),
                "frame report"
            );
        }
    }

    tracing::info!(
        frames = ctx.clock().frame_count(),
        seconds = ctx.clock().total_time().as_secs_f32(),
        entities = ctx.entity_count(),
        draws = sink.total_draws(),
        "run finished"
    );
    for (thing, entity) in ctx.entities.iter() {
        tracing::debug!(
            %thing,
            name = %entity.debug_name,
            traits = %ctx.traits.describe_entity(entity),
            "survivor"
        );
    }

    Ok(())
}
