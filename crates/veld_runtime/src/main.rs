//! Veld Engine Runtime
//!
//! Demo binary: boots the scene against the headless backend, runs a
//! bounded number of fixed ticks with scripted motion, then round-trips
//! the scene through a snapshot file.

mod registry;
mod scene;

use anyhow::Result;
use std::f32::consts::PI;
use std::io::Write;
use std::path::Path;
use veld_core::math::Vec2;
use veld_core::snapshot::{SnapshotReader, SnapshotWriter};
use veld_core::time::FrameClock;
use veld_metrics::{Counter, FrameTimer};
use veld_render::{Camera, HeadlessBackend, SpriteAssets};
use veld_services::{save, settings::Settings};

use registry::GameRegistry;
use scene::Scene;

const DEMO_TICKS: u64 = 120;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Veld Engine v{}", veld_core::VERSION);
    let settings = Settings::load_or_default(Path::new("veld.json"))?;
    tracing::info!(
        width = settings.graphics.resolution_width,
        height = settings.graphics.resolution_height,
        "target resolution"
    );

    let mut backend = HeadlessBackend::new();
    let assets = SpriteAssets::from_data_dir(&settings.scene.data_dir);
    let mut scene = Scene::new(&mut backend, &assets)?;
    let mut registry = GameRegistry::new();
    let camera = Camera::new();

    // Player plus a row of props; one debug marker excluded from saves
    let player = registry.spawn();
    scene.spawn_sprite(player);
    scene.sprites.set_depth(player, 10);

    let props: Vec<_> = (0..4)
        .map(|i| {
            let prop = registry.spawn();
            scene.spawn_sprite(prop);
            scene.transforms.set_position(prop, Vec2::new(i as f32 * 2.0, -1.0));
            prop
        })
        .collect();

    let marker = registry.spawn();
    registry.mark_transient(marker);
    scene.spawn_sprite(marker);
    scene.sprites.set_depth(marker, 100);

    let mut clock = FrameClock::new();
    let mut timer = FrameTimer::new(60);
    let mut counter = Counter::new();

    while clock.tick_count() < DEMO_TICKS {
        timer.begin();

        // scripted stand-in for gameplay input
        let dt = clock.dt();
        scene.transforms.translate(player, Vec2::new(5.0 * dt, 0.0));
        scene.transforms.rotate(player, 0.35 * PI * dt);

        if clock.tick_count() == DEMO_TICKS / 2 {
            registry.destroy(props[0]);
            tracing::debug!(entity = props[0].id(), "destroyed prop");
        }

        scene.update(&registry, &mut ());
        scene.draw(&mut backend, &camera);
        counter.add("sprites_drawn", scene.sprites.len() as u64);

        clock.advance_tick();
        timer.end();
    }

    // Snapshot round trip
    let snapshot_path = &settings.scene.snapshot_path;
    let mut writer = SnapshotWriter::new(save::create_snapshot(snapshot_path)?);
    scene.save(&mut writer, &registry)?;
    writer.into_inner().flush()?;
    tracing::info!(path = ?snapshot_path, "scene saved");

    let mut restored = Scene::new(&mut backend, &assets)?;
    let mut reader = SnapshotReader::new(save::open_snapshot(snapshot_path)?);
    restored.load(&mut reader)?;
    tracing::info!(
        transforms = restored.transforms.len(),
        sprites = restored.sprites.len(),
        "scene restored"
    );

    tracing::info!(
        ticks = clock.tick_count(),
        sim_time_s = clock.total_time().as_secs_f64(),
        fps = timer.fps(),
        frame_ms = timer.frame_time_ms(),
        sprites_drawn = counter.get("sprites_drawn"),
        "run complete"
    );

    Ok(())
}
