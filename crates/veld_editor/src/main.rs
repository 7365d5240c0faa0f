//! Veld Editor binary
//!
//! Boots a scene in edit mode against the headless backend and logs the
//! bounding boxes the sprite system reports. Scene-view drawing and input
//! come later; this exercises the overlay data path end to end.

use anyhow::Result;
use veld_core::entity::{Entity, EntityRegistry};
use veld_core::math::Vec2;
use veld_core::transform::TransformSystem;
use veld_editor::OverlayState;
use veld_render::{Camera, HeadlessBackend, SpriteAssets, SpriteSystem};
use veld_services::settings::Settings;

/// Nothing gets destroyed inside the editor preview.
struct NoDestroy;

impl EntityRegistry for NoDestroy {
    fn is_destroyed(&self, _entity: Entity) -> bool {
        false
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Veld Editor v{}", veld_core::VERSION);
    let settings = Settings::load_or_default(std::path::Path::new("veld.json"))?;

    let mut backend = HeadlessBackend::new();
    let assets = SpriteAssets::from_data_dir(&settings.scene.data_dir);
    let mut transforms = TransformSystem::new();
    let mut sprites = SpriteSystem::new(&mut backend, &assets)?;
    let camera = Camera::new();

    let mut overlay = OverlayState::new();
    overlay.set_enabled(true);

    // A few placeholder entities to populate the scene view
    for id in 1..=3u32 {
        let entity = Entity::from_raw(id);
        sprites.add(entity, &mut transforms);
        transforms.set_position(entity, Vec2::new(id as f32 * 2.0, 0.0));
    }

    let registry = NoDestroy;
    overlay.begin_frame();
    transforms.update_all(&registry);
    sprites.update_all(&registry, &transforms, &mut overlay);
    sprites.draw_all(&mut backend, &camera);

    for (entity, bbox) in overlay.iter() {
        tracing::info!(
            entity = entity.id(),
            min = ?bbox.min,
            max = ?bbox.max,
            "selection bbox"
        );
    }
    tracing::info!(sprites = sprites.len(), "editor frame complete");

    Ok(())
}
