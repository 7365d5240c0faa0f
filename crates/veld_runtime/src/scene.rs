//! Scene context
//!
//! One explicit object owning the component systems and enforcing the
//! per-frame ordering: gameplay mutates transforms, then transform
//! reconciliation, then sprite update (matrix refresh + bbox reporting),
//! then the sorted batched draw.

use std::io::{Read, Write};
use veld_core::entity::{EditOverlay, Entity, EntityRegistry, SaveFilter};
use veld_core::snapshot::{SnapshotError, SnapshotReader, SnapshotWriter};
use veld_core::transform::TransformSystem;
use veld_render::{BackendError, Camera, RenderBackend, SpriteAssets, SpriteSystem};

pub struct Scene {
    pub transforms: TransformSystem,
    pub sprites: SpriteSystem,
}

impl Scene {
    pub fn new(
        backend: &mut dyn RenderBackend,
        assets: &SpriteAssets,
    ) -> Result<Self, BackendError> {
        Ok(Self {
            transforms: TransformSystem::new(),
            sprites: SpriteSystem::new(backend, assets)?,
        })
    }

    /// Give `entity` a sprite (and thereby a transform).
    pub fn spawn_sprite(&mut self, entity: Entity) {
        self.sprites.add(entity, &mut self.transforms);
    }

    /// The update phase. Runs once per frame, before [`Self::draw`].
    pub fn update<R: EntityRegistry + ?Sized>(&mut self, registry: &R, overlay: &mut dyn EditOverlay) {
        self.transforms.update_all(registry);
        self.sprites.update_all(registry, &self.transforms, overlay);
    }

    /// The draw phase. Runs once per frame, after [`Self::update`].
    pub fn draw(&mut self, backend: &mut dyn RenderBackend, camera: &Camera) {
        self.sprites.draw_all(backend, camera);
    }

    /// Persist both component sets into one stream: transforms first,
    /// then the filtered sprite records.
    pub fn save<W: Write, F: SaveFilter + ?Sized>(
        &self,
        writer: &mut SnapshotWriter<W>,
        filter: &F,
    ) -> Result<(), SnapshotError> {
        self.transforms.save_all(writer)?;
        self.sprites.save_all(writer, filter)
    }

    /// Restore both component sets, replacing all current records.
    pub fn load<R: Read>(&mut self, reader: &mut SnapshotReader<R>) -> Result<(), SnapshotError> {
        self.transforms.load_all(reader)?;
        self.sprites.load_all(reader, &mut self.transforms)
    }
}
