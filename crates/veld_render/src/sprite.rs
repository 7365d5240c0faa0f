//! Sprite component system
//!
//! One textured quad per entity, drawn out of a shared atlas. Sprites keep
//! a per-frame copy of their entity's world matrix rather than deriving it
//! themselves; the whole live set is depth-sorted and streamed to the
//! backend as a single point-primitive draw, one vertex per sprite.

use crate::backend::{BackendError, ProgramId, RenderBackend, VertexAttrib};
use crate::camera::Camera;
use bytemuck::{Pod, Zeroable};
use std::io::{Read, Write};
use std::mem::{offset_of, size_of};
use std::path::{Path, PathBuf};
use veld_core::entity::{EditOverlay, Entity, EntityRegistry, SaveFilter};
use veld_core::math::{Bbox, Mat3, Vec2};
use veld_core::snapshot::{SnapshotError, SnapshotReader, SnapshotWriter};
use veld_core::storage::DensePool;
use veld_core::transform::TransformSystem;

/// Per-entity sprite record.
///
/// `#[repr(C)]` because this exact layout is the vertex record streamed to
/// the backend; the attribute offsets in [`SpriteSystem::new`] index into
/// it. `depth` rides along in the buffer but is not bound as an attribute.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Sprite {
    /// World matrix, copied from the transform each frame.
    pub wmat: Mat3,
    /// Offset of the sprite's cell within the atlas, in pixels.
    pub cell: Vec2,
    /// Displayed size, in pixels of the atlas.
    pub size: Vec2,
    /// Draw-order priority; higher depth draws earlier.
    pub depth: i32,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            wmat: Mat3::IDENTITY,
            cell: Vec2::new(32.0, 32.0),
            size: Vec2::new(32.0, 32.0),
            depth: 0,
        }
    }
}

/// Asset paths the sprite pipeline binds at init.
#[derive(Debug, Clone)]
pub struct SpriteAssets {
    pub vertex_shader: PathBuf,
    pub geometry_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub atlas: PathBuf,
}

impl SpriteAssets {
    /// Conventional layout under a data directory.
    pub fn from_data_dir(dir: &Path) -> Self {
        Self {
            vertex_shader: dir.join("sprite.vert"),
            geometry_shader: dir.join("sprite.geom"),
            fragment_shader: dir.join("sprite.frag"),
            atlas: dir.join("atlas.png"),
        }
    }
}

/// Owns one [`Sprite`] per tracked entity and the GPU-side objects they
/// draw through.
pub struct SpriteSystem {
    pool: DensePool<Sprite>,
    program: ProgramId,
    atlas: PathBuf,
}

impl SpriteSystem {
    /// Build the shared program, load the atlas and describe the vertex
    /// record layout. Runs once at system init.
    pub fn new(
        backend: &mut dyn RenderBackend,
        assets: &SpriteAssets,
    ) -> Result<Self, BackendError> {
        let program = backend.create_program(
            &assets.vertex_shader,
            &assets.geometry_shader,
            &assets.fragment_shader,
        )?;
        backend.use_program(program);

        let atlas_size = backend.load_texture(&assets.atlas)?;
        backend.set_uniform_i32(program, "tex0", 0);
        backend.set_uniform_vec2(program, "atlas_size", atlas_size);

        // Three mat3 columns, then cell and size; depth stays unbound.
        let wmat = offset_of!(Sprite, wmat);
        backend.bind_vertex_layout(
            program,
            size_of::<Sprite>(),
            &[
                VertexAttrib { name: "wmat1", components: 3, offset: wmat },
                VertexAttrib { name: "wmat2", components: 3, offset: wmat + 12 },
                VertexAttrib { name: "wmat3", components: 3, offset: wmat + 24 },
                VertexAttrib { name: "cell", components: 2, offset: offset_of!(Sprite, cell) },
                VertexAttrib { name: "size", components: 2, offset: offset_of!(Sprite, size) },
            ],
        );

        tracing::debug!(program, atlas = ?assets.atlas, "sprite system initialized");
        Ok(Self {
            pool: DensePool::new(),
            program,
            atlas: assets.atlas.clone(),
        })
    }

    /// Track `entity` with a default sprite. Idempotent.
    ///
    /// A sprite without positional data is meaningless, so the entity
    /// gains a default transform if it does not already have one.
    pub fn add(&mut self, entity: Entity, transforms: &mut TransformSystem) {
        if self.pool.contains(entity) {
            return; // already has a sprite
        }
        transforms.add(entity);
        self.pool.add(entity);
    }

    /// Stop tracking `entity`. Sprite storage only; the transform stays.
    /// Idempotent.
    pub fn remove(&mut self, entity: Entity) {
        self.pool.remove(entity);
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.pool.contains(entity)
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Live entities in current storage order. After [`Self::draw_all`]
    /// this is the draw order.
    pub fn entities(&self) -> &[Entity] {
        self.pool.entities()
    }

    fn record(&self, entity: Entity) -> &Sprite {
        self.pool.get(entity).expect("entity has no sprite")
    }

    fn record_mut(&mut self, entity: Entity) -> &mut Sprite {
        self.pool.get_mut(entity).expect("entity has no sprite")
    }

    pub fn set_cell(&mut self, entity: Entity, cell: Vec2) {
        self.record_mut(entity).cell = cell;
    }

    pub fn cell(&self, entity: Entity) -> Vec2 {
        self.record(entity).cell
    }

    pub fn set_size(&mut self, entity: Entity, size: Vec2) {
        self.record_mut(entity).size = size;
    }

    pub fn size(&self, entity: Entity) -> Vec2 {
        self.record(entity).size
    }

    pub fn set_depth(&mut self, entity: Entity, depth: i32) {
        self.record_mut(entity).depth = depth;
    }

    pub fn depth(&self, entity: Entity) -> i32 {
        self.record(entity).depth
    }

    /// Per-frame update, before draw: sweep destroyed entities, refresh
    /// every sprite's world-matrix copy from the transform cache, and in
    /// edit mode report the local unit bbox for every sprite.
    pub fn update_all<R: EntityRegistry + ?Sized>(
        &mut self,
        registry: &R,
        transforms: &TransformSystem,
        overlay: &mut dyn EditOverlay,
    ) {
        self.pool.remove_destroyed(registry, |entity, _| {
            tracing::trace!(entity = entity.id(), "dropped sprite of destroyed entity");
        });

        for (entity, sprite) in self.pool.iter_mut() {
            sprite.wmat = transforms.world_matrix(entity);
        }

        if overlay.is_enabled() {
            for &entity in self.pool.entities() {
                overlay.report_bbox(entity, Bbox::unit());
            }
        }
    }

    /// Per-frame draw: depth-sort, then stream the whole live record array
    /// as one point-primitive draw call.
    ///
    /// Order is fully deterministic: depth descending, ties broken by
    /// entity handle ascending.
    pub fn draw_all(&mut self, backend: &mut dyn RenderBackend, camera: &Camera) {
        self.pool
            .sort_by(|ea, a, eb, b| b.depth.cmp(&a.depth).then(ea.cmp(&eb)));

        backend.use_program(self.program);
        backend.set_uniform_mat3(
            self.program,
            "inverse_view_matrix",
            &camera.inverse_view_matrix(),
        );
        backend.bind_texture(&self.atlas);

        backend.buffer_vertices(bytemuck::cast_slice(self.pool.as_slice()));
        backend.draw_points(self.pool.len() as u32);
    }

    /// Persist live sprites in storage order, skipping entities the filter
    /// rejects. Marker-terminated record stream: entity, world matrix,
    /// cell, size. Depth is not part of the wire format.
    pub fn save_all<W: Write, F: SaveFilter + ?Sized>(
        &self,
        writer: &mut SnapshotWriter<W>,
        filter: &F,
    ) -> Result<(), SnapshotError> {
        let mut count = 0usize;
        for (entity, sprite) in self.pool.iter() {
            if !filter.should_save(entity) {
                continue;
            }
            writer.loop_continue()?;
            writer.write_entity(entity)?;
            writer.write_mat3(&sprite.wmat)?;
            writer.write_vec2(sprite.cell)?;
            writer.write_vec2(sprite.size)?;
            count += 1;
        }
        writer.loop_end()?;
        tracing::debug!(count, "saved sprites");
        Ok(())
    }

    /// Restore from a snapshot, clearing prior sprites first. Each loaded
    /// sprite re-ensures its backing transform; its stored world matrix is
    /// restored verbatim, so it draws identically before its transform is
    /// next touched.
    pub fn load_all<R: Read>(
        &mut self,
        reader: &mut SnapshotReader<R>,
        transforms: &mut TransformSystem,
    ) -> Result<(), SnapshotError> {
        self.pool.clear();
        while reader.loop_next()? {
            let entity = reader.read_entity()?;
            transforms.add(entity);
            let sprite = self.pool.add(entity);
            sprite.wmat = reader.read_mat3()?;
            sprite.cell = reader.read_vec2()?;
            sprite.size = reader.read_vec2()?;
        }
        tracing::debug!(count = self.pool.len(), "loaded sprites");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Command, HeadlessBackend};
    use std::collections::HashSet;
    use std::io::Cursor;

    struct Destroyed(HashSet<Entity>);

    impl EntityRegistry for Destroyed {
        fn is_destroyed(&self, entity: Entity) -> bool {
            self.0.contains(&entity)
        }
    }

    fn nothing_destroyed() -> Destroyed {
        Destroyed(HashSet::new())
    }

    struct SkipSet(HashSet<Entity>);

    impl SaveFilter for SkipSet {
        fn should_save(&self, entity: Entity) -> bool {
            !self.0.contains(&entity)
        }
    }

    #[derive(Default)]
    struct RecordingOverlay {
        enabled: bool,
        reported: Vec<(Entity, Bbox)>,
    }

    impl EditOverlay for RecordingOverlay {
        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn report_bbox(&mut self, entity: Entity, bbox: Bbox) {
            self.reported.push((entity, bbox));
        }
    }

    fn e(id: u32) -> Entity {
        Entity::from_raw(id)
    }

    fn new_system(backend: &mut HeadlessBackend) -> SpriteSystem {
        let assets = SpriteAssets::from_data_dir(Path::new("data"));
        SpriteSystem::new(backend, &assets).unwrap()
    }

    #[test]
    fn add_applies_defaults_and_backing_transform() {
        let mut backend = HeadlessBackend::new();
        let mut sprites = new_system(&mut backend);
        let mut transforms = TransformSystem::new();

        sprites.add(e(1), &mut transforms);

        assert!(transforms.contains(e(1)));
        assert_eq!(sprites.cell(e(1)), Vec2::new(32.0, 32.0));
        assert_eq!(sprites.size(e(1)), Vec2::new(32.0, 32.0));
        assert_eq!(sprites.depth(e(1)), 0);
    }

    #[test]
    fn add_is_idempotent() {
        let mut backend = HeadlessBackend::new();
        let mut sprites = new_system(&mut backend);
        let mut transforms = TransformSystem::new();

        sprites.add(e(1), &mut transforms);
        sprites.set_depth(e(1), 9);
        sprites.add(e(1), &mut transforms);

        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites.depth(e(1)), 9);
    }

    #[test]
    #[should_panic(expected = "entity has no sprite")]
    fn accessor_without_sprite_panics() {
        let mut backend = HeadlessBackend::new();
        let sprites = new_system(&mut backend);
        sprites.cell(e(1));
    }

    #[test]
    fn remove_keeps_the_transform() {
        let mut backend = HeadlessBackend::new();
        let mut sprites = new_system(&mut backend);
        let mut transforms = TransformSystem::new();

        sprites.add(e(1), &mut transforms);
        sprites.remove(e(1));
        sprites.remove(e(1)); // second removal is a no-op

        assert!(!sprites.contains(e(1)));
        assert!(transforms.contains(e(1)));
    }

    #[test]
    fn update_copies_the_world_matrix() {
        let mut backend = HeadlessBackend::new();
        let mut sprites = new_system(&mut backend);
        let mut transforms = TransformSystem::new();

        sprites.add(e(1), &mut transforms);
        transforms.translate(e(1), Vec2::new(3.0, 4.0));
        sprites.update_all(&nothing_destroyed(), &transforms, &mut ());

        let copied = sprites.record(e(1)).wmat;
        assert_eq!(
            copied.to_cols_array(),
            transforms.world_matrix(e(1)).to_cols_array()
        );
    }

    #[test]
    fn depth_sort_breaks_ties_by_entity() {
        let mut backend = HeadlessBackend::new();
        let mut sprites = new_system(&mut backend);
        let mut transforms = TransformSystem::new();
        let camera = Camera::new();

        // insert out of handle order to make the tie-break do the work
        sprites.add(e(2), &mut transforms);
        sprites.add(e(1), &mut transforms);
        sprites.set_depth(e(1), 5);
        sprites.set_depth(e(2), 5);

        sprites.draw_all(&mut backend, &camera);
        assert_eq!(sprites.entities(), &[e(1), e(2)]);

        sprites.set_depth(e(2), 10);
        sprites.draw_all(&mut backend, &camera);
        assert_eq!(sprites.entities(), &[e(2), e(1)]);

        // repeated sorts with no mutation keep the order
        sprites.draw_all(&mut backend, &camera);
        assert_eq!(sprites.entities(), &[e(2), e(1)]);
    }

    #[test]
    fn draw_is_one_batched_call() {
        let mut backend = HeadlessBackend::new();
        let mut sprites = new_system(&mut backend);
        let mut transforms = TransformSystem::new();
        let camera = Camera::new();

        for id in 1..=3 {
            sprites.add(e(id), &mut transforms);
        }

        backend.clear_commands();
        sprites.draw_all(&mut backend, &camera);

        let draws: Vec<&Command> = backend
            .commands()
            .iter()
            .filter(|cmd| matches!(cmd, Command::DrawPoints { .. }))
            .collect();
        assert_eq!(draws, vec![&Command::DrawPoints { count: 3 }]);

        let uploads: Vec<&Command> = backend
            .commands()
            .iter()
            .filter(|cmd| matches!(cmd, Command::BufferVertices { .. }))
            .collect();
        assert_eq!(
            uploads,
            vec![&Command::BufferVertices {
                bytes: 3 * size_of::<Sprite>()
            }]
        );
    }

    #[test]
    fn destroyed_entities_drop_out_of_the_draw() {
        let mut backend = HeadlessBackend::new();
        let mut sprites = new_system(&mut backend);
        let mut transforms = TransformSystem::new();
        let camera = Camera::new();

        for id in 1..=3 {
            sprites.add(e(id), &mut transforms);
        }
        let registry = Destroyed([e(2)].into_iter().collect());
        transforms.update_all(&registry);
        sprites.update_all(&registry, &transforms, &mut ());

        sprites.draw_all(&mut backend, &camera);
        assert_eq!(sprites.entities(), &[e(1), e(3)]);
    }

    #[test]
    fn bboxes_reported_only_in_edit_mode() {
        let mut backend = HeadlessBackend::new();
        let mut sprites = new_system(&mut backend);
        let mut transforms = TransformSystem::new();

        sprites.add(e(1), &mut transforms);
        sprites.add(e(2), &mut transforms);

        let mut overlay = RecordingOverlay::default();
        sprites.update_all(&nothing_destroyed(), &transforms, &mut overlay);
        assert!(overlay.reported.is_empty());

        overlay.enabled = true;
        sprites.update_all(&nothing_destroyed(), &transforms, &mut overlay);
        assert_eq!(overlay.reported.len(), 2);
        assert!(overlay
            .reported
            .iter()
            .all(|(_, bbox)| *bbox == Bbox::unit()));
    }

    #[test]
    fn save_load_roundtrip_honors_the_filter() {
        let mut backend = HeadlessBackend::new();
        let mut sprites = new_system(&mut backend);
        let mut transforms = TransformSystem::new();

        for id in 1..=3 {
            sprites.add(e(id), &mut transforms);
        }
        transforms.translate(e(1), Vec2::new(3.0, 4.0));
        sprites.set_cell(e(1), Vec2::new(0.0, 64.0));
        sprites.set_size(e(3), Vec2::new(16.0, 48.0));
        sprites.update_all(&nothing_destroyed(), &transforms, &mut ());

        let saved_wmat = sprites.record(e(1)).wmat.to_cols_array();

        let mut writer = SnapshotWriter::new(Vec::new());
        let filter = SkipSet([e(2)].into_iter().collect());
        sprites.save_all(&mut writer, &filter).unwrap();

        let mut restored = new_system(&mut backend);
        let mut fresh_transforms = TransformSystem::new();
        let mut reader = SnapshotReader::new(Cursor::new(writer.into_inner()));
        restored
            .load_all(&mut reader, &mut fresh_transforms)
            .unwrap();

        assert_eq!(restored.len(), 2);
        assert!(restored.contains(e(1)));
        assert!(!restored.contains(e(2))); // filtered out of the save
        assert!(restored.contains(e(3)));
        assert!(fresh_transforms.contains(e(1)));

        // stored world matrix restored verbatim, before any transform touch
        assert_eq!(restored.record(e(1)).wmat.to_cols_array(), saved_wmat);
        assert_eq!(restored.cell(e(1)), Vec2::new(0.0, 64.0));
        assert_eq!(restored.size(e(3)), Vec2::new(16.0, 48.0));
        // depth is not persisted; it resets to the default
        assert_eq!(restored.depth(e(1)), 0);
    }

    #[test]
    fn init_binds_the_record_layout() {
        let mut backend = HeadlessBackend::new();
        let _sprites = new_system(&mut backend);

        let layout = backend.commands().iter().find_map(|cmd| match cmd {
            Command::BindVertexLayout { stride, attribs, .. } => Some((*stride, attribs.clone())),
            _ => None,
        });
        let (stride, attribs) = layout.expect("vertex layout bound at init");
        assert_eq!(stride, size_of::<Sprite>());
        let names: Vec<&str> = attribs.iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["wmat1", "wmat2", "wmat3", "cell", "size"]);
    }
}
