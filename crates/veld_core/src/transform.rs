//! Transform component system
//!
//! Each entity with a transform owns local position/rotation/scale plus a
//! cached world matrix. The cache is maintained eagerly: every mutator
//! recomputes it before returning, so readers (the sprite system reads it
//! once per sprite per frame) never recompute and never observe stale
//! data.

use crate::entity::{Entity, EntityRegistry};
use crate::math::{scale_rotation_translation, Mat3, Vec2};
use crate::snapshot::{SnapshotError, SnapshotReader, SnapshotWriter};
use crate::storage::SparseMap;
use std::io::{Read, Write};

/// Per-entity transform record.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    world: Mat3, // cached; updated by every mutator
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            world: Mat3::IDENTITY,
        }
    }
}

impl Transform {
    fn refresh_cache(&mut self) {
        self.world = scale_rotation_translation(self.scale, self.rotation, self.position);
    }
}

/// Owns one [`Transform`] per tracked entity.
///
/// Records live in a [`SparseMap`], so adding entities never relocates
/// existing records. Accessing an entity without a transform is a
/// programming error and panics; adding or removing twice is a silent
/// no-op.
pub struct TransformSystem {
    map: SparseMap<Transform>,
}

impl TransformSystem {
    pub fn new() -> Self {
        Self {
            map: SparseMap::new(),
        }
    }

    /// Track `entity` with a default transform (position 0, rotation 0,
    /// scale 1). Idempotent.
    pub fn add(&mut self, entity: Entity) {
        if self.map.get(entity).is_some() {
            return; // already has a transform
        }
        self.map.set(entity, Some(Box::new(Transform::default())));
    }

    /// Stop tracking `entity`, dropping its record. Idempotent.
    pub fn remove(&mut self, entity: Entity) {
        self.map.set(entity, None);
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.map.get(entity).is_some()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn record(&self, entity: Entity) -> &Transform {
        self.map.get(entity).expect("entity has no transform")
    }

    fn record_mut(&mut self, entity: Entity) -> &mut Transform {
        self.map.get_mut(entity).expect("entity has no transform")
    }

    pub fn set_position(&mut self, entity: Entity, position: Vec2) {
        let t = self.record_mut(entity);
        t.position = position;
        t.refresh_cache();
    }

    pub fn position(&self, entity: Entity) -> Vec2 {
        self.record(entity).position
    }

    pub fn translate(&mut self, entity: Entity, delta: Vec2) {
        let t = self.record_mut(entity);
        t.position += delta;
        t.refresh_cache();
    }

    pub fn set_rotation(&mut self, entity: Entity, rotation: f32) {
        let t = self.record_mut(entity);
        t.rotation = rotation;
        t.refresh_cache();
    }

    pub fn rotation(&self, entity: Entity) -> f32 {
        self.record(entity).rotation
    }

    pub fn rotate(&mut self, entity: Entity, delta: f32) {
        let t = self.record_mut(entity);
        t.rotation += delta;
        t.refresh_cache();
    }

    pub fn set_scale(&mut self, entity: Entity, scale: Vec2) {
        let t = self.record_mut(entity);
        t.scale = scale;
        t.refresh_cache();
    }

    pub fn scale(&self, entity: Entity) -> Vec2 {
        self.record(entity).scale
    }

    /// The cached world matrix. A pure read; never recomputes.
    pub fn world_matrix(&self, entity: Entity) -> Mat3 {
        self.record(entity).world
    }

    /// Per-frame maintenance: drop transforms of destroyed entities.
    ///
    /// Must run once per frame before other systems read handles, since
    /// this is the only place transform cleanup is tied to the entity
    /// lifecycle.
    pub fn update_all<R: EntityRegistry + ?Sized>(&mut self, registry: &R) {
        let dead: Vec<Entity> = self
            .map
            .iter()
            .map(|(entity, _)| entity)
            .filter(|&entity| registry.is_destroyed(entity))
            .collect();
        for entity in dead {
            self.remove(entity);
        }
    }

    /// Persist every live transform: a count, then per record the entity
    /// handle, position, rotation, scale and the cached world matrix. The
    /// cache goes to disk verbatim so load restores it bit-for-bit instead
    /// of re-deriving it.
    pub fn save_all<W: Write>(&self, writer: &mut SnapshotWriter<W>) -> Result<(), SnapshotError> {
        writer.write_u32(self.map.len() as u32)?;
        for (entity, t) in self.map.iter() {
            writer.write_entity(entity)?;
            writer.write_vec2(t.position)?;
            writer.write_f32(t.rotation)?;
            writer.write_vec2(t.scale)?;
            writer.write_mat3(&t.world)?;
        }
        tracing::debug!(count = self.map.len(), "saved transforms");
        Ok(())
    }

    /// Restore from a snapshot, clearing all prior state first.
    pub fn load_all<R: Read>(&mut self, reader: &mut SnapshotReader<R>) -> Result<(), SnapshotError> {
        self.map.clear();
        let count = reader.read_u32()?;
        for _ in 0..count {
            let entity = reader.read_entity()?;
            let position = reader.read_vec2()?;
            let rotation = reader.read_f32()?;
            let scale = reader.read_vec2()?;
            let world = reader.read_mat3()?;
            self.map.set(
                entity,
                Some(Box::new(Transform {
                    position,
                    rotation,
                    scale,
                    world,
                })),
            );
        }
        tracing::debug!(count, "loaded transforms");
        Ok(())
    }
}

impl Default for TransformSystem {
    fn default() -> Self {
        Self::new()
    }
}
