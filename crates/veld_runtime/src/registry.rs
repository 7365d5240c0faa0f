//! Demo entity registry
//!
//! The engine core treats entity identity as external; this is the
//! runtime's concrete registry. Destruction only flags the entity - each
//! component system sweeps its own records on its next update.

use std::collections::HashSet;
use veld_core::entity::{Entity, EntityRegistry, SaveFilter};

pub struct GameRegistry {
    next_id: u32,
    destroyed: HashSet<Entity>,
    transient: HashSet<Entity>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            destroyed: HashSet::new(),
            transient: HashSet::new(),
        }
    }

    pub fn spawn(&mut self) -> Entity {
        let entity = Entity::from_raw(self.next_id);
        self.next_id += 1;
        entity
    }

    /// Flag `entity` destroyed. Component records linger until each
    /// system's next per-frame update.
    pub fn destroy(&mut self, entity: Entity) {
        self.destroyed.insert(entity);
    }

    /// Exclude `entity` from snapshots (effects, debug helpers...).
    pub fn mark_transient(&mut self, entity: Entity) {
        self.transient.insert(entity);
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry for GameRegistry {
    fn is_destroyed(&self, entity: Entity) -> bool {
        self.destroyed.contains(&entity)
    }
}

impl SaveFilter for GameRegistry {
    fn should_save(&self, entity: Entity) -> bool {
        !self.transient.contains(&entity)
    }
}
