//! Veld Engine Core
//!
//! Contains the entity-component backbone of the 2D scene:
//! - Generic per-entity storage (dense pool, sparse map)
//! - Transform system with a cached world matrix
//! - Binary snapshot protocol
//! - Fixed tick clock

pub mod entity;
pub mod math;
pub mod snapshot;
pub mod storage;
pub mod time;
pub mod transform;

pub use glam;

pub use entity::{EditOverlay, Entity, EntityRegistry, SaveFilter};
pub use storage::{DensePool, SparseMap};
pub use transform::{Transform, TransformSystem};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
