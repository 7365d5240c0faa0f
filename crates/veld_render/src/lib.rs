//! Veld Render System
//!
//! The render-facing half of the scene: the backend capability surface the
//! sprite pipeline draws through, the shared 2D camera, and the sprite
//! system itself (per-frame matrix refresh, depth sort, one batched draw).

pub mod backend;
pub mod camera;
pub mod sprite;

pub use backend::{BackendError, Command, HeadlessBackend, RenderBackend, VertexAttrib};
pub use camera::Camera;
pub use sprite::{Sprite, SpriteAssets, SpriteSystem};
