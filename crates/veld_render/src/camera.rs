//! Shared 2D camera
//!
//! One camera per scene. The inverse view matrix is cached with the same
//! discipline as the transform cache: every mutator recomputes it before
//! returning, so the per-draw accessor is a pure read.

use veld_core::math::{scale_rotation_translation, Mat3, Vec2};

pub struct Camera {
    position: Vec2,
    rotation: f32,
    zoom: f32,
    inverse_view: Mat3, // cached; updated by every mutator
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            zoom: 1.0,
            inverse_view: Mat3::IDENTITY,
        }
    }

    fn refresh_cache(&mut self) {
        let view = scale_rotation_translation(Vec2::splat(self.zoom), self.rotation, self.position);
        self.inverse_view = view.inverse();
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.refresh_cache();
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
        self.refresh_cache();
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
        self.refresh_cache();
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// The cached inverse view matrix. A pure read; never recomputes.
    pub fn inverse_view_matrix(&self) -> Mat3 {
        self.inverse_view
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
