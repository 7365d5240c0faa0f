//! 2D math utilities
//!
//! Re-exports glam with the affine helpers the component systems need.

pub use glam::{Mat3, Vec2, Vec3};

/// Compose the affine world matrix from scale, rotation (radians) and
/// translation, in that application order.
///
/// This is the single source of truth for the transform cache: every
/// transform mutator recomputes its cached matrix through this function.
pub fn scale_rotation_translation(scale: Vec2, rotation: f32, position: Vec2) -> Mat3 {
    Mat3::from_scale_angle_translation(scale, rotation, position)
}

/// Axis-aligned bounding box in local space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bbox {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bbox {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// The unit quad centered on the origin: corners (-0.5,-0.5)..(0.5,0.5).
    pub fn unit() -> Self {
        Self::new(Vec2::new(-0.5, -0.5), Vec2::new(0.5, 0.5))
    }

    /// Smallest box containing both `self` and `other`.
    pub fn merge(self, other: Bbox) -> Bbox {
        Bbox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}
