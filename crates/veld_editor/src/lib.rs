//! Veld Editor
//!
//! The in-engine editing overlay: a global edit-mode flag and the
//! per-entity bounding-box collector the component systems report into
//! while edit mode is on.

pub mod overlay;

pub use overlay::OverlayState;
