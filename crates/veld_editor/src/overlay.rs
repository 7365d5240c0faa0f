//! Edit-mode overlay state
//!
//! Collects the local-space bounding boxes the component systems report
//! each frame while edit mode is enabled. The editor's selection and
//! gizmo drawing read the collected boxes after the update phase.

use std::collections::HashMap;
use veld_core::entity::{EditOverlay, Entity};
use veld_core::math::Bbox;

/// Edit-mode flag plus the per-frame bbox collection.
#[derive(Default)]
pub struct OverlayState {
    enabled: bool,
    boxes: HashMap<Entity, Bbox>,
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.boxes.clear();
        }
    }

    /// Forget last frame's boxes. Call at the top of each frame so stale
    /// entries from removed entities don't linger.
    pub fn begin_frame(&mut self) {
        self.boxes.clear();
    }

    pub fn bbox(&self, entity: Entity) -> Option<Bbox> {
        self.boxes.get(&entity).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, Bbox)> + '_ {
        self.boxes.iter().map(|(&entity, &bbox)| (entity, bbox))
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl EditOverlay for OverlayState {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Repeated reports for the same entity within a frame merge into one
    /// box covering them all.
    fn report_bbox(&mut self, entity: Entity, bbox: Bbox) {
        self.boxes
            .entry(entity)
            .and_modify(|existing| *existing = existing.merge(bbox))
            .or_insert(bbox);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veld_core::math::Vec2;

    fn e(id: u32) -> Entity {
        Entity::from_raw(id)
    }

    #[test]
    fn disabled_by_default() {
        let overlay = OverlayState::new();
        assert!(!overlay.is_enabled());
        assert!(overlay.is_empty());
    }

    #[test]
    fn collects_reported_boxes() {
        let mut overlay = OverlayState::new();
        overlay.set_enabled(true);
        overlay.report_bbox(e(1), Bbox::unit());
        assert_eq!(overlay.bbox(e(1)), Some(Bbox::unit()));
        assert_eq!(overlay.len(), 1);
    }

    #[test]
    fn repeated_reports_merge() {
        let mut overlay = OverlayState::new();
        overlay.set_enabled(true);
        overlay.report_bbox(e(1), Bbox::unit());
        overlay.report_bbox(e(1), Bbox::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0)));

        let merged = overlay.bbox(e(1)).unwrap();
        assert_eq!(merged.min, Vec2::new(-0.5, -0.5));
        assert_eq!(merged.max, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn begin_frame_resets_collection() {
        let mut overlay = OverlayState::new();
        overlay.set_enabled(true);
        overlay.report_bbox(e(1), Bbox::unit());
        overlay.begin_frame();
        assert!(overlay.is_empty());
        assert!(overlay.is_enabled());
    }

    #[test]
    fn disabling_clears_collection() {
        let mut overlay = OverlayState::new();
        overlay.set_enabled(true);
        overlay.report_bbox(e(1), Bbox::unit());
        overlay.set_enabled(false);
        assert!(overlay.is_empty());
    }
}
