use egui::{Pos2, Rect};
use glam::Vec3;

use super::camera::ArcBallCamera;
use super::picking::{PickResult, PickingEngine};
use crate::annotation::SceneHost;

/// Scene host backed by the arc-ball camera, the viewport rect and the picking engine.
pub struct ViewportHost<'a> {
    pub camera: &'a ArcBallCamera,
    pub rect: Rect,
    pub picking: &'a PickingEngine,
}

impl<'a> ViewportHost<'a> {
    pub fn new(camera: &'a ArcBallCamera, rect: Rect, picking: &'a PickingEngine) -> Self {
        Self {
            camera,
            rect,
            picking,
        }
    }
}

impl SceneHost for ViewportHost<'_> {
    fn project(&self, point: Vec3) -> Option<Pos2> {
        self.camera.project(point, self.rect)
    }

    fn cast_ray(&self, pixel: Pos2) -> PickResult {
        if !self.rect.contains(pixel) {
            return PickResult::Miss;
        }
        self.picking.pick(&self.camera.screen_ray(pixel, self.rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::demo_specimen;
    use std::sync::Arc;

    fn rect() -> Rect {
        Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0))
    }

    #[test]
    fn test_center_pixel_hits_specimen() {
        let camera = ArcBallCamera::new();
        let mut picking = PickingEngine::new();
        picking.attach(Arc::new(demo_specimen()));
        let host = ViewportHost::new(&camera, rect(), &picking);

        let hit = host.cast_ray(rect().center()).hit().unwrap();
        // the hit point projects back onto the clicked pixel
        let back = host.project(hit.point).unwrap();
        assert!((back - rect().center()).length() < 0.5);
    }

    #[test]
    fn test_corner_pixel_misses() {
        let camera = ArcBallCamera::new();
        let mut picking = PickingEngine::new();
        picking.attach(Arc::new(demo_specimen()));
        let host = ViewportHost::new(&camera, rect(), &picking);
        assert_eq!(host.cast_ray(Pos2::new(2.0, 2.0)), PickResult::Miss);
    }

    #[test]
    fn test_outside_rect_is_miss() {
        let camera = ArcBallCamera::new();
        let picking = PickingEngine::new();
        let host = ViewportHost::new(&camera, rect(), &picking);
        assert_eq!(host.cast_ray(Pos2::new(-5.0, 10.0)), PickResult::Miss);
        assert_eq!(host.cast_ray(Pos2::new(5.0, 10.0)), PickResult::ModelNotReady);
    }
}
