use glam::{Mat4, Vec3, Vec4};

use super::picking::{Aabb, Ray};

/// Direction from the model center to the camera after a model is framed
pub const FRAMING_DIRECTION: Vec3 = Vec3::new(0.6, 0.4, 0.6);

/// Arc-ball camera for 3D viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    /// Orbit distance limits
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBallCamera {
    pub fn new() -> Self {
        let mut camera = Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 0.0,
            target: Vec3::ZERO,
            fov: 75.0_f32.to_radians(),
            min_distance: 2.0,
            max_distance: 20.0,
        };
        camera.look_from(FRAMING_DIRECTION * 12.0, Vec3::ZERO);
        camera
    }

    pub fn with_limits(mut self, min_distance: f32, max_distance: f32) -> Self {
        self.min_distance = min_distance.min(max_distance);
        self.max_distance = max_distance.max(min_distance);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self
    }

    /// Place the eye at `offset` from `target`, keeping the orbit limits.
    pub fn look_from(&mut self, offset: Vec3, target: Vec3) {
        let len = offset.length();
        if len <= f32::EPSILON {
            return;
        }
        self.target = target;
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = (offset.y / len).asin().clamp(-1.5, 1.5);
        self.distance = len.clamp(self.min_distance, self.max_distance);
    }

    /// Aim at the center of `bounds` from the standard framing direction,
    /// scaled by the model's largest dimension.
    pub fn frame_model(&mut self, bounds: &Aabb) {
        let extent = bounds.max_extent();
        if extent <= f32::EPSILON {
            return;
        }
        self.look_from(FRAMING_DIRECTION * extent, bounds.center());
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(self.min_distance, self.max_distance);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right_vector();
        let up = self.up_vector();
        let offset = right * dx + up * dy;
        self.target += offset;
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, 0.1, 1000.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    pub fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    pub fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a 3D point to 2D screen coords
    pub fn project(&self, point: Vec3, rect: egui::Rect) -> Option<egui::Pos2> {
        let aspect = rect.width() / rect.height();
        let vp = self.view_projection(aspect);
        let p = vp * Vec4::new(point.x, point.y, point.z, 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let screen_x = rect.center().x + ndc.x * rect.width() * 0.5;
        let screen_y = rect.center().y - ndc.y * rect.height() * 0.5;
        Some(egui::pos2(screen_x, screen_y))
    }

    /// Cast a ray from a screen position into the 3D scene
    pub fn screen_ray(&self, screen_pos: egui::Pos2, rect: egui::Rect) -> Ray {
        let aspect = rect.width() / rect.height();

        // Screen → NDC
        let ndc_x = (screen_pos.x - rect.center().x) / (rect.width() * 0.5);
        let ndc_y = -(screen_pos.y - rect.center().y) / (rect.height() * 0.5);

        let vp_inv = self.view_projection(aspect).inverse();

        let near_world = vp_inv * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.eye_position(),
            direction: (far - near).normalize_or_zero(),
        }
    }
}
