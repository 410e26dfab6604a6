use glam::{Mat4, Vec3};

use crate::render::CameraParams;

/// Fixed look-at camera hovering behind and above the board.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Places the camera above and behind `target` at roughly the classic
    /// board-game angle, scaled by how large the board is.
    pub fn overlooking(target: Vec3, distance: f32) -> Self {
        Self {
            position: target + Vec3::new(0.0, 0.55, 0.83) * distance,
            target,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }

    /// View-projection parameters for the renderer's global uniform.
    pub fn params(&self, aspect: f32) -> CameraParams {
        let view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        let projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            aspect.max(0.01),
            self.near,
            self.far,
        );
        CameraParams {
            view_proj: projection * view,
            position: self.position,
        }
    }
}
