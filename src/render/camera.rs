use crate::player::input::{MoveKey, MovementInput};
use crate::render::shaders::ShaderProgram;
use crate::utils::error::Result;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// How the projection aspect ratio is derived from the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectMode {
    /// `width / height` in floating point.
    #[default]
    Exact,
    /// `width / height` in integer arithmetic, as older builds computed it.
    Truncated,
}

/// Free-flying camera with a fixed look direction.
///
/// There is no mouse look: `orientation` only changes when assigned.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Vec3,
    pub up: Vec3,
    pub width: u32,
    pub height: u32,
    pub speed: f32,
    pub aspect_mode: AspectMode,
}

impl Camera {
    pub fn new(width: u32, height: u32, position: Vec3) -> Self {
        Self {
            position,
            orientation: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            width,
            height,
            speed: 0.1,
            aspect_mode: AspectMode::Exact,
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn aspect_ratio(&self) -> f32 {
        let height = self.height.max(1);
        match self.aspect_mode {
            AspectMode::Exact => self.width as f32 / height as f32,
            AspectMode::Truncated => (self.width / height) as f32,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.orientation, self.up)
    }

    pub fn projection_matrix(&self, fov_degrees: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh_gl(fov_degrees.to_radians(), self.aspect_ratio(), near, far)
    }

    /// `projection * view`, recomputed on every call.
    pub fn view_projection(&self, fov_degrees: f32, near: f32, far: f32) -> Mat4 {
        self.projection_matrix(fov_degrees, near, far) * self.view_matrix()
    }

    /// Writes [`view_projection`](Self::view_projection) into the matrix
    /// uniform `uniform` of the active `shader`.
    pub fn matrix(
        &self,
        fov_degrees: f32,
        near: f32,
        far: f32,
        shader: &ShaderProgram,
        uniform: &str,
    ) -> Result<()> {
        shader.set_mat4(uniform, &self.view_projection(fov_degrees, near, far))
    }

    /// Moves `speed` units along each held direction. Keys add up, so
    /// diagonal movement is faster than straight movement.
    pub fn apply_input(&mut self, input: &MovementInput) {
        let right = self.orientation.cross(self.up).normalize();

        if input.is_pressed(MoveKey::Forward) {
            self.position += self.speed * self.orientation;
        }
        if input.is_pressed(MoveKey::Left) {
            self.position += self.speed * -right;
        }
        if input.is_pressed(MoveKey::Backward) {
            self.position += self.speed * -self.orientation;
        }
        if input.is_pressed(MoveKey::Right) {
            self.position += self.speed * right;
        }
    }
}
