use crate::render::camera::AspectMode;
use crate::render::mesh::SceneKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f32; 4],
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Uniform scale offset applied in the vertex stage (0 = unit size).
    pub scale: f32,
    pub aspect_mode: AspectMode,
    /// Abort on shader compile/link errors. When off, the window stays open
    /// and frames are only cleared.
    pub strict_shaders: bool,
    /// Frame rate cap. Unset leaves pacing to vsync.
    pub target_fps: Option<u32>,
    pub scene: SceneKind,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.07, 0.13, 0.17, 1.0],
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            scale: 0.0,
            aspect_mode: AspectMode::Exact,
            strict_shaders: true,
            target_fps: None,
            scene: SceneKind::Cube,
        }
    }
}
