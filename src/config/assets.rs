use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Vertex stage source; the built-in shader is used when unset.
    pub vertex_shader: Option<PathBuf>,
    /// Fragment stage source; the built-in shader is used when unset.
    pub fragment_shader: Option<PathBuf>,
    pub texture: PathBuf,
    pub texture_unit: u32,
    pub atlas_columns: u32,
    pub atlas_rows: u32,
    /// Atlas tile drawn on the mesh, as `[column, row]` from the top left.
    pub atlas_tile: [u32; 2],
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            vertex_shader: Some(PathBuf::from("assets/shaders/default.vert")),
            fragment_shader: Some(PathBuf::from("assets/shaders/default.frag")),
            texture: PathBuf::from("assets/textures/atlas.png"),
            texture_unit: 0,
            atlas_columns: 4,
            atlas_rows: 4,
            atlas_tile: [0, 0],
        }
    }
}
