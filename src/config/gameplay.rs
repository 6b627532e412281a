use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Distance moved per frame per held key.
    pub move_speed: f32,
    pub start_position: [f32; 3],
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.1,
            start_position: [0.0, 0.0, 2.0],
        }
    }
}
