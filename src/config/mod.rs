pub mod assets;
pub mod gameplay;
pub mod rendering;
pub mod window;

pub use assets::AssetConfig;
pub use gameplay::GameplayConfig;
pub use rendering::RenderConfig;
pub use window::WindowConfig;

use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// File looked up in the working directory when no path is given.
pub const CONFIG_FILE: &str = "mynecraft.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub gameplay: GameplayConfig,
    pub assets: AssetConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            render: RenderConfig::default(),
            gameplay: GameplayConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads `explicit` if given, otherwise the first existing file among
    /// [`search_paths`](Self::search_paths), otherwise the defaults.
    /// Returns the file that was used, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }

        for path in Self::search_paths() {
            if path.is_file() {
                let config = Self::from_file(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dirs) = ProjectDirs::from("com", "mynecraft", "Mynecraft") {
            paths.push(dirs.config_dir().join("config.toml"));
        }
        paths
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", self.log_level)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        self.level_filter()?;

        if self.window.width == 0 || self.window.height == 0 {
            return invalid(format!(
                "window size {}x{} must be non-zero",
                self.window.width, self.window.height
            ));
        }

        let render = &self.render;
        if !(render.fov > 0.0 && render.fov < 180.0) {
            return invalid(format!("fov {} must be within (0, 180) degrees", render.fov));
        }
        if !(render.near > 0.0 && render.far > render.near) {
            return invalid(format!(
                "clip planes near={} far={} must satisfy 0 < near < far",
                render.near, render.far
            ));
        }
        if render.target_fps == Some(0) {
            return invalid("target_fps must be positive".to_string());
        }

        if !self.gameplay.move_speed.is_finite() {
            return invalid("move_speed must be finite".to_string());
        }

        let assets = &self.assets;
        if assets.atlas_columns == 0 || assets.atlas_rows == 0 {
            return invalid("atlas must have at least one column and one row".to_string());
        }
        let [column, row] = assets.atlas_tile;
        if column >= assets.atlas_columns || row >= assets.atlas_rows {
            return invalid(format!(
                "atlas tile [{column}, {row}] outside a {}x{} atlas",
                assets.atlas_columns, assets.atlas_rows
            ));
        }

        Ok(())
    }
}
