pub mod config;
pub mod player;
pub mod render;
pub mod utils;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used types
pub use config::AppConfig;
pub use player::input::MovementInput;
pub use render::camera::Camera;
pub use render::device::RenderContext;
pub use render::pipeline::RenderPipeline;
pub use render::shaders::ShaderProgram;
pub use utils::error::{CompileError, LoadError, RenderError};
