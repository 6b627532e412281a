pub mod error;
pub mod timing;

pub use error::{CompileError, CompileStage, LoadError, RenderError};
pub use timing::FramePacer;
