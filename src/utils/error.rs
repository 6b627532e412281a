use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which compilation unit a [`CompileError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompileStage {
    Vertex,
    Fragment,
    Program,
}

impl fmt::Display for CompileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompileStage::Vertex => "VERTEX",
            CompileStage::Fragment => "FRAGMENT",
            CompileStage::Program => "PROGRAM",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Error)]
#[error("{stage} stage failed: {log}")]
pub struct CompileError {
    pub stage: CompileStage,
    pub log: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to decode image at {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image at {path:?} has no pixels")]
    Empty { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to read {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Shader program {0} was used without a successful link")]
    NotCompiled(u32),
}

impl RenderError {
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RenderError::FileRead {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
