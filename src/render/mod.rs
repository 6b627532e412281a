pub mod atlas;
pub mod buffer;
pub mod camera;
pub mod device;
pub mod mesh;
pub mod pipeline;
pub mod shaders;
pub mod texture;
pub mod vertex_array;

pub use atlas::{TextureAtlas, UvRect};
pub use buffer::GpuBuffer;
pub use camera::{AspectMode, Camera};
pub use device::{Device, GlDevice, RenderContext};
pub use mesh::{Mesh, SceneKind, Vertex};
pub use pipeline::RenderPipeline;
pub use shaders::ShaderProgram;
pub use texture::Texture2D;
pub use vertex_array::VertexLayout;
