//! The graphics-API seam.
//!
//! Every resource in [`crate::render`] talks to the GPU through a [`Device`]
//! reached via a [`RenderContext`]. The device is a state machine: binds,
//! activations and uniform writes act on whatever is currently bound, so the
//! order of calls on a context is part of its contract.

pub mod opengl;
#[cfg(test)]
pub mod recording;

use std::fmt;
use std::rc::Rc;

pub use self::opengl::GlDevice;

/// Opaque identifier of a device-resident object.
pub type ObjectId = u32;

/// Location of a uniform inside a linked program. `-1` means the name did
/// not resolve; writes to it are ignored by the device.
pub type UniformLocation = i32;

pub const UNKNOWN_UNIFORM: UniformLocation = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Float,
    Int,
    UnsignedInt,
    UnsignedByte,
}

impl ComponentType {
    pub fn size_in_bytes(self) -> usize {
        match self {
            ComponentType::Float | ComponentType::Int | ComponentType::UnsignedInt => 4,
            ComponentType::UnsignedByte => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Red,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Red => 1,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    UnsignedByte,
    Float,
}

impl PixelType {
    pub fn size_in_bytes(self) -> usize {
        match self {
            PixelType::UnsignedByte => 1,
            PixelType::Float => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
    ClampToBorder,
}

/// One vertex attribute declaration: where it lives in the bound vertex
/// buffer and how the vertex stage reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub component_count: u32,
    pub component_type: ComponentType,
    pub stride: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Mat4([f32; 16]),
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        UniformValue::Bool(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        UniformValue::Int(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::Float(value)
    }
}

impl From<glam::Mat4> for UniformValue {
    fn from(value: glam::Mat4) -> Self {
        UniformValue::Mat4(value.to_cols_array())
    }
}

/// Pixel payload for a 2D texture upload.
#[derive(Debug, Clone, Copy)]
pub struct TextureImage<'a> {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixel_type: PixelType,
    pub data: &'a [u8],
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    pub renderer: String,
    pub version: String,
}

/// The graphics-API entry points used by the renderer.
///
/// Texture calls act on the 2D texture target of the active unit. Bind calls
/// take `None` to unbind.
pub trait Device {
    fn create_shader(&self, stage: ShaderStage) -> ObjectId;
    /// Uploads `source` and compiles it. Returns the compile status.
    fn compile_shader(&self, shader: ObjectId, source: &str) -> bool;
    fn shader_info_log(&self, shader: ObjectId) -> String;
    fn delete_shader(&self, shader: ObjectId);

    fn create_program(&self) -> ObjectId;
    fn attach_shader(&self, program: ObjectId, shader: ObjectId);
    /// Links the attached stages. Returns the link status.
    fn link_program(&self, program: ObjectId) -> bool;
    fn program_info_log(&self, program: ObjectId) -> String;
    fn use_program(&self, program: Option<ObjectId>);
    fn delete_program(&self, program: ObjectId);

    fn uniform_location(&self, program: ObjectId, name: &str) -> UniformLocation;
    /// Writes to the active program. Location `-1` is a no-op.
    fn set_uniform(&self, location: UniformLocation, value: &UniformValue);

    fn create_buffer(&self) -> ObjectId;
    fn bind_buffer(&self, kind: BufferKind, buffer: Option<ObjectId>);
    /// Static upload into the buffer currently bound for `kind`.
    fn buffer_data(&self, kind: BufferKind, data: &[u8]);
    fn delete_buffer(&self, buffer: ObjectId);

    fn create_vertex_array(&self) -> ObjectId;
    fn bind_vertex_array(&self, vertex_array: Option<ObjectId>);
    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute);
    fn enable_vertex_attrib(&self, location: u32);
    fn delete_vertex_array(&self, vertex_array: ObjectId);

    fn create_texture(&self) -> ObjectId;
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, texture: Option<ObjectId>);
    fn texture_filter(&self, filter: FilterMode);
    fn texture_wrap(&self, wrap: WrapMode, border_color: [f32; 4]);
    fn tex_image_2d(&self, image: &TextureImage<'_>);
    fn generate_mipmap(&self);
    fn delete_texture(&self, texture: ObjectId);

    fn set_viewport(&self, width: u32, height: u32);
    fn set_depth_test(&self, enabled: bool);
    fn clear(&self, color: [f32; 4]);
    /// Draws `count` `u32` indices as triangles from the bound vertex array.
    fn draw_elements(&self, count: usize);

    fn info(&self) -> DeviceInfo;
}

/// Shared handle to the device owned by the render thread.
#[derive(Clone)]
pub struct RenderContext {
    device: Rc<dyn Device>,
}

impl RenderContext {
    pub fn new<D: Device + 'static>(device: D) -> Self {
        Self {
            device: Rc::new(device),
        }
    }

    pub fn device(&self) -> &dyn Device {
        self.device.as_ref()
    }

    pub fn clear(&self, color: [f32; 4]) {
        self.device.clear(color);
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.device.set_viewport(width, height);
    }

    pub fn set_depth_test(&self, enabled: bool) {
        self.device.set_depth_test(enabled);
    }

    pub fn draw_indexed(&self, count: usize) {
        self.device.draw_elements(count);
    }

    pub fn info(&self) -> DeviceInfo {
        self.device.info()
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext").finish_non_exhaustive()
    }
}
