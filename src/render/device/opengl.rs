use super::{
    BufferKind, ComponentType, Device, DeviceInfo, FilterMode, ObjectId, PixelFormat,
    PixelType, ShaderStage, TextureImage, UniformLocation, UniformValue, VertexAttribute,
    WrapMode, UNKNOWN_UNIFORM,
};
use gl::types::*;
use std::ffi::{c_void, CStr, CString};
use std::ptr;

/// [`Device`] backed by the process-wide OpenGL function table.
///
/// The GL context must be current on the calling thread for the whole
/// lifetime of this value.
#[derive(Debug)]
pub struct GlDevice {
    _private: (),
}

impl GlDevice {
    /// Loads the GL function pointers through `loader` (usually the glutin
    /// display's `get_proc_address`).
    pub fn load<F>(mut loader: F) -> Self
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => loader(symbol.as_c_str()),
            Err(_) => ptr::null(),
        });
        Self { _private: () }
    }

    fn create_whitespace_cstring_with_len(len: usize) -> CString {
        let mut buffer: Vec<u8> = Vec::with_capacity(len + 1);
        buffer.extend([b' '].iter().cycle().take(len));
        // Spaces only, no interior nul.
        unsafe { CString::from_vec_unchecked(buffer) }
    }

    /// GL writes a nul terminator into the last byte of the log buffer.
    fn log_string(log: &[u8]) -> String {
        String::from_utf8_lossy(log)
            .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_owned()
    }

    fn info_string(raw: *const GLubyte) -> String {
        if raw.is_null() {
            return String::from("unknown");
        }
        unsafe { CStr::from_ptr(raw as *const GLchar) }
            .to_string_lossy()
            .into_owned()
    }
}

fn buffer_target(kind: BufferKind) -> GLenum {
    match kind {
        BufferKind::Vertex => gl::ARRAY_BUFFER,
        BufferKind::Index => gl::ELEMENT_ARRAY_BUFFER,
    }
}

fn component_type(ty: ComponentType) -> GLenum {
    match ty {
        ComponentType::Float => gl::FLOAT,
        ComponentType::Int => gl::INT,
        ComponentType::UnsignedInt => gl::UNSIGNED_INT,
        ComponentType::UnsignedByte => gl::UNSIGNED_BYTE,
    }
}

fn pixel_format(format: PixelFormat) -> GLenum {
    match format {
        PixelFormat::Red => gl::RED,
        PixelFormat::Rgb => gl::RGB,
        PixelFormat::Rgba => gl::RGBA,
    }
}

fn pixel_type(ty: PixelType) -> GLenum {
    match ty {
        PixelType::UnsignedByte => gl::UNSIGNED_BYTE,
        PixelType::Float => gl::FLOAT,
    }
}

impl Device for GlDevice {
    fn create_shader(&self, stage: ShaderStage) -> ObjectId {
        let kind = match stage {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        };
        unsafe { gl::CreateShader(kind) }
    }

    fn compile_shader(&self, shader: ObjectId, source: &str) -> bool {
        let source_ptr = source.as_ptr() as *const GLchar;
        let source_len = source.len() as GLint;
        let mut success = 0;
        unsafe {
            gl::ShaderSource(shader, 1, &source_ptr, &source_len);
            gl::CompileShader(shader);
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success != 0
    }

    fn shader_info_log(&self, shader: ObjectId) -> String {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        }
        let error = Self::create_whitespace_cstring_with_len(len.max(0) as usize);
        unsafe {
            gl::GetShaderInfoLog(shader, len, ptr::null_mut(), error.as_ptr() as *mut GLchar);
        }
        Self::log_string(error.as_bytes())
    }

    fn delete_shader(&self, shader: ObjectId) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn create_program(&self) -> ObjectId {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: ObjectId, shader: ObjectId) {
        unsafe { gl::AttachShader(program, shader) };
    }

    fn link_program(&self, program: ObjectId) -> bool {
        let mut success = 0;
        unsafe {
            gl::LinkProgram(program);
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        success != 0
    }

    fn program_info_log(&self, program: ObjectId) -> String {
        let mut len = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        }
        let error = Self::create_whitespace_cstring_with_len(len.max(0) as usize);
        unsafe {
            gl::GetProgramInfoLog(program, len, ptr::null_mut(), error.as_ptr() as *mut GLchar);
        }
        Self::log_string(error.as_bytes())
    }

    fn use_program(&self, program: Option<ObjectId>) {
        unsafe { gl::UseProgram(program.unwrap_or(0)) };
    }

    fn delete_program(&self, program: ObjectId) {
        unsafe { gl::DeleteProgram(program) };
    }

    fn uniform_location(&self, program: ObjectId, name: &str) -> UniformLocation {
        match CString::new(name) {
            Ok(cname) => unsafe { gl::GetUniformLocation(program, cname.as_ptr()) },
            Err(_) => UNKNOWN_UNIFORM,
        }
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        unsafe {
            match value {
                UniformValue::Bool(v) => gl::Uniform1i(location, *v as GLint),
                UniformValue::Int(v) => gl::Uniform1i(location, *v),
                UniformValue::Float(v) => gl::Uniform1f(location, *v),
                UniformValue::Mat4(m) => gl::UniformMatrix4fv(location, 1, gl::FALSE, m.as_ptr()),
            }
        }
    }

    fn create_buffer(&self) -> ObjectId {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        id
    }

    fn bind_buffer(&self, kind: BufferKind, buffer: Option<ObjectId>) {
        unsafe { gl::BindBuffer(buffer_target(kind), buffer.unwrap_or(0)) };
    }

    fn buffer_data(&self, kind: BufferKind, data: &[u8]) {
        unsafe {
            gl::BufferData(
                buffer_target(kind),
                data.len() as GLsizeiptr,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );
        }
    }

    fn delete_buffer(&self, buffer: ObjectId) {
        unsafe { gl::DeleteBuffers(1, &buffer) };
    }

    fn create_vertex_array(&self) -> ObjectId {
        let mut id = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        id
    }

    fn bind_vertex_array(&self, vertex_array: Option<ObjectId>) {
        unsafe { gl::BindVertexArray(vertex_array.unwrap_or(0)) };
    }

    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute) {
        let size = attribute.component_count as GLint;
        let stride = attribute.stride as GLsizei;
        let offset = attribute.offset as *const c_void;
        let ty = component_type(attribute.component_type);
        unsafe {
            match attribute.component_type {
                ComponentType::Float => {
                    gl::VertexAttribPointer(attribute.location, size, ty, gl::FALSE, stride, offset)
                }
                ComponentType::UnsignedByte => {
                    gl::VertexAttribPointer(attribute.location, size, ty, gl::TRUE, stride, offset)
                }
                ComponentType::Int | ComponentType::UnsignedInt => {
                    gl::VertexAttribIPointer(attribute.location, size, ty, stride, offset)
                }
            }
        }
    }

    fn enable_vertex_attrib(&self, location: u32) {
        unsafe { gl::EnableVertexAttribArray(location) };
    }

    fn delete_vertex_array(&self, vertex_array: ObjectId) {
        unsafe { gl::DeleteVertexArrays(1, &vertex_array) };
    }

    fn create_texture(&self) -> ObjectId {
        let mut id = 0;
        unsafe { gl::GenTextures(1, &mut id) };
        id
    }

    fn active_texture(&self, unit: u32) {
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit) };
    }

    fn bind_texture(&self, texture: Option<ObjectId>) {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, texture.unwrap_or(0)) };
    }

    fn texture_filter(&self, filter: FilterMode) {
        let mode = match filter {
            FilterMode::Nearest => gl::NEAREST,
            FilterMode::Linear => gl::LINEAR,
        } as GLint;
        unsafe {
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, mode);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, mode);
        }
    }

    fn texture_wrap(&self, wrap: WrapMode, border_color: [f32; 4]) {
        let mode = match wrap {
            WrapMode::Repeat => gl::REPEAT,
            WrapMode::ClampToEdge => gl::CLAMP_TO_EDGE,
            WrapMode::ClampToBorder => gl::CLAMP_TO_BORDER,
        } as GLint;
        unsafe {
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, mode);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, mode);
            gl::TexParameterfv(gl::TEXTURE_2D, gl::TEXTURE_BORDER_COLOR, border_color.as_ptr());
        }
    }

    fn tex_image_2d(&self, image: &TextureImage<'_>) {
        unsafe {
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA as GLint,
                image.width as GLsizei,
                image.height as GLsizei,
                0,
                pixel_format(image.format),
                pixel_type(image.pixel_type),
                image.data.as_ptr() as *const c_void,
            );
        }
    }

    fn generate_mipmap(&self) {
        unsafe { gl::GenerateMipmap(gl::TEXTURE_2D) };
    }

    fn delete_texture(&self, texture: ObjectId) {
        unsafe { gl::DeleteTextures(1, &texture) };
    }

    fn set_viewport(&self, width: u32, height: u32) {
        unsafe { gl::Viewport(0, 0, width as GLsizei, height as GLsizei) };
    }

    fn set_depth_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                gl::Enable(gl::DEPTH_TEST);
            } else {
                gl::Disable(gl::DEPTH_TEST);
            }
        }
    }

    fn clear(&self, color: [f32; 4]) {
        unsafe {
            gl::ClearColor(color[0], color[1], color[2], color[3]);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }

    fn draw_elements(&self, count: usize) {
        unsafe {
            gl::DrawElements(gl::TRIANGLES, count as GLsizei, gl::UNSIGNED_INT, ptr::null());
        }
    }

    fn info(&self) -> DeviceInfo {
        unsafe {
            DeviceInfo {
                renderer: Self::info_string(gl::GetString(gl::RENDERER)),
                version: Self::info_string(gl::GetString(gl::VERSION)),
            }
        }
    }
}
