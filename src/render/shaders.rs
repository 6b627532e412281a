// shaders.rs - Shader program compilation and uniform access

use crate::render::device::{
    ObjectId, RenderContext, ShaderStage, UniformLocation, UniformValue,
};
use crate::utils::error::{CompileError, CompileStage, RenderError, Result};
use glam::Mat4;
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A linked vertex + fragment program.
///
/// The device program is deleted when this value is dropped or released.
pub struct ShaderProgram {
    ctx: RenderContext,
    id: ObjectId,
    compiled: bool,
    uniforms: RefCell<HashMap<String, UniformLocation>>,
}

/// Shader pair used when no shader files are configured.
pub mod default_shaders {
    pub const VERTEX_SRC: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aColor;
layout (location = 2) in vec2 aTex;

out vec3 color;
out vec2 texCoord;

uniform float scale;
uniform mat4 camMatrix;

void main() {
    gl_Position = camMatrix * vec4(aPos * (1.0 + scale), 1.0);
    color = aColor;
    texCoord = aTex;
}
"#;

    pub const FRAGMENT_SRC: &str = r#"#version 330 core
out vec4 FragColor;

in vec3 color;
in vec2 texCoord;

uniform sampler2D tex0;

void main() {
    FragColor = vec4(color, 1.0) * texture(tex0, texCoord);
}
"#;
}

impl ShaderProgram {
    /// Compiles and links both stages. Any stage failure is logged and
    /// returned; no program survives a failure.
    pub fn compile(ctx: &RenderContext, vertex_src: &str, fragment_src: &str) -> Result<Self> {
        let (program, errors) = Self::build(ctx, vertex_src, fragment_src);
        match errors.into_iter().next() {
            Some(err) => {
                drop(program);
                Err(err.into())
            }
            None => Ok(program),
        }
    }

    /// Compiles and links like [`compile`](Self::compile), but keeps the
    /// program object when a stage fails. Failures are only logged and the
    /// returned program reports `is_compiled() == false`.
    pub fn compile_permissive(ctx: &RenderContext, vertex_src: &str, fragment_src: &str) -> Self {
        let (program, errors) = Self::build(ctx, vertex_src, fragment_src);
        if !errors.is_empty() {
            warn!(
                "Continuing with unusable shader program {} ({} error(s))",
                program.id,
                errors.len()
            );
        }
        program
    }

    /// Reads both stage sources from disk and compiles them.
    pub fn from_files<P: AsRef<Path>>(
        ctx: &RenderContext,
        vertex_path: P,
        fragment_path: P,
        strict: bool,
    ) -> Result<Self> {
        let vertex_src = Self::read_source(vertex_path.as_ref())?;
        let fragment_src = Self::read_source(fragment_path.as_ref())?;
        if strict {
            Self::compile(ctx, &vertex_src, &fragment_src)
        } else {
            Ok(Self::compile_permissive(ctx, &vertex_src, &fragment_src))
        }
    }

    fn read_source(path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| RenderError::file_read(path, source))
    }

    fn build(ctx: &RenderContext, vertex_src: &str, fragment_src: &str) -> (Self, Vec<CompileError>) {
        let device = ctx.device();
        let mut errors = Vec::new();

        info!("Creating vertex shader");
        let vertex = Self::compile_stage(ctx, ShaderStage::Vertex, vertex_src, &mut errors);
        info!("Creating fragment shader");
        let fragment = Self::compile_stage(ctx, ShaderStage::Fragment, fragment_src, &mut errors);

        let mut program = ShaderProgram {
            ctx: ctx.clone(),
            id: device.create_program(),
            compiled: false,
            uniforms: RefCell::new(HashMap::new()),
        };

        if errors.is_empty() {
            info!("Creating shader program");
            device.attach_shader(program.id, vertex);
            device.attach_shader(program.id, fragment);
            if device.link_program(program.id) {
                program.compiled = true;
            } else {
                let log = device.program_info_log(program.id);
                error!("Shader program link failed:\n{}", log);
                errors.push(CompileError {
                    stage: CompileStage::Program,
                    log,
                });
            }
        }

        device.delete_shader(vertex);
        device.delete_shader(fragment);

        (program, errors)
    }

    fn compile_stage(
        ctx: &RenderContext,
        stage: ShaderStage,
        source: &str,
        errors: &mut Vec<CompileError>,
    ) -> ObjectId {
        let device = ctx.device();
        let shader = device.create_shader(stage);
        if !device.compile_shader(shader, source) {
            let stage = match stage {
                ShaderStage::Vertex => CompileStage::Vertex,
                ShaderStage::Fragment => CompileStage::Fragment,
            };
            let log = device.shader_info_log(shader);
            error!("Shader compilation failed ({}):\n{}", stage, log);
            errors.push(CompileError { stage, log });
        }
        shader
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    fn ensure_compiled(&self) -> Result<()> {
        if self.compiled {
            Ok(())
        } else {
            Err(RenderError::NotCompiled(self.id))
        }
    }

    /// Makes this the program used by subsequent draws.
    pub fn activate(&self) -> Result<()> {
        self.ensure_compiled()?;
        self.ctx.device().use_program(Some(self.id));
        Ok(())
    }

    pub fn uniform_location(&self, name: &str) -> UniformLocation {
        if let Some(location) = self.uniforms.borrow().get(name) {
            return *location;
        }

        let location = self.ctx.device().uniform_location(self.id, name);
        if location < 0 {
            debug!("Uniform '{}' not found in shader {}", name, self.id);
        }

        self.uniforms.borrow_mut().insert(name.to_string(), location);
        location
    }

    /// Writes `value` to the uniform `name` of the active program. Unknown
    /// names resolve to location -1 and the write is ignored by the device.
    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) -> Result<()> {
        self.ensure_compiled()?;
        let location = self.uniform_location(name);
        self.ctx.device().set_uniform(location, &value.into());
        Ok(())
    }

    pub fn set_bool(&self, name: &str, value: bool) -> Result<()> {
        self.set_uniform(name, value)
    }

    pub fn set_int(&self, name: &str, value: i32) -> Result<()> {
        self.set_uniform(name, value)
    }

    pub fn set_float(&self, name: &str, value: f32) -> Result<()> {
        self.set_uniform(name, value)
    }

    pub fn set_mat4(&self, name: &str, value: &Mat4) -> Result<()> {
        self.set_uniform(name, *value)
    }

    /// Deletes the device program now instead of at end of scope.
    pub fn release(self) {}
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.ctx.device().delete_program(self.id);
    }
}
