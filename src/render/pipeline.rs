use crate::config::RenderConfig;
use crate::render::buffer::GpuBuffer;
use crate::render::camera::Camera;
use crate::render::device::{BufferKind, RenderContext};
use crate::render::mesh::{Mesh, Vertex};
use crate::render::shaders::ShaderProgram;
use crate::render::texture::Texture2D;
use crate::render::vertex_array::VertexLayout;
use crate::utils::error::Result;
use log::{debug, warn};

pub const CAMERA_UNIFORM: &str = "camMatrix";
pub const SCALE_UNIFORM: &str = "scale";
pub const SAMPLER_UNIFORM: &str = "tex0";

/// Everything needed to draw one mesh: program, geometry and texture.
///
/// Fields are declared in reverse creation order so that dropping the
/// pipeline releases the texture first and the program last.
pub struct RenderPipeline {
    texture: Option<Texture2D>,
    index_buffer: GpuBuffer,
    vertex_buffer: GpuBuffer,
    layout: VertexLayout,
    program: ShaderProgram,
    ctx: RenderContext,
    index_count: usize,
    settings: RenderConfig,
}

impl RenderPipeline {
    /// Uploads `mesh` and wires its attributes to the layout of [`Vertex`].
    pub fn new(
        ctx: &RenderContext,
        program: ShaderProgram,
        mesh: &Mesh,
        settings: RenderConfig,
    ) -> Self {
        let mut layout = VertexLayout::create(ctx);
        layout.bind();

        let vertex_buffer = GpuBuffer::from_slice(ctx, &mesh.vertices, BufferKind::Vertex);
        let index_buffer = GpuBuffer::from_slice(ctx, &mesh.indices, BufferKind::Index);

        for attribute in Vertex::ATTRIBUTES {
            layout.link(&vertex_buffer, attribute);
        }

        // The index buffer binding lives in the layout; unbind the layout
        // before the buffers so it is not cleared.
        layout.unbind();
        vertex_buffer.unbind();
        index_buffer.unbind();

        ctx.set_depth_test(true);

        if !program.is_compiled() {
            warn!(
                "Shader program {} is not usable; frames will only be cleared",
                program.id()
            );
        }

        debug!(
            "Pipeline ready: {} vertices, {} triangles",
            mesh.vertices.len(),
            mesh.triangle_count()
        );

        Self {
            texture: None,
            index_buffer,
            vertex_buffer,
            layout,
            program,
            ctx: ctx.clone(),
            index_count: mesh.index_count(),
            settings,
        }
    }

    /// Uses `texture` for subsequent frames and points the sampler uniform
    /// at its unit. The sampler is left alone when the program failed to
    /// build.
    pub fn set_texture(&mut self, texture: Texture2D) -> Result<()> {
        if self.program.is_compiled() {
            texture.bind_to_unit(&self.program, SAMPLER_UNIFORM, texture.unit())?;
        }
        self.texture = Some(texture);
        Ok(())
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn settings(&self) -> &RenderConfig {
        &self.settings
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn buffers(&self) -> (&GpuBuffer, &GpuBuffer) {
        (&self.vertex_buffer, &self.index_buffer)
    }

    /// Clears the framebuffer and draws the mesh as seen from `camera`.
    ///
    /// A program that failed to build draws nothing; the frame is only
    /// cleared.
    pub fn draw_frame(&self, camera: &Camera) -> Result<()> {
        let settings = &self.settings;
        self.ctx.clear(settings.clear_color);
        if !self.program.is_compiled() {
            return Ok(());
        }

        self.program.activate()?;
        self.program.set_float(SCALE_UNIFORM, settings.scale)?;
        camera.matrix(
            settings.fov,
            settings.near,
            settings.far,
            &self.program,
            CAMERA_UNIFORM,
        )?;

        if let Some(texture) = &self.texture {
            texture.bind();
        }
        self.layout.bind();
        self.ctx.draw_indexed(self.index_count);
        Ok(())
    }
}
