use crate::render::buffer::GpuBuffer;
use crate::render::device::{BufferKind, ComponentType, ObjectId, RenderContext, VertexAttribute};
use log::warn;

/// Which buffer feeds an attribute slot, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeBinding {
    pub buffer: ObjectId,
    pub attribute: VertexAttribute,
}

/// Device vertex-array object: the table of attribute slots and their
/// source buffers. The buffers themselves are owned elsewhere.
pub struct VertexLayout {
    ctx: RenderContext,
    id: ObjectId,
    bindings: Vec<AttributeBinding>,
}

impl VertexLayout {
    pub fn create(ctx: &RenderContext) -> Self {
        Self {
            ctx: ctx.clone(),
            id: ctx.device().create_vertex_array(),
            bindings: Vec::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Declares attribute `location` as `component_count` values of
    /// `component_type` read from `buffer`.
    ///
    /// Device order: bind this layout, bind the buffer, declare the pointer,
    /// enable the slot, unbind the buffer. Linking a location again replaces
    /// the earlier declaration.
    pub fn link_attribute(
        &mut self,
        buffer: &GpuBuffer,
        location: u32,
        component_count: u32,
        component_type: ComponentType,
        stride: usize,
        offset: usize,
    ) {
        self.link(
            buffer,
            VertexAttribute {
                location,
                component_count,
                component_type,
                stride,
                offset,
            },
        );
    }

    /// [`link_attribute`](Self::link_attribute) with a prepared declaration.
    pub fn link(&mut self, buffer: &GpuBuffer, attribute: VertexAttribute) {
        if buffer.kind() != BufferKind::Vertex {
            warn!(
                "Linking attribute {} to index buffer {}",
                attribute.location,
                buffer.id()
            );
        }

        let device = self.ctx.device();
        self.bind();
        buffer.bind();
        device.vertex_attrib_pointer(&attribute);
        device.enable_vertex_attrib(attribute.location);
        buffer.unbind();

        let binding = AttributeBinding {
            buffer: buffer.id(),
            attribute,
        };
        match self
            .bindings
            .iter_mut()
            .find(|b| b.attribute.location == attribute.location)
        {
            Some(existing) => *existing = binding,
            None => self.bindings.push(binding),
        }
    }

    /// Current attribute table, one entry per location.
    pub fn attributes(&self) -> &[AttributeBinding] {
        &self.bindings
    }

    pub fn bind(&self) {
        self.ctx.device().bind_vertex_array(Some(self.id));
    }

    pub fn unbind(&self) {
        self.ctx.device().bind_vertex_array(None);
    }

    pub fn release(self) {}
}

impl Drop for VertexLayout {
    fn drop(&mut self) {
        self.ctx.device().delete_vertex_array(self.id);
    }
}
