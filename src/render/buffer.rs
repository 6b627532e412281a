use crate::render::device::{BufferKind, ObjectId, RenderContext};

/// A device buffer holding vertex or index bytes, filled once at creation.
pub struct GpuBuffer {
    ctx: RenderContext,
    id: ObjectId,
    kind: BufferKind,
    byte_len: usize,
}

impl GpuBuffer {
    /// Creates the buffer and uploads `bytes` as static data. The buffer is
    /// left bound to its target.
    pub fn upload(ctx: &RenderContext, bytes: &[u8], kind: BufferKind) -> Self {
        let device = ctx.device();
        let id = device.create_buffer();
        device.bind_buffer(kind, Some(id));
        device.buffer_data(kind, bytes);

        Self {
            ctx: ctx.clone(),
            id,
            kind,
            byte_len: bytes.len(),
        }
    }

    /// Uploads a slice of plain-old-data values.
    pub fn from_slice<T: bytemuck::Pod>(ctx: &RenderContext, data: &[T], kind: BufferKind) -> Self {
        Self::upload(ctx, bytemuck::cast_slice(data), kind)
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn bind(&self) {
        self.ctx.device().bind_buffer(self.kind, Some(self.id));
    }

    pub fn unbind(&self) {
        self.ctx.device().bind_buffer(self.kind, None);
    }

    pub fn release(self) {}
}

impl Drop for GpuBuffer {
    fn drop(&mut self) {
        self.ctx.device().delete_buffer(self.id);
    }
}
