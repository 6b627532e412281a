use crate::render::device::{
    FilterMode, ObjectId, PixelFormat, PixelType, RenderContext, TextureImage, WrapMode,
};
use crate::render::shaders::ShaderProgram;
use crate::utils::error::{LoadError, RenderError, Result};
use image::DynamicImage;
use log::info;
use std::fs;
use std::path::Path;

/// Opaque white, shown outside the [0, 1] texture range.
pub const BORDER_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// A 2D texture uploaded once from a decoded image.
///
/// Sampling is nearest-neighbour so block pixel art stays crisp, and lookups
/// outside the image clamp to an opaque white border.
pub struct Texture2D {
    ctx: RenderContext,
    id: ObjectId,
    unit: u32,
    width: u32,
    height: u32,
    format: PixelFormat,
    filter: FilterMode,
    wrap: WrapMode,
    border_color: [f32; 4],
}

impl Texture2D {
    /// Reads and decodes the image at `path`, flipped so that row 0 is the
    /// bottom of the picture, and uploads it on texture unit `unit`.
    pub fn load<P: AsRef<Path>>(
        ctx: &RenderContext,
        path: P,
        unit: u32,
        format: PixelFormat,
        pixel_type: PixelType,
    ) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| RenderError::file_read(path, source))?;
        let image = image::load_from_memory(&bytes).map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        if image.width() == 0 || image.height() == 0 {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            }
            .into());
        }

        info!(
            "Loaded texture {:?} ({}x{})",
            path,
            image.width(),
            image.height()
        );
        Ok(Self::from_image(ctx, &image.flipv(), unit, format, pixel_type))
    }

    /// Uploads an already decoded image as-is (no flip).
    pub fn from_image(
        ctx: &RenderContext,
        image: &DynamicImage,
        unit: u32,
        format: PixelFormat,
        pixel_type: PixelType,
    ) -> Self {
        let device = ctx.device();
        let data = pixel_bytes(image, format, pixel_type);

        let id = device.create_texture();
        device.active_texture(unit);
        device.bind_texture(Some(id));

        device.texture_filter(FilterMode::Nearest);
        device.texture_wrap(WrapMode::ClampToBorder, BORDER_COLOR);

        device.tex_image_2d(&TextureImage {
            width: image.width(),
            height: image.height(),
            format,
            pixel_type,
            data: &data,
        });
        device.generate_mipmap();

        // Unbind so later texture calls cannot modify this one by accident.
        device.bind_texture(None);

        Self {
            ctx: ctx.clone(),
            id,
            unit,
            width: image.width(),
            height: image.height(),
            format,
            filter: FilterMode::Nearest,
            wrap: WrapMode::ClampToBorder,
            border_color: BORDER_COLOR,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn unit(&self) -> u32 {
        self.unit
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn wrap(&self) -> WrapMode {
        self.wrap
    }

    pub fn border_color(&self) -> [f32; 4] {
        self.border_color
    }

    /// Points the sampler uniform `uniform` of `shader` at texture unit
    /// `unit`. Activates `shader` first.
    pub fn bind_to_unit(&self, shader: &ShaderProgram, uniform: &str, unit: u32) -> Result<()> {
        shader.activate()?;
        shader.set_int(uniform, unit as i32)
    }

    pub fn bind(&self) {
        let device = self.ctx.device();
        device.active_texture(self.unit);
        device.bind_texture(Some(self.id));
    }

    pub fn unbind(&self) {
        let device = self.ctx.device();
        device.active_texture(self.unit);
        device.bind_texture(None);
    }

    pub fn release(self) {}
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        self.ctx.device().delete_texture(self.id);
    }
}

fn pixel_bytes(image: &DynamicImage, format: PixelFormat, pixel_type: PixelType) -> Vec<u8> {
    match (format, pixel_type) {
        (PixelFormat::Rgba, PixelType::UnsignedByte) => image.to_rgba8().into_raw(),
        (PixelFormat::Rgb, PixelType::UnsignedByte) => image.to_rgb8().into_raw(),
        (PixelFormat::Red, PixelType::UnsignedByte) => image.to_luma8().into_raw(),
        (PixelFormat::Rgba, PixelType::Float) => {
            bytemuck::cast_slice(&image.to_rgba32f().into_raw()).to_vec()
        }
        (PixelFormat::Rgb, PixelType::Float) => {
            bytemuck::cast_slice(&image.to_rgb32f().into_raw()).to_vec()
        }
        (PixelFormat::Red, PixelType::Float) => {
            bytemuck::cast_slice(&image.to_luma32f().into_raw()).to_vec()
        }
    }
}
