use glam::Vec2;

/// Texture-space rectangle, `min` at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl UvRect {
    pub const FULL: UvRect = UvRect {
        min: Vec2::ZERO,
        max: Vec2::ONE,
    };
}

/// A texture split into a grid of equally sized tiles.
///
/// Tiles are addressed by column from the left and row from the top of the
/// picture; textures are uploaded bottom row first, so row 0 maps to the top
/// of V.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureAtlas {
    pub columns: u32,
    pub rows: u32,
}

impl TextureAtlas {
    pub fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// UV rectangle of tile (`column`, `row`), or `None` outside the grid.
    pub fn tile(&self, column: u32, row: u32) -> Option<UvRect> {
        if column >= self.columns || row >= self.rows {
            return None;
        }

        let tile_w = 1.0 / self.columns as f32;
        let tile_h = 1.0 / self.rows as f32;
        let u0 = column as f32 * tile_w;
        let v1 = 1.0 - row as f32 * tile_h;

        Some(UvRect {
            min: Vec2::new(u0, v1 - tile_h),
            max: Vec2::new(u0 + tile_w, v1),
        })
    }
}
