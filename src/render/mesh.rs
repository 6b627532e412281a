use crate::render::atlas::UvRect;
use crate::render::device::{ComponentType, VertexAttribute};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::mem::size_of;

/// Interleaved vertex: position, color, texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    pub const STRIDE: usize = size_of::<Vertex>();

    /// Attribute slots matching the built-in vertex shader.
    pub const ATTRIBUTES: [VertexAttribute; 3] = [
        VertexAttribute {
            location: 0,
            component_count: 3,
            component_type: ComponentType::Float,
            stride: Self::STRIDE,
            offset: 0,
        },
        VertexAttribute {
            location: 1,
            component_count: 3,
            component_type: ComponentType::Float,
            stride: Self::STRIDE,
            offset: 3 * size_of::<f32>(),
        },
        VertexAttribute {
            location: 2,
            component_count: 2,
            component_type: ComponentType::Float,
            stride: Self::STRIDE,
            offset: 6 * size_of::<f32>(),
        },
    ];

    pub const fn new(position: [f32; 3], color: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            color,
            tex_coord,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// The hard-coded geometry the demo can show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    Triangle,
    IndexedTriangles,
    Quad,
    #[default]
    Cube,
}

impl SceneKind {
    pub fn mesh(self, uv: UvRect) -> Mesh {
        match self {
            SceneKind::Triangle => triangle(),
            SceneKind::IndexedTriangles => indexed_triangles(),
            SceneKind::Quad => quad(uv),
            SceneKind::Cube => cube(uv),
        }
    }
}

const SQRT_3: f32 = 1.732_050_8;

/// Equilateral triangle centred on the origin.
pub fn triangle() -> Mesh {
    Mesh {
        vertices: vec![
            Vertex::new([-0.5, -0.5 * SQRT_3 / 3.0, 0.0], [0.8, 0.3, 0.02], [0.0, 0.0]),
            Vertex::new([0.5, -0.5 * SQRT_3 / 3.0, 0.0], [0.8, 0.3, 0.02], [1.0, 0.0]),
            Vertex::new([0.0, 0.5 * SQRT_3 * 2.0 / 3.0, 0.0], [1.0, 0.6, 0.32], [0.5, 1.0]),
        ],
        indices: vec![0, 1, 2],
    }
}

/// The same triangle split into three by its edge midpoints, sharing
/// vertices through the index list.
pub fn indexed_triangles() -> Mesh {
    let low = -0.5 * SQRT_3 / 3.0;
    let high = 0.5 * SQRT_3 * 2.0 / 3.0;
    let mid = 0.5 * SQRT_3 / 6.0;
    let outer = [0.8, 0.3, 0.02];
    let inner = [0.9, 0.45, 0.17];

    Mesh {
        vertices: vec![
            Vertex::new([-0.5, low, 0.0], outer, [0.0, 0.0]),
            Vertex::new([0.5, low, 0.0], outer, [1.0, 0.0]),
            Vertex::new([0.0, high, 0.0], [1.0, 0.6, 0.32], [0.5, 1.0]),
            Vertex::new([-0.25, mid, 0.0], inner, [0.25, 0.5]),
            Vertex::new([0.25, mid, 0.0], inner, [0.75, 0.5]),
            Vertex::new([0.0, low, 0.0], outer, [0.5, 0.0]),
        ],
        indices: vec![0, 3, 5, 3, 2, 4, 5, 4, 1],
    }
}

/// Unit quad in the XY plane covering `uv`.
pub fn quad(uv: UvRect) -> Mesh {
    Mesh {
        vertices: vec![
            Vertex::new([-0.5, -0.5, 0.0], [1.0, 0.0, 0.0], [uv.min.x, uv.min.y]),
            Vertex::new([-0.5, 0.5, 0.0], [0.0, 1.0, 0.0], [uv.min.x, uv.max.y]),
            Vertex::new([0.5, 0.5, 0.0], [0.0, 0.0, 1.0], [uv.max.x, uv.max.y]),
            Vertex::new([0.5, -0.5, 0.0], [1.0, 1.0, 1.0], [uv.max.x, uv.min.y]),
        ],
        indices: vec![0, 2, 1, 0, 3, 2],
    }
}

/// Unit cube: 8 shared corners, 12 counter-clockwise triangles.
///
/// Vertex colors follow the corner position so each corner is distinct.
pub fn cube(uv: UvRect) -> Mesh {
    let corners: [([f32; 3], [f32; 2]); 8] = [
        ([-0.5, -0.5, 0.5], [uv.min.x, uv.min.y]),
        ([0.5, -0.5, 0.5], [uv.max.x, uv.min.y]),
        ([0.5, 0.5, 0.5], [uv.max.x, uv.max.y]),
        ([-0.5, 0.5, 0.5], [uv.min.x, uv.max.y]),
        ([-0.5, -0.5, -0.5], [uv.max.x, uv.min.y]),
        ([0.5, -0.5, -0.5], [uv.min.x, uv.min.y]),
        ([0.5, 0.5, -0.5], [uv.min.x, uv.max.y]),
        ([-0.5, 0.5, -0.5], [uv.max.x, uv.max.y]),
    ];

    let vertices = corners
        .iter()
        .map(|&(p, t)| Vertex::new(p, [p[0] + 0.5, p[1] + 0.5, p[2] + 0.5], t))
        .collect();

    #[rustfmt::skip]
    let indices = vec![
        0, 1, 2, 2, 3, 0, // front
        1, 5, 6, 6, 2, 1, // right
        5, 4, 7, 7, 6, 5, // back
        4, 0, 3, 3, 7, 4, // left
        3, 2, 6, 6, 7, 3, // top
        4, 5, 1, 1, 0, 4, // bottom
    ];

    Mesh { vertices, indices }
}
