//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex: position, sprite UV, tint and a 0/1 texture switch
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    /// 0.0 = flat color, 1.0 = sprite texel * color
    pub textured: f32,
}

impl Vertex {
    /// Flat-colored vertex
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [0.0, 0.0],
            color,
            textured: 0.0,
        }
    }

    /// Sprite vertex sampling the texture at `(u, v)`
    pub const fn sprite(x: f32, y: f32, u: f32, v: f32, tint: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color: tint,
            textured: 1.0,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4, 3 => Float32];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// sRGB component to linear, so named colors look right on an sRGB surface
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert an sRGB color (alpha untouched)
pub fn linear_color(rgba: [f32; 4]) -> [f32; 4] {
    [
        srgb_to_linear(rgba[0]),
        srgb_to_linear(rgba[1]),
        srgb_to_linear(rgba[2]),
        rgba[3],
    ]
}
