//! GPU-compatible data structures.

use crate::camera::Matrix4;
use crate::color::Color;

/// Mesh vertex: position in model space plus RGBA colour (24 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color: color.0,
        }
    }

    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-draw uniform block (160 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub proj_view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
    pub alpha: f32,
    pub _padding: [f32; 3],
}

impl DrawUniform {
    pub fn new(proj_view: Matrix4, model: Matrix4, tint: Color, alpha: f32) -> Self {
        Self {
            proj_view: proj_view.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            tint: tint.0,
            alpha,
            _padding: [0.0; 3],
        }
    }
}

/// Stride between per-draw uniforms in the dynamic uniform buffer.
/// Matches the default `min_uniform_buffer_offset_alignment`.
pub const UNIFORM_STRIDE: u64 = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_sizes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(std::mem::size_of::<DrawUniform>(), 160);
        assert!(std::mem::size_of::<DrawUniform>() as u64 <= UNIFORM_STRIDE);
    }
}
