//! # Vertex — Slide Mesh and Uniform Layouts
//!
//! Slides are flat textured planes, so a vertex only needs a position and a
//! texture coordinate. There is no lighting, hence no normal.
//!
//! ## Memory Layout
//!
//! ```text
//! SlideVertex (20 bytes)
//! ┌──────────────┬──────────────┐
//! │ position     │ uv           │
//! │ [f32; 3]     │ [f32; 2]     │
//! │ offset 0     │ offset 12    │
//! │ location(0)  │ location(1)  │
//! └──────────────┴──────────────┘
//! ```
//!
//! ## Uniform Buffers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Group 0 — Camera (per frame)                                │
//! │   view_proj: mat4x4                              64 bytes   │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Group 1 — Slide texture + sampler (per slot)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Group 2 — Model (per slot, dynamic offset)                  │
//! │   model: mat4x4  +  curve: f32  +  padding       80 bytes   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! `curve` rides along with the model matrix because the vertex shader needs
//! both to bend the plane: the world-space x of each vertex comes from the
//! model matrix, and `curve` scales how strongly it lifts y.

use bytemuck::{Pod, Zeroable};

/// Per-vertex data for slide planes: position and texture UV.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SlideVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl SlideVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SlideVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position: vec3<f32>
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv: vec2<f32>
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };
}

/// Camera uniform: view-projection matrix.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4], // 64 bytes
}

/// Model uniform: slot transform plus the material's curvature strength.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct ModelUniform {
    pub model: [[f32; 4]; 4], // 64 bytes
    pub curve: f32,           // 4 bytes
    pub _padding: [f32; 3],   // 12 bytes → total 80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_match_shader_expectations() {
        assert_eq!(std::mem::size_of::<SlideVertex>(), 20);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
        // WGSL rounds a struct up to a multiple of its 16-byte alignment.
        assert_eq!(std::mem::size_of::<ModelUniform>() % 16, 0);
    }
}
