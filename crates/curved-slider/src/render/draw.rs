//! # Draw — The wgpu Render Backend
//!
//! [`WgpuRenderer`] is the [`RenderBackend`] that owns the window surface.
//! Each frame it:
//!
//! ```text
//! 1. acquire the surface texture  (Lost/Outdated → reconfigure, skip frame)
//! 2. write the camera view-projection
//! 3. write one ModelUniform per slot into the dynamic slot buffer
//! 4. clear pass + one draw_indexed per slot
//!      group 1 ← the slot's texture (or the placeholder)
//!      group 2 ← slot uniform at offset i * stride
//! 5. submit and present
//! ```
//!
//! Every slot draws the same plane mesh, uploaded once per mount by
//! [`prepare`](RenderBackend::prepare). The mesh is never rebuilt on resize.

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use super::pipeline::SlidePipeline;
use super::texture::TextureStore;
use super::vertex::{CameraUniform, ModelUniform};
use super::{ClearColor, GpuContext, RenderBackend, RenderError, TextureHandle};
use crate::geometry::PlaneGeometry;
use crate::scene::SceneGraph;
use crate::texture::DecodedImage;

/// The shared plane mesh on the GPU.
struct PlaneMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Draws a [`SceneGraph`] into a winit window.
pub struct WgpuRenderer {
    gpu: GpuContext,
    pipeline: SlidePipeline,
    textures: TextureStore,
    mesh: Option<PlaneMesh>,
    clear_color: ClearColor,
}

impl WgpuRenderer {
    /// Create the device, surface, pipeline and placeholder texture for
    /// `window`.
    pub fn new(window: Arc<Window>, clear_color: ClearColor) -> Result<Self, RenderError> {
        let gpu = GpuContext::new(window)?;
        let pipeline = SlidePipeline::new(&gpu);
        let textures = TextureStore::new(&gpu, &pipeline.texture_bind_group_layout, &pipeline.sampler);
        Ok(Self {
            gpu,
            pipeline,
            textures,
            mesh: None,
            clear_color,
        })
    }

    pub fn set_clear_color(&mut self, clear_color: ClearColor) {
        self.clear_color = clear_color;
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    /// Live textures, placeholder included.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn write_slot_uniforms(&mut self, scene: &SceneGraph) -> u32 {
        let slots = scene.slots();
        if slots.is_empty() {
            return 0;
        }
        let stride = self.pipeline.ensure_model_capacity(&self.gpu.device, slots.len());
        let mut data = vec![0u8; stride as usize * slots.len()];
        for (i, slot) in slots.iter().enumerate() {
            let uniform = ModelUniform {
                model: scene.model_matrix(slot).to_cols_array_2d(),
                curve: slot.material.curve(),
                _padding: [0.0; 3],
            };
            let offset = i * stride as usize;
            let bytes = bytemuck::bytes_of(&uniform);
            data[offset..offset + bytes.len()].copy_from_slice(bytes);
        }
        self.gpu.queue.write_buffer(&self.pipeline.model_buffer, 0, &data);
        stride
    }
}

impl RenderBackend for WgpuRenderer {
    fn prepare(&mut self, geometry: &PlaneGeometry) {
        let device = &self.gpu.device;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("slide plane vertices"),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("slide plane indices"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        log::debug!(
            "plane mesh uploaded: {} vertices, {} indices",
            geometry.vertex_count(),
            geometry.index_count()
        );
        self.mesh = Some(PlaneMesh {
            vertex_buffer,
            index_buffer,
            index_count: geometry.index_count(),
        });
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    fn upload_texture(&mut self, label: &str, image: &DecodedImage) -> Result<TextureHandle, RenderError> {
        self.textures.upload(
            &self.gpu,
            &self.pipeline.texture_bind_group_layout,
            &self.pipeline.sampler,
            label,
            image,
        )
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        self.textures.release(handle);
    }

    fn render(&mut self, scene: &SceneGraph) -> Result<(), RenderError> {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Frame(e)),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let camera = CameraUniform {
            view_proj: scene.camera().view_projection().to_cols_array_2d(),
        };
        self.gpu
            .queue
            .write_buffer(&self.pipeline.camera_buffer, 0, bytemuck::cast_slice(&[camera]));

        let stride = self.write_slot_uniforms(scene);

        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("slide encoder"),
        });
        {
            let [r, g, b, a] = self.clear_color.0;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("slide pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(mesh) = &self.mesh {
                pass.set_pipeline(&self.pipeline.pipeline);
                pass.set_bind_group(0, &self.pipeline.camera_bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                for (i, slot) in scene.slots().iter().enumerate() {
                    let texture = self.textures.get(slot.material.texture());
                    pass.set_bind_group(1, &texture.bind_group, &[]);
                    pass.set_bind_group(2, &self.pipeline.model_bind_group, &[i as u32 * stride]);
                    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        self.mesh = None;
        self.textures.clear();
        log::debug!("renderer resources released");
    }
}
