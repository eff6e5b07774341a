//! # Pipeline — Slide Render Pipeline and GPU Resources
//!
//! Compared to a general 3D mesh pipeline, the slide pipeline is small:
//!
//! - **No depth buffer**: all slides sit at z = 0 and never overlap, so
//!   draw order is irrelevant.
//! - **No culling**: a strongly curved plane can turn edge-on; both faces
//!   draw.
//! - **Alpha blending**: transparent regions of an image show the clear
//!   color behind them.
//! - **Three bind groups**: camera (per frame), slide texture (per slot),
//!   slot uniform (per slot, dynamic offset). See [`vertex`](super::vertex).
//!
//! ## Dynamic Slot Buffer
//!
//! One uniform buffer holds a [`ModelUniform`] per slot at an aligned
//! stride (`min_uniform_buffer_offset_alignment`, typically 256 bytes). Each
//! draw passes its slot's byte offset. The buffer grows to the next power
//! of two when a mount has more slots than it can hold.

use wgpu::util::DeviceExt;

use super::GpuContext;
use super::vertex::{CameraUniform, ModelUniform, SlideVertex};

/// All long-lived GPU state for drawing slides.
pub(crate) struct SlidePipeline {
    pub pipeline: wgpu::RenderPipeline,

    pub texture_bind_group_layout: wgpu::BindGroupLayout,
    pub model_bind_group_layout: wgpu::BindGroupLayout,

    pub camera_buffer: wgpu::Buffer,
    pub camera_bind_group: wgpu::BindGroup,

    /// Shared by every slide texture.
    pub sampler: wgpu::Sampler,

    pub model_buffer: wgpu::Buffer,
    pub model_bind_group: wgpu::BindGroup,
    /// Number of `ModelUniform` slots the buffer holds.
    pub model_buffer_capacity: usize,
}

impl SlidePipeline {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        // ── Shader ──────────────────────────────────────────────────────
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("slide shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // ── Bind group layout 0: Camera (per frame) ────────────────────
        let camera_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("slide camera layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        // ── Bind group layout 1: Slide texture (per slot) ──────────────
        let texture_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("slide texture layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // ── Bind group layout 2: Slot uniform (dynamic offset) ─────────
        let model_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("slide model layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniform>() as u64),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("slide pipeline layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &texture_bind_group_layout,
                &model_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("slide pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[SlideVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.surface_format(),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // ── Camera buffer + bind group ──────────────────────────────────
        let camera_uniform = CameraUniform {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
        };
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("slide camera buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("slide camera bind group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Images stop at their edges instead of wrapping into the neighbor row.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("slide sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let initial_capacity = 32;
        let (model_buffer, model_bind_group) = create_model_buffer(device, &model_bind_group_layout, initial_capacity);

        Self {
            pipeline,
            texture_bind_group_layout,
            model_bind_group_layout,
            camera_buffer,
            camera_bind_group,
            sampler,
            model_buffer,
            model_bind_group,
            model_buffer_capacity: initial_capacity,
        }
    }

    /// Ensure the slot buffer can hold `count` entries. Returns the aligned
    /// stride in bytes.
    pub fn ensure_model_capacity(&mut self, device: &wgpu::Device, count: usize) -> u32 {
        let stride = model_stride(device);
        if count > self.model_buffer_capacity {
            let new_cap = count.next_power_of_two();
            let (buffer, bind_group) = create_model_buffer(device, &self.model_bind_group_layout, new_cap);
            self.model_buffer = buffer;
            self.model_bind_group = bind_group;
            self.model_buffer_capacity = new_cap;
            log::debug!("slot buffer grown to {new_cap} entries");
        }
        stride as u32
    }
}

fn model_stride(device: &wgpu::Device) -> usize {
    let align = device.limits().min_uniform_buffer_offset_alignment as usize;
    align_up(std::mem::size_of::<ModelUniform>(), align)
}

/// Create a dynamic slot uniform buffer with room for `capacity` entries.
fn create_model_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let size = (model_stride(device) * capacity) as u64;

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("slide model dynamic buffer"),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("slide model bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniform>() as u64),
            }),
        }],
    });

    (buffer, bind_group)
}

/// Round `value` up to the next multiple of `align` (a power of two).
pub(crate) fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}
