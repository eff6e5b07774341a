//! # Texture Store — Slide Images on the GPU
//!
//! Slide textures live in an index-addressed store. A [`TextureHandle`] is
//! an index into it. Each entry is a ready-made bind group (texture view +
//! shared sampler), so drawing a slot is a single `set_bind_group`. The
//! bind group keeps the view and its texture alive.
//!
//! ## The 1×1 Grey Placeholder
//!
//! Entry 0 is always a single `#333333` texel. Every slot that has not
//! loaded yet samples it, so the shader never branches on "has texture".
//! It lives as long as the store and [`release`](TextureStore::release)
//! ignores it.
//!
//! ## Release and Reuse
//!
//! Released slots become `None` and their index goes on a free list. The
//! next upload reuses it, so a long session of remounts does not grow the
//! store without bound.

use wgpu::util::DeviceExt;

use super::{GpuContext, PLACEHOLDER_TEXEL, RenderError, TextureHandle};
use crate::texture::DecodedImage;

/// One uploaded texture.
pub(crate) struct TextureEntry {
    pub bind_group: wgpu::BindGroup,
}

/// All slide textures. Index 0 is reserved for the placeholder.
pub(crate) struct TextureStore {
    placeholder: TextureEntry,
    slots: Slots<TextureEntry>,
}

impl TextureStore {
    /// Create a store holding only the grey placeholder.
    pub fn new(gpu: &GpuContext, layout: &wgpu::BindGroupLayout, sampler: &wgpu::Sampler) -> Self {
        let placeholder = DecodedImage {
            width: 1,
            height: 1,
            pixels: PLACEHOLDER_TEXEL.to_vec(),
        };
        Self {
            placeholder: create_entry(gpu, layout, sampler, "slide placeholder 1x1", &placeholder),
            slots: Slots::new(),
        }
    }

    /// The entry for `handle`, falling back to the placeholder for
    /// released or unknown handles.
    pub fn get(&self, handle: TextureHandle) -> &TextureEntry {
        self.slots.get(handle.0).unwrap_or(&self.placeholder)
    }

    /// Upload RGBA8 data as a new texture.
    pub fn upload(
        &mut self,
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        label: &str,
        image: &DecodedImage,
    ) -> Result<TextureHandle, RenderError> {
        let max = gpu.device.limits().max_texture_dimension_2d;
        if image.width > max || image.height > max {
            return Err(RenderError::TextureTooLarge {
                width: image.width,
                height: image.height,
                max,
            });
        }

        let entry = create_entry(gpu, layout, sampler, label, image);
        Ok(TextureHandle(self.slots.insert(entry)))
    }

    /// Free a texture. The placeholder and unknown handles are ignored.
    pub fn release(&mut self, handle: TextureHandle) {
        if handle.is_placeholder() {
            return;
        }
        self.slots.remove(handle.0);
    }

    /// Free every texture except the placeholder.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of live textures, placeholder included.
    pub fn len(&self) -> usize {
        1 + self.slots.len()
    }
}

/// Index-addressed storage with a free list. Index 0 is never handed out.
struct Slots<T> {
    entries: Vec<Option<T>>,
    free: Vec<usize>,
}

impl<T> Slots<T> {
    fn new() -> Self {
        Self {
            entries: vec![None],
            free: Vec::new(),
        }
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    fn insert(&mut self, value: T) -> usize {
        match self.free.pop() {
            Some(index) => {
                self.entries[index] = Some(value);
                index
            }
            None => {
                self.entries.push(Some(value));
                self.entries.len() - 1
            }
        }
    }

    fn remove(&mut self, index: usize) -> Option<T> {
        if index == 0 {
            return None;
        }
        let removed = self.entries.get_mut(index).and_then(Option::take);
        if removed.is_some() {
            self.free.push(index);
        }
        removed
    }

    fn clear(&mut self) {
        self.entries.truncate(1);
        self.free.clear();
    }

    fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}

fn create_entry(
    gpu: &GpuContext,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    image: &DecodedImage,
) -> TextureEntry {
    let texture = gpu.device.create_texture_with_data(
        &gpu.queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width.max(1),
                height: image.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &image.pixels,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    TextureEntry { bind_group }
}
