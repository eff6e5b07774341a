//! # Render — The GPU Side of the Slider
//!
//! The slider logic never talks to wgpu directly. It drives a
//! [`RenderBackend`], which owns every GPU resource: the device and surface,
//! the shared plane mesh, the slide textures and the per-slot uniforms.
//!
//! ```text
//! SliderController ──► RenderBackend
//!                        ├─ prepare(geometry)       mount
//!                        ├─ upload_texture(image)   texture streamer
//!                        ├─ release_texture(handle) texture streamer
//!                        ├─ resize(w, h)            container resize
//!                        ├─ render(scene)           render loop
//!                        └─ release()               unmount
//! ```
//!
//! [`WgpuRenderer`] is the real backend. Tests use a recording backend so
//! the controller's lifecycle can be exercised without a GPU.
//!
//! ## The Placeholder
//!
//! Texture handle 0 is always a 1×1 `#333333` texel, created with the store.
//! Slots bind it until their image arrives, so the shader has no
//! "untextured" branch. All slots share it, which is why releasing it is a
//! no-op.

pub mod draw;
pub mod gpu;
pub(crate) mod pipeline;
pub(crate) mod texture;
pub mod vertex;

use std::fmt;

use crate::geometry::PlaneGeometry;
use crate::scene::SceneGraph;
use crate::texture::DecodedImage;

pub use draw::WgpuRenderer;
pub use gpu::GpuContext;

/// Handle to a texture owned by a [`RenderBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) usize);

impl TextureHandle {
    /// The shared 1×1 grey placeholder.
    pub const PLACEHOLDER: TextureHandle = TextureHandle(0);

    pub fn is_placeholder(self) -> bool {
        self == Self::PLACEHOLDER
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// RGBA8 texel used for slots whose image has not loaded yet.
pub const PLACEHOLDER_TEXEL: [u8; 4] = [0x33, 0x33, 0x33, 0xff];

/// Background color the surface is cleared to before slides are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor(pub [f64; 4]);

impl Default for ClearColor {
    fn default() -> Self {
        Self([0.0, 0.0, 0.0, 1.0])
    }
}

/// Errors from GPU setup and frame submission.
#[derive(Debug)]
pub enum RenderError {
    /// The window surface could not be created.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter is compatible with the surface.
    Adapter(wgpu::RequestAdapterError),
    /// The adapter refused to create a device.
    Device(wgpu::RequestDeviceError),
    /// The GPU ran out of memory while acquiring a frame.
    OutOfMemory,
    /// The next frame could not be acquired.
    Frame(wgpu::SurfaceError),
    /// An image is larger than the device's maximum texture dimension.
    TextureTooLarge { width: u32, height: u32, max: u32 },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "failed to create surface: {e}"),
            Self::Adapter(e) => write!(f, "no suitable GPU adapter: {e}"),
            Self::Device(e) => write!(f, "failed to create GPU device: {e}"),
            Self::OutOfMemory => write!(f, "GPU out of memory"),
            Self::Frame(e) => write!(f, "failed to acquire frame: {e}"),
            Self::TextureTooLarge { width, height, max } => {
                write!(f, "texture {width}x{height} exceeds the {max}px limit")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            Self::Adapter(e) => Some(e),
            Self::Device(e) => Some(e),
            Self::Frame(e) => Some(e),
            Self::OutOfMemory | Self::TextureTooLarge { .. } => None,
        }
    }
}

/// Everything the slider needs from a renderer.
pub trait RenderBackend {
    /// Upload the shared plane mesh for a new mount.
    fn prepare(&mut self, geometry: &PlaneGeometry);

    /// Match the drawing surface to the container size.
    fn resize(&mut self, width: u32, height: u32);

    /// Upload a decoded image and return a handle for binding it.
    fn upload_texture(&mut self, label: &str, image: &DecodedImage) -> Result<TextureHandle, RenderError>;

    /// Free a texture. Releasing [`TextureHandle::PLACEHOLDER`] does nothing.
    fn release_texture(&mut self, handle: TextureHandle);

    /// Draw every slot of `scene` and present.
    fn render(&mut self, scene: &SceneGraph) -> Result<(), RenderError>;

    /// Drop per-mount resources (mesh, uniforms, slide textures).
    fn release(&mut self);
}
