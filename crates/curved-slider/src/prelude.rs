//! Convenience re-exports: `use curved_slider::prelude::*` for the common items.

pub use crate::app::{App, AppError};
pub use crate::config::{ConfigError, SliderConfig, SliderOptions, WindowConfig};
pub use crate::controller::{SliderController, SliderState};
pub use crate::input::{Container, CursorStyle, PointerEvent, TouchAction};
pub use crate::math::{Mat4, Vec2, Vec3, Vec4};
pub use crate::render::{ClearColor, RenderBackend, RenderError, TextureHandle, WgpuRenderer};
pub use crate::scene::{SceneGraph, SlideSlot, TextureState};
pub use crate::texture::{DecodedImage, ImageLoader, LoadError, ThreadedImageLoader};
pub use crate::time::Time;
pub use crate::window::WinitContainer;
#[cfg(feature = "watch")]
pub use crate::watch::ConfigWatcher;
