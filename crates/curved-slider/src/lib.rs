//! # Curved Slider — An Infinite 3D Image Carousel
//!
//! A horizontally scrolling, endlessly looping carousel of images drawn on
//! curved planes with wgpu. It autoplays, can be dragged or swiped, snaps to
//! the nearest slide on release, and streams images in as they approach the
//! viewport.
//!
//! The core is host-agnostic: a [`SliderController`](controller::SliderController)
//! is generic over its [`Container`](input::Container),
//! [`RenderBackend`](render::RenderBackend) and
//! [`ImageLoader`](texture::ImageLoader), and every entry point takes the
//! current time explicitly. [`App`](app::App) wires it to a winit window.
//!
//! Start with `use curved_slider::prelude::*`.

pub mod animation;
pub mod app;
pub mod camera;
pub mod config;
pub mod controller;
pub mod drag;
pub mod geometry;
pub mod input;
pub mod math;
pub mod prelude;
pub mod render;
pub mod scene;
pub mod scene_init;
pub mod scheduler;
pub mod texture;
pub mod time;
pub mod tween;
pub mod window;

#[cfg(feature = "watch")]
pub mod watch;

#[cfg(test)]
mod test_support;
