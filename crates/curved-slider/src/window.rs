//! Window management via winit.
//!
//! Implements [`winit::application::ApplicationHandler`] to host one slider
//! in a desktop window. The window is the container: its inner size is the
//! container size, its cursor shows the grab affordance, and its mouse and
//! touch events become [`PointerEvent`]s.
//!
//! Pointer x is handed to the slider in logical pixels, so drag sensitivity
//! is the same on a 2x display as on a 1x one. Sizes stay physical.
//!
//! ```text
//! resumed          create window + renderer, mount
//! CursorMoved      MouseMove / cursor x
//! MouseInput(L)    MouseDown / MouseUp
//! CursorLeft       MouseLeave
//! Touch            primary finger → TouchStart / TouchMove / TouchEnd
//! Resized          controller.resize
//! RedrawRequested  reload config?, frame(elapsed), request_redraw
//! CloseRequested   unmount, exit
//! ```

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::{CursorIcon, Window, WindowId};

use crate::config::SliderConfig;
use crate::controller::SliderController;
use crate::input::{Container, CursorStyle, PointerEvent, PrimaryTouch, TouchAction};
use crate::render::WgpuRenderer;
use crate::texture::ThreadedImageLoader;
use crate::time::Time;
#[cfg(feature = "watch")]
use crate::watch::ConfigWatcher;

/// A winit window acting as the slider's container.
pub struct WinitContainer {
    window: Arc<Window>,
    touch_action: TouchAction,
}

impl WinitContainer {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            touch_action: TouchAction::default(),
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn touch_action(&self) -> TouchAction {
        self.touch_action
    }
}

impl Container for WinitContainer {
    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        let icon = match cursor {
            CursorStyle::Default => CursorIcon::Default,
            CursorStyle::Grab => CursorIcon::Grab,
            CursorStyle::Grabbing => CursorIcon::Grabbing,
        };
        self.window.set_cursor(icon);
    }

    fn set_touch_action(&mut self, action: TouchAction) {
        // Desktop windows have no page to scroll; the value is only recorded.
        log::trace!("touch action {:?}", action);
        self.touch_action = action;
    }
}

pub(crate) type WindowSlider = SliderController<WinitContainer, WgpuRenderer, ThreadedImageLoader>;

/// The application state that winit drives.
pub(crate) struct WinitApp {
    pub config: SliderConfig,
    pub slider: Option<WindowSlider>,
    pub time: Time,
    pub touch: PrimaryTouch,
    /// Last cursor x in logical pixels.
    pub cursor_x: f32,
    #[cfg(feature = "watch")]
    pub watcher: Option<ConfigWatcher>,
}

impl WinitApp {
    pub fn new(config: SliderConfig) -> Self {
        Self {
            config,
            slider: None,
            time: Time::new(),
            touch: PrimaryTouch::new(),
            cursor_x: 0.0,
            #[cfg(feature = "watch")]
            watcher: None,
        }
    }

    fn create_slider(&self, event_loop: &ActiveEventLoop) -> Option<WindowSlider> {
        let window_config = &self.config.window;
        let attrs = Window::default_attributes()
            .with_title(&window_config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                window_config.width as f64,
                window_config.height as f64,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                return None;
            }
        };

        let renderer = match WgpuRenderer::new(window.clone(), self.config.clear_color()) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("failed to initialize renderer: {e}");
                return None;
            }
        };

        let loader = ThreadedImageLoader::new(self.config.base_dir.clone());
        let slider = SliderController::new(WinitContainer::new(window), renderer, loader)
            .with_images(self.config.images.clone())
            .with_options(self.config.options)
            .with_load_timeout(self.config.load_timeout());
        Some(slider)
    }

    fn scale_factor(&self) -> f64 {
        self.slider
            .as_ref()
            .map_or(1.0, |s| s.container().window().scale_factor())
    }

    fn pointer(&mut self, event: PointerEvent) {
        let now = self.time.now();
        if let Some(slider) = self.slider.as_mut() {
            slider.handle_pointer(event, now);
        }
    }

    /// Apply a reloaded config to the running slider.
    #[cfg(feature = "watch")]
    fn reload_config(&mut self) {
        let Some(config) = self.watcher.as_mut().and_then(ConfigWatcher::poll) else {
            return;
        };
        let now = self.time.now();
        if let Some(slider) = self.slider.as_mut() {
            if config.window.title != self.config.window.title {
                slider.container().window().set_title(&config.window.title);
            }
            slider.backend_mut().set_clear_color(config.clear_color());
            slider.loader_mut().set_base_dir(config.base_dir.clone());
            slider.set_load_timeout(config.load_timeout());
            slider.reconfigure(config.images.clone(), config.options, now);
        }
        log::info!("config reloaded: {} images", config.images.len());
        self.config = config;
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.slider.is_some() {
            return;
        }
        let Some(mut slider) = self.create_slider(event_loop) else {
            event_loop.exit();
            return;
        };
        slider.mount(self.time.now());
        slider.container().window().request_redraw();
        self.slider = Some(slider);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested, exiting");
                if let Some(slider) = self.slider.as_mut() {
                    slider.unmount();
                }
                event_loop.exit();
            }

            WindowEvent::Resized(_) => {
                let now = self.time.now();
                if let Some(slider) = self.slider.as_mut() {
                    slider.resize(now);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_x = logical_x(position, self.scale_factor());
                self.pointer(PointerEvent::MouseMove { x: self.cursor_x });
            }

            WindowEvent::CursorLeft { .. } => self.pointer(PointerEvent::MouseLeave),

            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                // winit reports presses without a position; the last
                // CursorMoved is the press point.
                let event = match state {
                    ElementState::Pressed => PointerEvent::MouseDown { x: self.cursor_x },
                    ElementState::Released => PointerEvent::MouseUp,
                };
                self.pointer(event);
            }

            WindowEvent::Touch(touch) => {
                let x = logical_x(touch.location, self.scale_factor());
                let event = match touch.phase {
                    TouchPhase::Started => self.touch.start(touch.id, x),
                    TouchPhase::Moved => self.touch.moved(touch.id, x),
                    TouchPhase::Ended | TouchPhase::Cancelled => self.touch.end(touch.id),
                };
                if let Some(event) = event {
                    self.pointer(event);
                }
            }

            WindowEvent::RedrawRequested => {
                self.time.update();
                log::trace!(
                    "frame {} ({:.2} ms)",
                    self.time.frame_count(),
                    self.time.delta().as_secs_f64() * 1000.0
                );

                #[cfg(feature = "watch")]
                self.reload_config();

                if let Some(slider) = self.slider.as_mut() {
                    slider.frame(self.time.elapsed());
                    slider.container().window().request_redraw();
                }
            }

            _ => {}
        }
    }
}

/// Horizontal position of a window event in logical pixels.
fn logical_x(position: PhysicalPosition<f64>, scale_factor: f64) -> f32 {
    position.to_logical::<f64>(scale_factor).x as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_x_is_logical() {
        let position = PhysicalPosition::new(300.0, 40.0);
        assert_eq!(logical_x(position, 1.0), 300.0);
        assert_eq!(logical_x(position, 2.0), 150.0);
        assert_eq!(logical_x(position, 1.5), 200.0);
    }
}
