//! App builder.
//!
//! The [`App`] is the entry point for a windowed slider. Configure it, then
//! call [`run()`](App::run) to open the window and drive the event loop.
//!
//! ## Example
//!
//! ```ignore
//! use curved_slider::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     let config = SliderConfig::load("gallery.json".as_ref())?;
//!     App::new()
//!         .config(config)
//!         .watch_config("gallery.json")
//!         .run()
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

use winit::event_loop::{ControlFlow, EventLoop};

use crate::config::{ConfigError, SliderConfig};
use crate::window::WinitApp;

/// Errors that stop the app before or while running.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    EventLoop(winit::error::EventLoopError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::EventLoop(e) => write!(f, "event loop: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::EventLoop(e) => Some(e),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        Self::EventLoop(e)
    }
}

/// The app builder.
#[derive(Debug, Default)]
pub struct App {
    config: SliderConfig,
    title: Option<String>,
    watch_path: Option<PathBuf>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` for images, options and window settings.
    pub fn config(mut self, config: SliderConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the window title from the config.
    pub fn set_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Reload the config from `path` whenever the file changes.
    ///
    /// Only effective with the `watch` feature.
    pub fn watch_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.watch_path = Some(path.into());
        self
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), AppError> {
        let mut config = self.config;
        if let Some(title) = self.title {
            config.window.title = title;
        }

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = WinitApp::new(config);

        #[cfg(feature = "watch")]
        if let Some(path) = self.watch_path {
            log::info!("watching {}", path.display());
            app.watcher = Some(crate::watch::ConfigWatcher::new(path));
        }
        #[cfg(not(feature = "watch"))]
        if let Some(path) = self.watch_path {
            log::warn!("{} not watched: built without the `watch` feature", path.display());
        }

        event_loop.run_app(&mut app)?;
        Ok(())
    }
}
