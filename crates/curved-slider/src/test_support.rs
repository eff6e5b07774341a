//! Fakes for exercising the slider without a window or GPU.

use crate::geometry::PlaneGeometry;
use crate::input::{Container, CursorStyle, TouchAction};
use crate::render::{RenderBackend, RenderError, TextureHandle};
use crate::scene::SceneGraph;
use crate::texture::{DecodedImage, ImageLoader, LoadError, LoadOutcome, LoadRequest};

/// A container whose size tests can change at will.
#[derive(Debug)]
pub(crate) struct FakeContainer {
    pub width: u32,
    pub height: u32,
    pub cursor: CursorStyle,
    pub touch_action: TouchAction,
    pub cursor_changes: usize,
}

impl FakeContainer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cursor: CursorStyle::Default,
            touch_action: TouchAction::Auto,
            cursor_changes: 0,
        }
    }
}

impl Container for FakeContainer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
        self.cursor_changes += 1;
    }

    fn set_touch_action(&mut self, action: TouchAction) {
        self.touch_action = action;
    }
}

/// Records every backend call instead of drawing.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub prepared: usize,
    pub resizes: Vec<(u32, u32)>,
    pub uploads: Vec<String>,
    pub released: Vec<TextureHandle>,
    /// Scene offset at each rendered frame.
    pub frames: Vec<f32>,
    pub releases: usize,
}

impl RenderBackend for RecordingBackend {
    fn prepare(&mut self, _geometry: &PlaneGeometry) {
        self.prepared += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn upload_texture(&mut self, label: &str, _image: &DecodedImage) -> Result<TextureHandle, RenderError> {
        self.uploads.push(label.to_owned());
        Ok(TextureHandle(self.uploads.len()))
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        if !handle.is_placeholder() {
            self.released.push(handle);
        }
    }

    fn render(&mut self, scene: &SceneGraph) -> Result<(), RenderError> {
        self.frames.push(scene.position_x());
        Ok(())
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}

/// An image loader completed by hand.
#[derive(Debug, Default)]
pub(crate) struct ManualLoader {
    pub requests: Vec<LoadRequest>,
    ready: Vec<LoadOutcome>,
}

impl ManualLoader {
    pub fn succeed(&mut self, request: &LoadRequest) {
        self.ready.push(LoadOutcome {
            id: request.id,
            slot: request.slot,
            result: Ok(DecodedImage::solid(2, 2, [200, 10, 10, 255])),
        });
    }

    pub fn fail(&mut self, request: &LoadRequest) {
        let error = image::ImageError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        self.ready.push(LoadOutcome {
            id: request.id,
            slot: request.slot,
            result: Err(LoadError::Decode {
                path: request.source.clone().into(),
                error,
            }),
        });
    }
}

impl ImageLoader for ManualLoader {
    fn request(&mut self, request: LoadRequest) {
        self.requests.push(request);
    }

    fn poll(&mut self) -> Vec<LoadOutcome> {
        std::mem::take(&mut self.ready)
    }
}
