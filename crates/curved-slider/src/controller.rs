//! # Slider Controller — Lifecycle and Frame Dispatch
//!
//! [`SliderController`] is the one object a host talks to. It owns the scene,
//! the scheduler and the three components that act on the scene, and runs
//! them from a single `frame(now)` call.
//!
//! ## Lifecycle
//!
//! ```text
//!                 mount
//!  Uninitialized ───────► Initializing ──(size ok)──► Ready ◄──┐
//!        ▲                  │    ▲                      │      │ settle
//!        │ no images        └────┘ retry 100 ms         │resize│ (100 ms)
//!        └──────────────────────                        ▼      │
//!                                                    Resizing ─┘
//!
//!  unmount from any state ──► Disposed (terminal)
//! ```
//!
//! Mounting, changing the image list and changing options all do a full
//! teardown (stop loops, dispose drag, release textures, drop the scene)
//! followed by a fresh init.
//!
//! ## One Frame
//!
//! ```text
//! frame(now)
//!   ├─ streamer.poll          apply finished image loads
//!   └─ for each due task (claimed):
//!        Render        draw; every 10th: visibility check
//!        Advance       autoplay step; every 10th: visibility check
//!        Snap          tween step; on landing the driver re-anchors
//!        InitRetry     try to lay out again
//!        ResizeSettle  re-apply size, remount if slots no longer cover
//! ```
//!
//! ## Resizing Without Re-Init
//!
//! A resize only updates the camera aspect and the surface size. The slot
//! count was chosen to cover the container at mount time, so 100 ms after
//! the last resize the controller checks whether it still does and
//! remounts only if the container grew past it.

use std::time::Duration;

use crate::animation::AnimationDriver;
use crate::config::SliderOptions;
use crate::drag::{DragController, SnapStep};
use crate::input::{Container, PointerEvent};
use crate::render::{RenderBackend, RenderError};
use crate::scene::SceneGraph;
use crate::scene_init::{ContainerSize, Layout, NotReady, initialize_scene};
use crate::scheduler::{FrameScheduler, Task, TaskHandle};
use crate::texture::{ImageLoader, TextureStreamer};

/// Delay before retrying a layout that was not ready.
pub const INIT_RETRY_DELAY: Duration = Duration::from_millis(100);
/// Quiet time after the last resize before the size is settled.
pub const RESIZE_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderState {
    Uninitialized,
    /// Waiting for the container to get a usable size.
    Initializing,
    Ready,
    /// Resized recently; settles back to `Ready`.
    Resizing,
    /// Unmounted for good.
    Disposed,
}

/// Owns a mounted slider and drives it frame by frame.
pub struct SliderController<C, B, L> {
    container: C,
    backend: B,
    loader: L,
    images: Vec<String>,
    options: SliderOptions,
    state: SliderState,
    mount_requested: bool,
    scheduler: FrameScheduler,
    scene: Option<SceneGraph>,
    streamer: TextureStreamer,
    drag: DragController,
    driver: AnimationDriver,
    init_retry: Option<TaskHandle>,
    resize_settle: Option<TaskHandle>,
}

impl<C: Container, B: RenderBackend, L: ImageLoader> SliderController<C, B, L> {
    pub fn new(container: C, backend: B, loader: L) -> Self {
        let options = SliderOptions::default();
        Self {
            container,
            backend,
            loader,
            images: Vec::new(),
            options,
            state: SliderState::Uninitialized,
            mount_requested: false,
            scheduler: FrameScheduler::new(),
            scene: None,
            streamer: TextureStreamer::new(None),
            drag: DragController::new(options.gap),
            driver: AnimationDriver::new(options.speed, options.direction),
            init_retry: None,
            resize_settle: None,
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn with_options(mut self, options: SliderOptions) -> Self {
        self.options = options.sanitized();
        self
    }

    pub fn with_load_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.streamer.set_load_timeout(timeout);
        self
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Tear down any previous instance and lay out the scene.
    ///
    /// With a zero-sized container this schedules a retry instead. With no
    /// images the controller stays `Uninitialized`.
    pub fn mount(&mut self, now: Duration) {
        if self.state == SliderState::Disposed {
            log::warn!("mount after unmount ignored");
            return;
        }
        self.mount_requested = true;
        self.teardown();

        if self.images.is_empty() {
            log::info!("no images, slider not mounted");
            self.state = SliderState::Uninitialized;
            return;
        }

        self.state = SliderState::Initializing;
        self.try_initialize(now);
    }

    /// Replace the image list. Remounts if already mounted.
    pub fn set_images(&mut self, images: Vec<String>, now: Duration) {
        self.images = images;
        self.remount_if_requested(now);
    }

    /// Replace the options. Remounts if already mounted.
    pub fn set_options(&mut self, options: SliderOptions, now: Duration) {
        self.options = options.sanitized();
        self.remount_if_requested(now);
    }

    /// Replace images and options together with a single remount.
    pub fn reconfigure(&mut self, images: Vec<String>, options: SliderOptions, now: Duration) {
        self.images = images;
        self.options = options.sanitized();
        self.remount_if_requested(now);
    }

    pub fn set_load_timeout(&mut self, timeout: Option<Duration>) {
        self.streamer.set_load_timeout(timeout);
    }

    /// Stop everything and release all resources. Idempotent.
    pub fn unmount(&mut self) {
        if self.state == SliderState::Disposed {
            return;
        }
        self.teardown();
        self.state = SliderState::Disposed;
        log::info!("slider unmounted");
    }

    fn remount_if_requested(&mut self, now: Duration) {
        if self.mount_requested && self.state != SliderState::Disposed {
            self.mount(now);
        }
    }

    fn try_initialize(&mut self, now: Duration) {
        let size = ContainerSize::from(self.container.size());
        let mut scene = match initialize_scene(size, &self.images, self.options.scene_init()) {
            Ok(scene) => scene,
            Err(NotReady::NoImages) => {
                self.state = SliderState::Uninitialized;
                return;
            }
            Err(reason) => {
                log::debug!("{reason}, retrying in {INIT_RETRY_DELAY:?}");
                self.init_retry = Some(self.scheduler.set_timeout(Task::InitRetry, now, INIT_RETRY_DELAY));
                return;
            }
        };

        self.backend.prepare(scene.geometry());
        self.backend.resize(size.width, size.height);

        self.streamer.check_and_load(&mut scene, &mut self.loader, now);
        if let Err(e) = self.backend.render(&scene) {
            report_render_error(&e);
        }

        self.drag.update_options(self.options.gap);
        self.drag.attach(&mut self.container);

        self.driver.update_options(self.options.speed, self.options.direction);
        self.driver.reset();
        self.driver.start(self.options.auto_play, &mut self.scheduler);

        log::info!(
            "slider mounted: {} images in {} slots at {}x{}",
            self.images.len(),
            scene.slots().len(),
            size.width,
            size.height
        );
        self.scene = Some(scene);
        self.state = SliderState::Ready;
    }

    fn teardown(&mut self) {
        self.driver.stop(&mut self.scheduler);
        self.drag.dispose(&mut self.container, &mut self.scheduler);
        if let Some(mut scene) = self.scene.take() {
            self.streamer.dispose(&mut scene, &mut self.backend);
            self.backend.release();
        }
        self.scheduler.clear();
        self.init_retry = None;
        self.resize_settle = None;
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// The container changed size. Applies the new aspect and surface size
    /// now and settles after [`RESIZE_SETTLE_DELAY`].
    pub fn resize(&mut self, now: Duration) {
        if !matches!(self.state, SliderState::Ready | SliderState::Resizing) {
            return;
        }
        let size = ContainerSize::from(self.container.size());
        if size.is_empty() {
            log::debug!("ignoring resize to {}x{}", size.width, size.height);
            return;
        }

        if let Some(scene) = self.scene.as_mut() {
            scene.set_viewport(size);
        }
        self.backend.resize(size.width, size.height);
        self.state = SliderState::Resizing;

        if let Some(task) = self.resize_settle.take() {
            self.scheduler.cancel(task);
        }
        self.resize_settle = Some(self.scheduler.set_timeout(Task::ResizeSettle, now, RESIZE_SETTLE_DELAY));
    }

    /// Route a pointer event to the drag controller.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Duration) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        self.drag
            .handle_event(event, scene, &mut self.scheduler, &mut self.container, now)
    }

    pub fn pause(&mut self) {
        self.driver.pause(&mut self.scheduler);
    }

    pub fn resume(&mut self) {
        self.driver.resume(&mut self.scheduler);
    }

    pub fn is_paused(&self) -> bool {
        self.driver.is_paused()
    }

    /// Jump to an offset, as if a snap had landed there.
    pub fn set_position(&mut self, x: f32) {
        if let Some(scene) = self.scene.as_mut() {
            self.drag.set_position(scene, x);
            self.driver.sync_to(scene.position_x());
        }
    }

    pub fn position(&self) -> Option<f32> {
        self.scene.as_ref().map(|scene| self.drag.current_position(scene))
    }

    // ── Frame ───────────────────────────────────────────────────────────

    /// Run everything due at `now`. Call once per display frame.
    pub fn frame(&mut self, now: Duration) {
        if self.state == SliderState::Disposed {
            return;
        }

        if let Some(scene) = self.scene.as_mut() {
            self.streamer.poll(scene, &mut self.loader, &mut self.backend, now);
        }

        for (handle, task) in self.scheduler.take_due(now) {
            if !self.scheduler.claim(handle) {
                continue;
            }
            match task {
                Task::Render => self.run_render(now),
                Task::Advance => self.run_advance(now),
                Task::Snap => self.run_snap(now),
                Task::InitRetry => {
                    self.init_retry = None;
                    if self.state == SliderState::Initializing {
                        self.try_initialize(now);
                    }
                }
                Task::ResizeSettle => {
                    self.resize_settle = None;
                    self.settle_resize(now);
                }
            }
        }
    }

    fn run_render(&mut self, now: Duration) {
        let check = self.driver.on_render(&mut self.scheduler);
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if check {
            self.streamer.check_and_load(scene, &mut self.loader, now);
        }
        if let Err(e) = self.backend.render(scene) {
            report_render_error(&e);
        }
    }

    fn run_advance(&mut self, now: Duration) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if self.driver.on_advance(scene, &mut self.scheduler, now) {
            self.streamer.check_and_load(scene, &mut self.loader, now);
        }
    }

    fn run_snap(&mut self, now: Duration) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if self.drag.on_snap_frame(scene, &mut self.scheduler, now) == SnapStep::Finished {
            self.driver.sync_to(scene.position_x());
        }
    }

    fn settle_resize(&mut self, now: Duration) {
        if self.state != SliderState::Resizing {
            return;
        }
        self.state = SliderState::Ready;

        let size = ContainerSize::from(self.container.size());
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if !size.is_empty() {
            scene.set_viewport(size);
            self.backend.resize(size.width, size.height);
        }

        let needed = Layout::compute(size, scene.camera(), self.images.len(), self.options.gap)
            .map(|layout| layout.total_slots)
            .unwrap_or(0);
        let have = scene.slots().len();
        if needed > have {
            log::info!("container now needs {needed} slots (have {have}), remounting");
            self.mount(now);
        } else {
            self.streamer.check_and_load(scene, &mut self.loader, now);
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn state(&self) -> SliderState {
        self.state
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    pub fn options(&self) -> &SliderOptions {
        &self.options
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }
}

fn report_render_error(error: &RenderError) {
    match error {
        RenderError::OutOfMemory => log::error!("{error}"),
        other => log::warn!("frame skipped: {other}"),
    }
}
