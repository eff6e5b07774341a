//! # Drag — Pointer Control and Snap
//!
//! Converts horizontal pointer and touch motion into scene translation, then
//! settles the carousel on the nearest slide when the pointer lets go.
//!
//! ## Gesture Lifecycle
//!
//! ```text
//!  press ─────► move* ─────► release / leave
//!   │            │             │
//!   │ origin =   │ x = origin  │ target = nearest multiple of pitch
//!   │ scene x    │  + Δpx·0.01 │ 300 ms cubic ease-out toward it
//!   ▼            ▼             ▼
//!  writer=Drag  (normalized)  writer=Snap ──(done)──► writer=Driver
//! ```
//!
//! A press during a snap cancels the snap and starts a new drag from
//! wherever the snap had got to.
//!
//! ## Snapping Across the Seam
//!
//! The offset lives in `[-cycle/2, cycle/2)`. Near the seam the nearest
//! multiple can be `cycle/2` itself, outside the range. The tween heads for
//! that un-normalized target and each sample is normalized on write, so the
//! motion is the short hop a user expects and the final value lands on the
//! equivalent in-range slide.

use std::time::Duration;

use crate::input::{Container, CursorStyle, PointerEvent, TouchAction};
use crate::math::{nearest_multiple, width_with_gap};
use crate::scene::{SceneGraph, SceneWriter};
use crate::scheduler::{FrameScheduler, Task, TaskHandle};
use crate::tween::{EaseFunction, Tween};

/// World units moved per pixel of pointer travel.
pub const DRAG_SENSITIVITY: f32 = 0.01;
/// How long the release snap takes.
pub const SNAP_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy)]
struct Press {
    start_x: f32,
    origin: f32,
}

#[derive(Debug, Clone, Copy)]
struct ActiveSnap {
    tween: Tween,
    task: TaskHandle,
}

/// What a snap frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapStep {
    /// No snap was running.
    Idle,
    Running,
    /// The snap landed and the driver owns the scene again.
    Finished,
}

/// Pointer-driven control of the scene offset.
#[derive(Debug)]
pub struct DragController {
    plane_space: f32,
    sensitivity: f32,
    attached: bool,
    press: Option<Press>,
    snap: Option<ActiveSnap>,
}

impl DragController {
    pub fn new(gap: f32) -> Self {
        Self {
            plane_space: width_with_gap(gap),
            sensitivity: DRAG_SENSITIVITY,
            attached: false,
            press: None,
            snap: None,
        }
    }

    /// Start listening on `container`: grab cursor, horizontal touch.
    pub fn attach(&mut self, container: &mut impl Container) {
        self.attached = true;
        container.set_cursor(CursorStyle::Grab);
        container.set_touch_action(TouchAction::PanY);
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some()
    }

    pub fn is_snapping(&self) -> bool {
        self.snap.is_some()
    }

    /// Recompute the snap pitch after the gap option changed.
    pub fn update_options(&mut self, gap: f32) {
        self.plane_space = width_with_gap(gap);
    }

    /// Feed one pointer event. Returns `true` if it moved or grabbed the scene.
    pub fn handle_event(
        &mut self,
        event: PointerEvent,
        scene: &mut SceneGraph,
        scheduler: &mut FrameScheduler,
        container: &mut impl Container,
        now: Duration,
    ) -> bool {
        if !self.attached {
            return false;
        }

        match event {
            PointerEvent::MouseDown { x } | PointerEvent::TouchStart { x } => {
                self.cancel_snap(scheduler);
                self.press = Some(Press {
                    start_x: x,
                    origin: scene.position_x(),
                });
                scene.set_writer(SceneWriter::Drag);
                container.set_cursor(CursorStyle::Grabbing);
                true
            }
            PointerEvent::MouseMove { x } | PointerEvent::TouchMove { x } => match self.press {
                Some(press) => {
                    scene.set_position_x(press.origin + (x - press.start_x) * self.sensitivity);
                    true
                }
                None => false,
            },
            PointerEvent::MouseUp | PointerEvent::MouseLeave | PointerEvent::TouchEnd => {
                if self.press.take().is_none() {
                    return false;
                }
                container.set_cursor(CursorStyle::Grab);
                self.begin_snap(scene, scheduler, now);
                true
            }
        }
    }

    fn begin_snap(&mut self, scene: &mut SceneGraph, scheduler: &mut FrameScheduler, now: Duration) {
        let from = scene.position_x();
        let to = nearest_multiple(from, self.plane_space);
        log::trace!("snap {from:.3} -> {to:.3}");
        let task = scheduler.request_frame(Task::Snap);
        self.snap = Some(ActiveSnap {
            tween: Tween::new(from, to, now, SNAP_DURATION, EaseFunction::CubicOut),
            task,
        });
        scene.set_writer(SceneWriter::Snap);
    }

    fn cancel_snap(&mut self, scheduler: &mut FrameScheduler) {
        if let Some(snap) = self.snap.take() {
            scheduler.cancel(snap.task);
        }
    }

    /// Advance the snap by one frame.
    pub fn on_snap_frame(&mut self, scene: &mut SceneGraph, scheduler: &mut FrameScheduler, now: Duration) -> SnapStep {
        let Some(snap) = self.snap.as_mut() else {
            return SnapStep::Idle;
        };

        scene.set_position_x(snap.tween.sample(now));
        if snap.tween.is_done(now) {
            self.snap = None;
            scene.set_writer(SceneWriter::Driver);
            SnapStep::Finished
        } else {
            snap.task = scheduler.request_frame(Task::Snap);
            SnapStep::Running
        }
    }

    /// Write the offset directly, outside of a gesture.
    pub fn set_position(&self, scene: &mut SceneGraph, x: f32) {
        scene.set_position_x(x);
    }

    pub fn current_position(&self, scene: &SceneGraph) -> f32 {
        scene.position_x()
    }

    /// Stop listening, cancel any snap, restore the container defaults.
    ///
    /// Safe to call repeatedly.
    pub fn dispose(&mut self, container: &mut impl Container, scheduler: &mut FrameScheduler) {
        self.cancel_snap(scheduler);
        self.press = None;
        if self.attached {
            self.attached = false;
            container.set_cursor(CursorStyle::Default);
            container.set_touch_action(TouchAction::Auto);
        }
    }
}
