//! # Animation Driver — Autoplay and the Render Loop
//!
//! Two independent frame loops live here:
//!
//! ```text
//!  Render loop ── every frame while started ── draw, texture check /10
//!  Advance loop ─ every frame while playing ── move scene, texture check /10
//! ```
//!
//! Pausing cancels only the advance loop, so the screen keeps painting
//! (drags, snaps and texture swaps still show up) while autoplay is frozen.
//!
//! ## Autoplay Motion
//!
//! ```text
//!  time    += direction × Δt_ms × 0.00001
//!  scene_x  = normalize(time × speed)
//! ```
//!
//! `time` accumulates in f64 and `time × speed` is folded into the cycle in
//! f64 before it narrows to the scene's f32. `time` is then re-derived from
//! the folded position, so it stays bounded however long autoplay runs.
//! The first tick after `start` or `resume` uses Δt = 0: the loop had no
//! previous frame to measure from.
//!
//! The advance loop only writes the scene while the driver owns it. When a
//! drag's snap lands, [`sync_to`](AnimationDriver::sync_to) re-anchors
//! `time` to the resulting offset so autoplay continues from there instead
//! of jumping back to where it would have been.

use std::time::Duration;

use crate::math::normalize_in_cycle_f64;
use crate::scene::{SceneGraph, SceneWriter};
use crate::scheduler::{FrameScheduler, Task, TaskHandle};

/// Frames between visibility checks, counted separately per loop.
pub const TEXTURE_CHECK_INTERVAL: u64 = 10;
/// Autoplay time units per millisecond of frame time.
const TIME_SCALE: f64 = 0.00001;

/// Drives the render and autoplay loops.
#[derive(Debug)]
pub struct AnimationDriver {
    speed: f32,
    direction: f32,
    time: f64,
    running: bool,
    paused: bool,
    render_task: Option<TaskHandle>,
    advance_task: Option<TaskHandle>,
    last_advance: Option<Duration>,
    render_ticks: u64,
    advance_ticks: u64,
}

impl AnimationDriver {
    pub fn new(speed: f32, direction: f32) -> Self {
        Self {
            speed,
            direction: direction_sign(direction),
            time: 0.0,
            running: false,
            paused: true,
            render_task: None,
            advance_task: None,
            last_advance: None,
            render_ticks: 0,
            advance_ticks: 0,
        }
    }

    /// Start the render loop, and the advance loop if `auto_play`.
    ///
    /// Restarting a running driver cancels its old loops first.
    pub fn start(&mut self, auto_play: bool, scheduler: &mut FrameScheduler) {
        self.stop(scheduler);
        self.running = true;
        self.render_ticks = 0;
        self.advance_ticks = 0;
        self.render_task = Some(scheduler.request_frame(Task::Render));
        self.paused = true;
        if auto_play {
            self.resume(scheduler);
        }
        log::debug!("animation started (autoplay: {auto_play})");
    }

    /// Freeze autoplay. Rendering continues.
    pub fn pause(&mut self, scheduler: &mut FrameScheduler) {
        if let Some(task) = self.advance_task.take() {
            scheduler.cancel(task);
        }
        self.paused = true;
        self.last_advance = None;
    }

    /// Continue autoplay from the current time.
    pub fn resume(&mut self, scheduler: &mut FrameScheduler) {
        if !self.running || !self.paused {
            return;
        }
        self.paused = false;
        self.last_advance = None;
        self.advance_task = Some(scheduler.request_frame(Task::Advance));
    }

    /// Cancel both loops. Safe to call repeatedly.
    pub fn stop(&mut self, scheduler: &mut FrameScheduler) {
        if let Some(task) = self.render_task.take() {
            scheduler.cancel(task);
        }
        self.pause(scheduler);
        self.running = false;
    }

    pub fn update_options(&mut self, speed: f32, direction: f32) {
        self.speed = speed;
        self.direction = direction_sign(direction);
    }

    /// Rewind autoplay time to zero.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.last_advance = None;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Re-anchor time so that autoplay continues from `position_x`.
    pub fn sync_to(&mut self, position_x: f32) {
        if self.speed != 0.0 {
            self.time = position_x as f64 / self.speed as f64;
        }
    }

    /// One render loop step. Schedules the next and returns `true` when a
    /// texture visibility check is due.
    pub fn on_render(&mut self, scheduler: &mut FrameScheduler) -> bool {
        if !self.running {
            return false;
        }
        self.render_task = Some(scheduler.request_frame(Task::Render));
        self.render_ticks += 1;
        self.render_ticks % TEXTURE_CHECK_INTERVAL == 0
    }

    /// One advance loop step. Moves the scene if the driver owns it,
    /// schedules the next step and returns `true` when a texture visibility
    /// check is due.
    pub fn on_advance(&mut self, scene: &mut SceneGraph, scheduler: &mut FrameScheduler, now: Duration) -> bool {
        if !self.running || self.paused {
            return false;
        }

        let dt = self.last_advance.map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_advance = Some(now);
        self.time += self.direction as f64 * dt.as_secs_f64() * 1000.0 * TIME_SCALE;

        let speed = self.speed as f64;
        let position = normalize_in_cycle_f64(self.time * speed, scene.layout().cycle_width as f64);
        if speed != 0.0 {
            self.time = position / speed;
        }

        if scene.writer() == SceneWriter::Driver {
            scene.set_position_x(position as f32);
        }

        self.advance_task = Some(scheduler.request_frame(Task::Advance));
        self.advance_ticks += 1;
        self.advance_ticks % TEXTURE_CHECK_INTERVAL == 0
    }
}

/// Collapse a direction option to `-1.0` or `1.0`.
pub fn direction_sign(direction: f32) -> f32 {
    if direction < 0.0 { -1.0 } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::normalize_in_cycle;
    use crate::scene_init::{ContainerSize, SceneInitOptions, initialize_scene};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn scene() -> SceneGraph {
        let images: Vec<String> = (0..4).map(|i| format!("{i}.png")).collect();
        initialize_scene(ContainerSize::new(800, 600), &images, SceneInitOptions::default())
            .expect("valid container")
    }

    /// Dispatch one frame's worth of driver tasks. Returns (rendered, checks).
    fn frame(driver: &mut AnimationDriver, scene: &mut SceneGraph, sched: &mut FrameScheduler, now: Duration) -> (bool, u32) {
        let mut rendered = false;
        let mut checks = 0;
        for (h, task) in sched.take_due(now) {
            if !sched.claim(h) {
                continue;
            }
            let check = match task {
                Task::Render => {
                    rendered = true;
                    driver.on_render(sched)
                }
                Task::Advance => driver.on_advance(scene, sched, now),
                other => panic!("unexpected task {other:?}"),
            };
            checks += check as u32;
        }
        (rendered, checks)
    }

    #[test]
    fn start_without_autoplay_only_renders() {
        let mut sched = FrameScheduler::new();
        let mut driver = AnimationDriver::new(30.0, -1.0);
        driver.start(false, &mut sched);
        assert!(driver.is_paused());
        assert_eq!(sched.count(Task::Render), 1);
        assert_eq!(sched.count(Task::Advance), 0);
    }

    #[test]
    fn autoplay_moves_scene_in_direction() {
        let mut sched = FrameScheduler::new();
        let mut scene = scene();
        let mut driver = AnimationDriver::new(30.0, -1.0);
        driver.start(true, &mut sched);

        // First tick has no previous frame: no movement.
        frame(&mut driver, &mut scene, &mut sched, ms(1000));
        assert_eq!(scene.position_x(), 0.0);

        frame(&mut driver, &mut scene, &mut sched, ms(1100));
        // -1 × 100 ms × 0.00001 × 30
        assert!((scene.position_x() + 0.03).abs() < 1e-6, "got {}", scene.position_x());
        assert!((driver.time() + 0.001).abs() < 1e-12);
    }

    #[test]
    fn pause_freezes_scene_but_keeps_rendering() {
        let mut sched = FrameScheduler::new();
        let mut scene = scene();
        let mut driver = AnimationDriver::new(30.0, 1.0);
        driver.start(true, &mut sched);
        frame(&mut driver, &mut scene, &mut sched, ms(0));
        frame(&mut driver, &mut scene, &mut sched, ms(16));
        let frozen = scene.position_x();
        assert!(frozen > 0.0);

        driver.pause(&mut sched);
        let (rendered, _) = frame(&mut driver, &mut scene, &mut sched, ms(32));
        assert!(rendered);
        assert_eq!(scene.position_x(), frozen);
    }

    #[test]
    fn resume_does_not_jump_by_paused_time() {
        let mut sched = FrameScheduler::new();
        let mut scene = scene();
        let mut driver = AnimationDriver::new(30.0, 1.0);
        driver.start(true, &mut sched);
        frame(&mut driver, &mut scene, &mut sched, ms(0));
        driver.pause(&mut sched);
        let t = driver.time();

        driver.resume(&mut sched);
        frame(&mut driver, &mut scene, &mut sched, ms(60_000));
        assert_eq!(driver.time(), t);
    }

    #[test]
    fn texture_checks_every_ten_ticks_per_loop() {
        let mut sched = FrameScheduler::new();
        let mut scene = scene();
        let mut driver = AnimationDriver::new(30.0, -1.0);
        driver.start(true, &mut sched);
        let mut checks = 0;
        for i in 0..20 {
            checks += frame(&mut driver, &mut scene, &mut sched, ms(i * 16)).1;
        }
        // Two per loop over 20 frames.
        assert_eq!(checks, 4);
    }

    #[test]
    fn advance_yields_to_other_writers() {
        let mut sched = FrameScheduler::new();
        let mut scene = scene();
        let mut driver = AnimationDriver::new(30.0, -1.0);
        driver.start(true, &mut sched);
        frame(&mut driver, &mut scene, &mut sched, ms(0));

        scene.set_writer(SceneWriter::Drag);
        scene.set_position_x(0.7);
        frame(&mut driver, &mut scene, &mut sched, ms(500));
        assert_eq!(scene.position_x(), 0.7);
    }

    #[test]
    fn sync_continues_from_snapped_position() {
        let mut sched = FrameScheduler::new();
        let mut scene = scene();
        let mut driver = AnimationDriver::new(30.0, 1.0);
        driver.start(true, &mut sched);
        frame(&mut driver, &mut scene, &mut sched, ms(0));

        scene.set_position_x(1.1);
        driver.sync_to(1.1);
        frame(&mut driver, &mut scene, &mut sched, ms(10));
        // 1.1 + 10 ms × 0.00001 × 30
        assert!((scene.position_x() - 1.103).abs() < 1e-5, "got {}", scene.position_x());
    }

    #[test]
    fn stop_is_idempotent_and_cancels_loops() {
        let mut sched = FrameScheduler::new();
        let mut driver = AnimationDriver::new(30.0, -1.0);
        driver.start(true, &mut sched);
        driver.stop(&mut sched);
        driver.stop(&mut sched);
        assert_eq!(sched.pending_count(), 0);
        assert!(!driver.is_running());
        // Resume after stop does nothing.
        driver.resume(&mut sched);
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn reset_and_update_options() {
        let mut sched = FrameScheduler::new();
        let mut scene = scene();
        let mut driver = AnimationDriver::new(30.0, -1.0);
        driver.start(true, &mut sched);
        frame(&mut driver, &mut scene, &mut sched, ms(0));
        frame(&mut driver, &mut scene, &mut sched, ms(100));
        driver.reset();
        assert_eq!(driver.time(), 0.0);

        driver.update_options(60.0, 5.0);
        frame(&mut driver, &mut scene, &mut sched, ms(200));
        // Direction collapses to +1; Δt restarted after reset.
        assert_eq!(driver.time(), 0.0);
        frame(&mut driver, &mut scene, &mut sched, ms(300));
        assert!((scene.position_x() - 0.06).abs() < 1e-6);
    }

    #[test]
    fn long_autoplay_keeps_steady_steps() {
        let mut sched = FrameScheduler::new();
        let mut scene = scene();
        let mut driver = AnimationDriver::new(30.0, -1.0);
        driver.start(true, &mut sched);
        // A full day of leftward autoplay.
        driver.time = -86_400.0;
        frame(&mut driver, &mut scene, &mut sched, ms(0));

        let cycle = scene.layout().cycle_width;
        let mut last = scene.position_x();
        for i in 1..=60 {
            frame(&mut driver, &mut scene, &mut sched, ms(i * 16));
            let x = scene.position_x();
            // -30 × 16 ms × 0.00001, measured across the seam.
            let step = normalize_in_cycle(x - last, cycle);
            assert!((step + 0.0048).abs() < 1e-5, "frame {i}: step {step}");
            last = x;
        }
        assert!(driver.time().abs() <= (cycle as f64 / 2.0) / 30.0 + 1e-9);
    }
}
