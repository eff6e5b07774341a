//! # Scheduler — Cancellable Frame and Timer Tasks
//!
//! Everything time-driven in the slider is a task in one [`FrameScheduler`]:
//!
//! | Task          | Wakes              | Owner              |
//! |---------------|--------------------|--------------------|
//! | `Render`      | every frame        | animation driver   |
//! | `Advance`     | every frame        | animation driver   |
//! | `Snap`        | every frame        | drag controller    |
//! | `InitRetry`   | after 100 ms       | slider controller  |
//! | `ResizeSettle`| after 100 ms       | slider controller  |
//!
//! Frame tasks are one-shot, like `requestAnimationFrame`: a loop keeps
//! itself alive by requesting the next frame from inside its handler.
//! Cancelling a handle stops the loop at its next step.
//!
//! ## Dispatch
//!
//! ```text
//! frame(now)
//!   take_due(now)  ── frame tasks + expired timers move to `running`
//!   for each (handle, task):
//!       claim(handle)?  ── false if cancelled by an earlier handler
//!       run handler     ── may request new tasks (run next frame)
//! ```
//!
//! The claim step matters when one handler tears down state another due
//! task belongs to, e.g. an init retry that remounts while the old render
//! task is already in this frame's batch.

use std::time::Duration;

/// Opaque handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// What a scheduled task does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Render,
    Advance,
    Snap,
    InitRetry,
    ResizeSettle,
}

#[derive(Debug, Clone, Copy)]
enum Wake {
    NextFrame,
    At(Duration),
}

#[derive(Debug)]
struct Pending {
    handle: TaskHandle,
    task: Task,
    wake: Wake,
}

/// Single-threaded task queue driven by the host's frame callback.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: Vec<Pending>,
    running: Vec<TaskHandle>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` on the next frame.
    pub fn request_frame(&mut self, task: Task) -> TaskHandle {
        self.push(task, Wake::NextFrame)
    }

    /// Run `task` on the first frame at or after `now + delay`.
    pub fn set_timeout(&mut self, task: Task, now: Duration, delay: Duration) -> TaskHandle {
        self.push(task, Wake::At(now + delay))
    }

    fn push(&mut self, task: Task, wake: Wake) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { handle, task, wake });
        handle
    }

    /// Cancel a pending or already-taken task. Returns `false` if the
    /// handle was unknown (finished or cancelled before).
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        if let Some(i) = self.pending.iter().position(|p| p.handle == handle) {
            self.pending.remove(i);
            return true;
        }
        if let Some(i) = self.running.iter().position(|&h| h == handle) {
            self.running.remove(i);
            return true;
        }
        false
    }

    /// Remove and return every task due at `now`, in request order.
    pub fn take_due(&mut self, now: Duration) -> Vec<(TaskHandle, Task)> {
        self.running.clear();
        let mut due = Vec::new();
        self.pending.retain(|p| {
            let ready = match p.wake {
                Wake::NextFrame => true,
                Wake::At(at) => at <= now,
            };
            if ready {
                due.push((p.handle, p.task));
            }
            !ready
        });
        self.running.extend(due.iter().map(|(h, _)| *h));
        due
    }

    /// Mark a taken task as started. Returns `false` if it was cancelled
    /// after [`take_due`](Self::take_due) handed it out.
    pub fn claim(&mut self, handle: TaskHandle) -> bool {
        match self.running.iter().position(|&h| h == handle) {
            Some(i) => {
                self.running.remove(i);
                true
            }
            None => false,
        }
    }

    /// Whether `handle` is still waiting to fire.
    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    /// Number of tasks waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of waiting tasks of the given kind.
    pub fn count(&self, task: Task) -> usize {
        self.pending.iter().filter(|p| p.task == task).count()
    }

    /// Drop every pending and running task.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.running.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn frame_tasks_fire_once() {
        let mut sched = FrameScheduler::new();
        let h = sched.request_frame(Task::Render);
        let due = sched.take_due(ms(0));
        assert_eq!(due, vec![(h, Task::Render)]);
        assert!(sched.claim(h));
        assert!(sched.take_due(ms(16)).is_empty());
    }

    #[test]
    fn timers_wait_for_their_deadline() {
        let mut sched = FrameScheduler::new();
        let h = sched.set_timeout(Task::InitRetry, ms(0), ms(100));
        assert!(sched.take_due(ms(50)).is_empty());
        assert!(sched.is_scheduled(h));
        assert_eq!(sched.take_due(ms(100)), vec![(h, Task::InitRetry)]);
        assert!(!sched.is_scheduled(h));
    }

    #[test]
    fn cancel_removes_pending_task() {
        let mut sched = FrameScheduler::new();
        let a = sched.request_frame(Task::Advance);
        let r = sched.request_frame(Task::Render);
        assert!(sched.cancel(a));
        assert!(!sched.cancel(a));
        assert_eq!(sched.take_due(ms(0)), vec![(r, Task::Render)]);
    }

    #[test]
    fn cancel_after_take_blocks_claim() {
        let mut sched = FrameScheduler::new();
        let a = sched.request_frame(Task::Advance);
        let r = sched.request_frame(Task::Render);
        let due = sched.take_due(ms(0));
        assert_eq!(due.len(), 2);
        assert!(sched.claim(a));
        // The advance handler tears down the render loop mid-frame.
        assert!(sched.cancel(r));
        assert!(!sched.claim(r));
    }

    #[test]
    fn tasks_requested_during_dispatch_run_next_frame() {
        let mut sched = FrameScheduler::new();
        let first = sched.request_frame(Task::Render);
        for (h, _) in sched.take_due(ms(0)) {
            assert!(sched.claim(h));
            sched.request_frame(Task::Render);
        }
        assert_eq!(sched.count(Task::Render), 1);
        let due = sched.take_due(ms(16));
        assert_eq!(due.len(), 1);
        assert_ne!(due[0].0, first);
    }

    #[test]
    fn clear_drops_everything() {
        let mut sched = FrameScheduler::new();
        sched.request_frame(Task::Render);
        sched.set_timeout(Task::ResizeSettle, ms(0), ms(100));
        sched.clear();
        assert_eq!(sched.pending_count(), 0);
        assert!(sched.take_due(ms(1000)).is_empty());
    }
}
