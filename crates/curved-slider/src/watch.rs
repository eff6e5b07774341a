//! # Config Hot-Reload
//!
//! [`ConfigWatcher`] watches a slider config file and hands back the
//! reloaded [`SliderConfig`] after the file settles, so a running gallery
//! picks up new images or options without restarting.
//!
//! ```text
//!  notify thread ──► mpsc ──► poll() ──► debounce 100 ms ──► SliderConfig::load
//! ```
//!
//! The parent directory is watched rather than the file itself: editors that
//! save atomically replace the file, which would silently end a watch on the
//! old inode. Events are filtered down to the config's file name.
//!
//! If the watcher cannot start, polling just returns nothing. Errors are
//! logged, not panicked.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::SliderConfig;

/// Quiet time required after the last event before reloading.
const DEBOUNCE_DURATION: Duration = Duration::from_millis(100);

/// Collapses a burst of events into one reload.
#[derive(Debug, Default)]
struct Debounce {
    last_event: Option<Instant>,
}

impl Debounce {
    fn mark(&mut self, at: Instant) {
        self.last_event = Some(at);
    }

    /// `true` once, when `now` is at least [`DEBOUNCE_DURATION`] past the
    /// last marked event.
    fn take_ready(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(at) if now.duration_since(at) >= DEBOUNCE_DURATION => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }
}

/// Watches one config file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    file_name: Option<std::ffi::OsString>,
    /// Kept alive for the lifetime of the watch. `None` if setup failed.
    _watcher: Option<RecommendedWatcher>,
    rx: mpsc::Receiver<Result<notify::Event, notify::Error>>,
    debounce: Debounce,
    disconnected: bool,
}

impl ConfigWatcher {
    /// Start watching `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();
        let file_name = path.file_name().map(|n| n.to_os_string());

        let watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .map_err(|e| log::warn!("Failed to create config watcher: {e}. Hot-reload disabled."))
        .ok()
        .and_then(|mut watcher| {
            let dir = watch_dir(&path);
            match watcher.watch(&dir, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    log::info!("watching '{}' for changes", path.display());
                    Some(watcher)
                }
                Err(e) => {
                    log::warn!("Failed to watch '{}': {e}", dir.display());
                    None
                }
            }
        });

        Self {
            path,
            file_name,
            _watcher: watcher,
            rx,
            debounce: Debounce::default(),
            disconnected: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain watcher events. Returns the reloaded config once the file has
    /// been quiet for the debounce window.
    pub fn poll(&mut self) -> Option<SliderConfig> {
        self.drain_events();
        if !self.debounce.take_ready(Instant::now()) {
            return None;
        }

        match SliderConfig::load(&self.path) {
            Ok(config) => {
                log::info!("reloaded '{}'", self.path.display());
                Some(config)
            }
            Err(e) => {
                log::warn!("Keeping previous config: {e}");
                None
            }
        }
    }

    fn drain_events(&mut self) {
        if self.disconnected {
            return;
        }
        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        continue;
                    }
                    if event.paths.iter().any(|p| self.is_config(p)) {
                        self.debounce.mark(Instant::now());
                    }
                }
                Ok(Err(e)) => log::warn!("Config watcher error: {e}"),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    log::warn!("Config watcher disconnected. Hot-reload disabled.");
                    self.disconnected = true;
                    break;
                }
            }
        }
    }

    fn is_config(&self, path: &Path) -> bool {
        self.file_name.is_some() && path.file_name() == self.file_name.as_deref()
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
