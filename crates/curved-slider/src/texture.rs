//! # Texture Streaming — Load Only What Can Be Seen
//!
//! A slider can hold dozens of slots, but only the few near the viewport
//! need real images. The [`TextureStreamer`] walks the slots, projects each
//! one to screen space and requests a load for the ones close enough to be
//! seen soon. Everything else keeps the shared grey placeholder.
//!
//! ## How It Works
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  TextureStreamer (frame thread)                          │
//! │                                                          │
//! │  check_and_load ──► ImageLoader::request ──► worker      │
//! │    Unloaded → Loading                        pool        │
//! │                                              decodes     │
//! │  poll ◄────────── ImageLoader::poll ◄──────  RGBA8       │
//! │    Loading → Loaded    (upload, bind)                    │
//! │    Loading → Unloaded  (error, timeout)                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Decoding happens off-thread; results come back over a channel and are
//! applied in [`poll`](TextureStreamer::poll) on the frame thread, so slot
//! state is never touched concurrently. The `Loading` state is the guard
//! against two loads for the same slot.
//!
//! ## Visibility Band
//!
//! A slot qualifies when its projected center lies within the viewport
//! widened by 30% on both sides:
//!
//! ```text
//!   -0.3w        0                    w        1.3w
//!     ├──────────┼────────────────────┼──────────┤
//!     │ preload  │      viewport      │ preload  │
//! ```
//!
//! ## Request Ids
//!
//! Every request carries a fresh [`RequestId`]. An outcome is applied only
//! if its id is still the one in flight for that slot. Results that arrive
//! after a timeout, a dispose or a remount are dropped.
//!
//! ## Comparison
//!
//! - **three.js**: `TextureLoader.load` with callbacks; textures are swapped
//!   into materials from the callback.
//! - **Bevy**: `AssetServer::load` returns a handle immediately and the
//!   asset fills in asynchronously.
//! - **Our approach**: explicit request/poll over a channel, applied once
//!   per frame.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use crate::math::{VISIBILITY_THRESHOLD, Vec3, within_preload_band};
use crate::render::RenderBackend;
use crate::scene::{MaterialBinding, SceneGraph, TextureState};

/// A decoded image, tightly packed RGBA8 rows.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// A `width × height` image filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self { width, height, pixels }
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

/// A request to fetch and decode one slot's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub id: RequestId,
    pub slot: usize,
    pub source: String,
}

/// The result of a [`LoadRequest`].
#[derive(Debug)]
pub struct LoadOutcome {
    pub id: RequestId,
    pub slot: usize,
    pub result: Result<DecodedImage, LoadError>,
}

/// Why an image did not load.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read or decoded.
    Decode { path: PathBuf, error: image::ImageError },
    /// No worker thread could be started for the load.
    Spawn(std::io::Error),
    /// The load took longer than the configured timeout.
    Timeout { after: Duration },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { path, error } => write!(f, "failed to load '{}': {error}", path.display()),
            Self::Spawn(e) => write!(f, "failed to start image loader thread: {e}"),
            Self::Timeout { after } => write!(f, "load timed out after {after:?}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { error, .. } => Some(error),
            Self::Spawn(e) => Some(e),
            Self::Timeout { .. } => None,
        }
    }
}

/// Asynchronous image fetching.
pub trait ImageLoader {
    /// Start loading. The outcome is returned by a later [`poll`](Self::poll).
    fn request(&mut self, request: LoadRequest);

    /// Outcomes that finished since the last call.
    fn poll(&mut self) -> Vec<LoadOutcome>;
}

/// Worker threads a [`ThreadedImageLoader`] starts by default.
pub const DEFAULT_LOADER_WORKERS: usize = 4;

/// One decode for a worker.
struct DecodeJob {
    id: RequestId,
    slot: usize,
    path: PathBuf,
}

/// Decodes images from disk on a small fixed pool of worker threads.
///
/// Workers start on demand, up to the pool size, and share one job queue.
/// They exit when the loader is dropped. Relative sources resolve against
/// `base_dir` when one is set.
pub struct ThreadedImageLoader {
    base_dir: Option<PathBuf>,
    pool_size: usize,
    workers: Vec<thread::JoinHandle<()>>,
    jobs_tx: mpsc::Sender<DecodeJob>,
    jobs_rx: Arc<Mutex<mpsc::Receiver<DecodeJob>>>,
    tx: mpsc::Sender<LoadOutcome>,
    rx: mpsc::Receiver<LoadOutcome>,
}

impl ThreadedImageLoader {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self::with_workers(base_dir, DEFAULT_LOADER_WORKERS)
    }

    /// A loader that decodes on at most `pool_size` threads (at least one).
    pub fn with_workers(base_dir: Option<PathBuf>, pool_size: usize) -> Self {
        let (jobs_tx, jobs_rx) = mpsc::channel();
        let (tx, rx) = mpsc::channel();
        Self {
            base_dir,
            pool_size: pool_size.max(1),
            workers: Vec::new(),
            jobs_tx,
            jobs_rx: Arc::new(Mutex::new(jobs_rx)),
            tx,
            rx,
        }
    }

    pub fn set_base_dir(&mut self, base_dir: Option<PathBuf>) {
        self.base_dir = base_dir;
    }

    /// Number of worker threads started so far.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    fn resolve(&self, source: &str) -> PathBuf {
        let path = Path::new(source);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Start another worker if the pool is not full yet.
    fn grow(&mut self) -> std::io::Result<()> {
        if self.workers.len() >= self.pool_size {
            return Ok(());
        }
        let jobs = Arc::clone(&self.jobs_rx);
        let tx = self.tx.clone();
        let handle = thread::Builder::new()
            .name(format!("slide-loader-{}", self.workers.len()))
            .spawn(move || run_worker(&jobs, &tx))?;
        self.workers.push(handle);
        Ok(())
    }
}

fn run_worker(jobs: &Mutex<mpsc::Receiver<DecodeJob>>, tx: &mpsc::Sender<LoadOutcome>) {
    loop {
        // Hold the lock only while waiting for the next job.
        let job = match jobs.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => return,
        };
        let Ok(DecodeJob { id, slot, path }) = job else {
            // The loader was dropped.
            return;
        };
        let result = decode_rgba8(&path);
        if tx.send(LoadOutcome { id, slot, result }).is_err() {
            return;
        }
    }
}

impl Default for ThreadedImageLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ImageLoader for ThreadedImageLoader {
    fn request(&mut self, request: LoadRequest) {
        let LoadRequest { id, slot, source } = request;

        if let Err(e) = self.grow() {
            if self.workers.is_empty() {
                let _ = self.tx.send(LoadOutcome {
                    id,
                    slot,
                    result: Err(LoadError::Spawn(e)),
                });
                return;
            }
            log::warn!("image loader stays at {} workers: {e}", self.workers.len());
        }

        let path = self.resolve(&source);
        // Workers hold the receiver for as long as the loader lives.
        let _ = self.jobs_tx.send(DecodeJob { id, slot, path });
    }

    fn poll(&mut self) -> Vec<LoadOutcome> {
        self.rx.try_iter().collect()
    }
}

/// Read and decode an image file into RGBA8.
pub fn decode_rgba8(path: &Path) -> Result<DecodedImage, LoadError> {
    let img = image::open(path)
        .map_err(|error| LoadError::Decode {
            path: path.to_path_buf(),
            error,
        })?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(DecodedImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    id: RequestId,
    started: Duration,
}

/// Tracks which slots are loading and applies finished loads.
#[derive(Debug, Default)]
pub struct TextureStreamer {
    in_flight: HashMap<usize, InFlight>,
    next_request: u64,
    load_timeout: Option<Duration>,
}

impl TextureStreamer {
    pub fn new(load_timeout: Option<Duration>) -> Self {
        Self {
            load_timeout,
            ..Self::default()
        }
    }

    pub fn set_load_timeout(&mut self, timeout: Option<Duration>) {
        self.load_timeout = timeout;
    }

    /// Number of loads waiting for an outcome.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Request loads for every unloaded slot inside the visibility band.
    ///
    /// Returns how many loads were started.
    pub fn check_and_load(&mut self, scene: &mut SceneGraph, loader: &mut impl ImageLoader, now: Duration) -> usize {
        let viewport_width = scene.viewport().width as f32;
        if viewport_width <= 0.0 {
            return 0;
        }

        let camera = *scene.camera();
        let position_x = scene.position_x();
        let mut started = 0;

        for slot in &mut scene.slots {
            if slot.texture_state != TextureState::Unloaded {
                continue;
            }
            let world = Vec3::new(position_x + slot.horizontal_offset, 0.0, 0.0);
            let screen_x = camera.screen_x(world, viewport_width);
            if !within_preload_band(screen_x, viewport_width, VISIBILITY_THRESHOLD) {
                continue;
            }

            let id = RequestId(self.next_request);
            self.next_request += 1;
            slot.texture_state = TextureState::Loading;
            self.in_flight.insert(slot.index, InFlight { id, started: now });
            log::debug!("slot {}: loading '{}'", slot.index, slot.image_source);
            loader.request(LoadRequest {
                id,
                slot: slot.index,
                source: slot.image_source.clone(),
            });
            started += 1;
        }

        started
    }

    /// Apply finished loads and expire timed-out ones.
    ///
    /// Returns how many slots were bound to a new texture.
    pub fn poll(
        &mut self,
        scene: &mut SceneGraph,
        loader: &mut impl ImageLoader,
        backend: &mut impl RenderBackend,
        now: Duration,
    ) -> usize {
        let mut bound = 0;

        for outcome in loader.poll() {
            let current = self.in_flight.get(&outcome.slot).map(|f| f.id);
            if current != Some(outcome.id) {
                log::debug!("slot {}: dropping stale load {:?}", outcome.slot, outcome.id);
                continue;
            }
            self.in_flight.remove(&outcome.slot);

            let Some(slot) = scene.slots.get_mut(outcome.slot) else {
                continue;
            };

            match outcome.result {
                Ok(image) => match backend.upload_texture(&slot.image_source, &image) {
                    Ok(texture) => {
                        let curve = slot.material.curve();
                        // The placeholder is shared, so there is nothing to free.
                        slot.material = MaterialBinding::Bound { texture, curve };
                        slot.texture_state = TextureState::Loaded;
                        bound += 1;
                        log::debug!(
                            "slot {}: bound '{}' ({}x{})",
                            slot.index,
                            slot.image_source,
                            image.width,
                            image.height
                        );
                    }
                    Err(e) => {
                        log::warn!("slot {}: upload of '{}' failed: {e}", slot.index, slot.image_source);
                        slot.texture_state = TextureState::Unloaded;
                    }
                },
                Err(e) => {
                    log::warn!("slot {}: {e}", slot.index);
                    slot.texture_state = TextureState::Unloaded;
                }
            }
        }

        if let Some(timeout) = self.load_timeout {
            let expired: Vec<usize> = self
                .in_flight
                .iter()
                .filter(|(_, f)| now.saturating_sub(f.started) >= timeout)
                .map(|(&slot, _)| slot)
                .collect();
            for index in expired {
                self.in_flight.remove(&index);
                if let Some(slot) = scene.slots.get_mut(index) {
                    log::warn!("slot {index}: {}", LoadError::Timeout { after: timeout });
                    slot.texture_state = TextureState::Unloaded;
                }
            }
        }

        bound
    }

    /// Release every bound texture and forget in-flight loads.
    ///
    /// Slots go back to the placeholder. Safe to call repeatedly.
    pub fn dispose(&mut self, scene: &mut SceneGraph, backend: &mut impl RenderBackend) {
        let mut released = 0;
        for slot in &mut scene.slots {
            if let MaterialBinding::Bound { texture, curve } = slot.material {
                backend.release_texture(texture);
                slot.material = MaterialBinding::Placeholder { curve };
                released += 1;
            }
            slot.texture_state = TextureState::Unloaded;
        }
        if released > 0 || !self.in_flight.is_empty() {
            log::debug!(
                "texture streamer disposed ({released} released, {} in flight dropped)",
                self.in_flight.len()
            );
        }
        self.in_flight.clear();
    }
}
