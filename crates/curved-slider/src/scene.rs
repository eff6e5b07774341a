//! # Scene — The Slot Collection and Its Offset
//!
//! A [`SceneGraph`] is the explicit context every slider component works on:
//! the laid-out [`SlideSlot`]s, the shared plane mesh, the camera and the
//! single horizontal offset that moves them all.
//!
//! ```text
//!              position_x
//!          ◄──────────────►
//!  ┌────┐ ┌────┐ ┌────┐ ┌────┐ ┌────┐
//!  │ s0 │ │ s1 │ │ s2 │ │ s3 │ │ s4 │ ...    world x of a slot =
//!  └────┘ └────┘ └────┘ └────┘ └────┘          position_x + horizontal_offset
//! ```
//!
//! ## Who Writes the Offset
//!
//! Three components move the scene: the animation driver (autoplay), the
//! drag controller (while pressed) and the snap tween (after release).
//! Exactly one of them owns `position_x` at any time, tracked by
//! [`SceneWriter`]. Ownership moves `Driver → Drag` on press,
//! `Drag → Snap` on release and `Snap → Driver` when the snap lands.
//!
//! Every write goes through [`SceneGraph::set_position_x`], which folds the
//! value back into `[-cycle/2, cycle/2)`.

use std::sync::Arc;

use crate::camera::PerspectiveCamera;
use crate::geometry::PlaneGeometry;
use crate::math::{Mat4, Vec3, normalize_in_cycle};
use crate::render::TextureHandle;
use crate::scene_init::{ContainerSize, Layout};

/// Load progress of a slot's image.
///
/// Moves only `Unloaded → Loading → Loaded` or `Loading → Unloaded` on
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
}

/// What a slot's plane is drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialBinding {
    /// The shared grey texel, until the image arrives.
    Placeholder { curve: f32 },
    Bound { texture: TextureHandle, curve: f32 },
}

impl MaterialBinding {
    pub fn curve(&self) -> f32 {
        match *self {
            Self::Placeholder { curve } | Self::Bound { curve, .. } => curve,
        }
    }

    /// The texture to sample: the bound one, or the placeholder.
    pub fn texture(&self) -> TextureHandle {
        match *self {
            Self::Placeholder { .. } => TextureHandle::PLACEHOLDER,
            Self::Bound { texture, .. } => texture,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound { .. })
    }
}

/// One plane in the looping sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideSlot {
    /// Position in the duplicated sequence, stable for the mount.
    pub index: usize,
    /// `images[index % images.len()]`.
    pub image_source: String,
    /// Static x placement relative to the scene offset.
    pub horizontal_offset: f32,
    pub texture_state: TextureState,
    pub material: MaterialBinding,
}

/// Which component currently owns the scene offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneWriter {
    #[default]
    Driver,
    Drag,
    Snap,
}

/// The mounted scene: slots, mesh, camera and offset.
#[derive(Debug)]
pub struct SceneGraph {
    position_x: f32,
    writer: SceneWriter,
    pub(crate) slots: Vec<SlideSlot>,
    pub(crate) geometry: Arc<PlaneGeometry>,
    pub(crate) layout: Layout,
    pub(crate) camera: PerspectiveCamera,
    pub(crate) viewport: ContainerSize,
}

impl SceneGraph {
    pub(crate) fn new(
        slots: Vec<SlideSlot>,
        geometry: Arc<PlaneGeometry>,
        layout: Layout,
        camera: PerspectiveCamera,
        viewport: ContainerSize,
    ) -> Self {
        Self {
            position_x: 0.0,
            writer: SceneWriter::Driver,
            slots,
            geometry,
            layout,
            camera,
            viewport,
        }
    }

    /// Current offset, always within `[-cycle/2, cycle/2)`.
    pub fn position_x(&self) -> f32 {
        self.position_x
    }

    /// Write the offset, normalized into the loop cycle.
    pub fn set_position_x(&mut self, x: f32) {
        self.position_x = normalize_in_cycle(x, self.layout.cycle_width);
    }

    pub fn writer(&self) -> SceneWriter {
        self.writer
    }

    pub fn set_writer(&mut self, writer: SceneWriter) {
        if self.writer != writer {
            log::trace!("scene writer {:?} -> {:?}", self.writer, writer);
            self.writer = writer;
        }
    }

    pub fn slots(&self) -> &[SlideSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&SlideSlot> {
        self.slots.get(index)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn viewport(&self) -> ContainerSize {
        self.viewport
    }

    pub fn geometry(&self) -> &PlaneGeometry {
        &self.geometry
    }

    /// Apply a new container size to the camera and viewport.
    pub(crate) fn set_viewport(&mut self, size: ContainerSize) {
        self.viewport = size;
        self.camera.set_viewport(size.width, size.height);
    }

    /// World-space x of a slot's center.
    pub fn slot_world_x(&self, slot: &SlideSlot) -> f32 {
        self.position_x + slot.horizontal_offset
    }

    /// Model matrix for a slot: a pure translation along x.
    pub fn model_matrix(&self, slot: &SlideSlot) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.slot_world_x(slot), 0.0, 0.0))
    }

    /// Number of slots with a bound image.
    pub fn loaded_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.texture_state == TextureState::Loaded)
            .count()
    }
}
