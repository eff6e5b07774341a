//! # Scene Initializer — From Container Size to Laid-Out Slots
//!
//! Turns a container size, the image list and `{gap, direction, curve}`
//! into a [`SceneGraph`], or reports [`NotReady`] when there is nothing
//! sensible to lay out yet.
//!
//! ## Layout
//!
//! ```text
//!  container 800 px, 195 px per world unit, gap 10
//!
//!   plane_space     = 1.1 world units (slide pitch)
//!   plane_space_px  = 215 px
//!   total_slots     = max(ceil(800 / 215) + 1 + n, 2n)
//!   initial_offset  = ceil(800 / (2 × 215) − 0.5) = 2
//!
//!   slot:     0     1     2     3     4  ...
//!   x:      -2.2  -1.1    0    1.1   2.2        (direction = -1)
//!                         ▲
//!                   viewport center
//! ```
//!
//! Slots repeat the image list (`slot i` shows `images[i % n]`) so the
//! sequence is at least two loops long and always overfills the viewport by
//! one slide. That is what lets the offset wrap by a full cycle without a
//! visible seam.

use std::fmt;
use std::sync::Arc;

use crate::camera::PerspectiveCamera;
use crate::geometry::PlaneGeometry;
use crate::math::{cycle_width, initial_offset, pixels_per_world_unit, total_slots, width_with_gap};
use crate::scene::{MaterialBinding, SceneGraph, SlideSlot, TextureState};

/// Container size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerSize {
    pub width: u32,
    pub height: u32,
}

impl ContainerSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero dimension means the container has not been laid out.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for ContainerSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// The subset of slider options that shape the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneInitOptions {
    /// Gap between slides, in percent of the slide width.
    pub gap: f32,
    /// `-1.0` or `1.0`.
    pub direction: f32,
    /// Curvature strength handed to every material.
    pub curve: f32,
}

impl Default for SceneInitOptions {
    fn default() -> Self {
        Self {
            gap: 10.0,
            direction: -1.0,
            curve: 12.0,
        }
    }
}

/// Spacing and slot counts for one mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Slide pitch in world units.
    pub plane_space: f32,
    /// Slide pitch in container pixels.
    pub plane_space_px: f32,
    /// Number of distinct images.
    pub slide_amount: usize,
    /// World width of one loop, `plane_space × slide_amount`.
    pub cycle_width: f32,
    pub total_slots: usize,
    /// Slot index placed at the viewport center.
    pub initial_offset: i32,
}

impl Layout {
    /// Compute the layout for a container, or why it cannot be computed.
    pub fn compute(
        size: ContainerSize,
        camera: &PerspectiveCamera,
        slide_amount: usize,
        gap: f32,
    ) -> Result<Self, NotReady> {
        if slide_amount == 0 {
            return Err(NotReady::NoImages);
        }
        if size.is_empty() {
            return Err(NotReady::EmptyContainer {
                width: size.width,
                height: size.height,
            });
        }

        let width = size.width as f32;
        let px_per_unit = pixels_per_world_unit(width, size.height as f32, camera.fov_y, camera.position.z);
        let plane_space = width_with_gap(gap);
        let plane_space_px = px_per_unit * plane_space;
        if !(plane_space > 0.0 && plane_space.is_finite() && plane_space_px > 0.0 && plane_space_px.is_finite()) {
            return Err(NotReady::InvalidSpacing(plane_space_px));
        }

        Ok(Self {
            plane_space,
            plane_space_px,
            slide_amount,
            cycle_width: cycle_width(gap, slide_amount),
            total_slots: total_slots(width, plane_space_px, slide_amount),
            initial_offset: initial_offset(width, plane_space_px),
        })
    }
}

/// Why a scene could not be laid out. All cases are recoverable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotReady {
    /// The container has a zero dimension.
    EmptyContainer { width: u32, height: u32 },
    /// The computed slide pitch is not a positive finite number.
    InvalidSpacing(f32),
    /// There are no images to show.
    NoImages,
}

impl NotReady {
    /// Whether waiting and retrying can fix this.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::NoImages)
    }
}

impl fmt::Display for NotReady {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContainer { width, height } => {
                write!(f, "container is {width}x{height}, waiting for layout")
            }
            Self::InvalidSpacing(px) => write!(f, "slide spacing {px} is not usable"),
            Self::NoImages => write!(f, "no images to show"),
        }
    }
}

impl std::error::Error for NotReady {}

/// Lay out a scene for `images` in a container of `size`.
///
/// Builds the slider camera for the container, the shared plane mesh and
/// `total_slots` placeholder-bound slots. The offset starts at 0.
pub fn initialize_scene(
    size: ContainerSize,
    images: &[String],
    options: SceneInitOptions,
) -> Result<SceneGraph, NotReady> {
    let camera = PerspectiveCamera::for_container(size.width, size.height);
    let layout = Layout::compute(size, &camera, images.len(), options.gap)?;
    let direction = if options.direction < 0.0 { -1.0 } else { 1.0 };

    let slots = (0..layout.total_slots)
        .map(|index| SlideSlot {
            index,
            image_source: images[index % images.len()].clone(),
            horizontal_offset: -direction * (index as f32 - layout.initial_offset as f32) * layout.plane_space,
            texture_state: TextureState::Unloaded,
            material: MaterialBinding::Placeholder { curve: options.curve },
        })
        .collect();

    log::debug!(
        "laid out {} slots for {} images ({}x{}, pitch {:.3} / {:.1}px, center slot {})",
        layout.total_slots,
        layout.slide_amount,
        size.width,
        size.height,
        layout.plane_space,
        layout.plane_space_px,
        layout.initial_offset,
    );

    Ok(SceneGraph::new(
        slots,
        Arc::new(PlaneGeometry::slide()),
        layout,
        camera,
        size,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("slide-{i}.jpg")).collect()
    }

    #[test]
    fn lays_out_800x600_with_eight_images() {
        let scene = initialize_scene(ContainerSize::new(800, 600), &images(8), SceneInitOptions::default())
            .expect("valid container");
        let layout = *scene.layout();

        assert!((layout.plane_space - 1.1).abs() < 1e-6);
        assert!((layout.cycle_width - 8.8).abs() < 1e-5);
        assert_eq!(layout.total_slots, 16);
        assert_eq!(layout.initial_offset, 2);
        assert_eq!(scene.slots().len(), 16);

        // Slot 0 sits two pitches left of center, not at the origin.
        assert!((scene.slots()[0].horizontal_offset + 2.2).abs() < 1e-5);
        assert_eq!(scene.slots()[2].horizontal_offset, 0.0);
        assert_eq!(scene.position_x(), 0.0);
    }

    #[test]
    fn slots_repeat_images_and_start_on_placeholder() {
        let scene = initialize_scene(ContainerSize::new(800, 600), &images(3), SceneInitOptions::default())
            .expect("valid container");
        for slot in scene.slots() {
            assert_eq!(slot.image_source, format!("slide-{}.jpg", slot.index % 3));
            assert_eq!(slot.texture_state, TextureState::Unloaded);
            assert_eq!(slot.material, MaterialBinding::Placeholder { curve: 12.0 });
        }
    }

    #[test]
    fn slot_count_lower_bounds_hold() {
        for (w, h, n) in [(800, 600, 8), (1920, 400, 2), (320, 640, 5), (3000, 1000, 1)] {
            let scene = initialize_scene(ContainerSize::new(w, h), &images(n), SceneInitOptions::default())
                .expect("valid container");
            let layout = scene.layout();
            assert!(layout.total_slots >= 2 * n);
            let covering = (w as f32 / layout.plane_space_px).ceil() as usize + 1 + n;
            assert!(layout.total_slots >= covering, "{w}x{h}: {} < {covering}", layout.total_slots);
        }
    }

    #[test]
    fn positive_direction_mirrors_placement() {
        let options = SceneInitOptions {
            direction: 1.0,
            ..SceneInitOptions::default()
        };
        let scene = initialize_scene(ContainerSize::new(800, 600), &images(8), options).expect("valid container");
        assert!((scene.slots()[0].horizontal_offset - 2.2).abs() < 1e-5);
        assert!((scene.slots()[3].horizontal_offset + 1.1).abs() < 1e-5);
    }

    #[test]
    fn zero_width_is_not_ready() {
        let result = initialize_scene(ContainerSize::new(0, 600), &images(4), SceneInitOptions::default());
        assert_eq!(
            result.err(),
            Some(NotReady::EmptyContainer { width: 0, height: 600 })
        );
    }

    #[test]
    fn empty_image_list_is_not_retryable() {
        let err = initialize_scene(ContainerSize::new(800, 600), &[], SceneInitOptions::default())
            .err()
            .expect("no images");
        assert_eq!(err, NotReady::NoImages);
        assert!(!err.is_retryable());
        assert!(NotReady::EmptyContainer { width: 0, height: 0 }.is_retryable());
    }
}
