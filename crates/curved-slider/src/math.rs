//! # Math — Loop Geometry and glam Re-exports
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. The free functions here are the float math behind
//! the carousel: slide spacing, viewport coverage, and the normalization that
//! makes the loop infinite.
//!
//! ## Two Units of Spacing
//!
//! Every slide is a plane exactly one world unit wide. Spacing is therefore
//! measured twice:
//!
//! ```text
//!  world pitch  = 1 + gap/100                      (world units)
//!  pixel pitch  = px_per_world_unit × world pitch  (screen pixels)
//!
//!  ┌──────┐  ┌──────┐  ┌──────┐
//!  │ 1.0  │gg│ 1.0  │gg│ 1.0  │      gap = 10  →  world pitch 1.1
//!  └──────┘  └──────┘  └──────┘
//! ```
//!
//! The world pitch places slides, sizes the loop cycle and drives snapping.
//! The pixel pitch answers "how many slides fit in this container", which is
//! what slot counting and initial centering need.
//!
//! ## Normalization
//!
//! The scene offset is folded into `[-cycle/2, cycle/2)` after every write.
//! Because the slot sequence repeats every `cycle` world units, any two
//! offsets that differ by a whole cycle render identically, so folding is
//! invisible on screen. It also keeps the value small, which stops f32
//! precision from degrading over a long session.

pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// Fraction of the viewport width beyond each edge that still counts as
/// "visible" for texture preloading.
pub const VISIBILITY_THRESHOLD: f32 = 0.3;

/// World-space pitch of one slide (plane width 1.0 plus the gap percentage).
pub fn width_with_gap(gap_percent: f32) -> f32 {
    1.0 + gap_percent / 100.0
}

/// Total world-space width of one loop of `slide_amount` distinct slides.
pub fn cycle_width(gap_percent: f32, slide_amount: usize) -> f32 {
    width_with_gap(gap_percent) * slide_amount as f32
}

/// Fold `position` into `[-cycle/2, cycle/2)` for the given gap and slide count.
///
/// With no slides the cycle is empty and the position is returned unchanged.
pub fn normalize_position(position: f32, gap_percent: f32, slide_amount: usize) -> f32 {
    normalize_in_cycle(position, cycle_width(gap_percent, slide_amount))
}

/// Fold `position` into `[-cycle/2, cycle/2)`.
pub fn normalize_in_cycle(position: f32, cycle: f32) -> f32 {
    if cycle <= 0.0 || !cycle.is_finite() || !position.is_finite() {
        return position;
    }

    let half = cycle / 2.0;
    // `%` keeps the sign of the dividend, so negative inputs land below -half.
    let mut folded = (position + half) % cycle - half;
    if folded < -half {
        folded += cycle;
    }
    // Rounding can leave the result exactly on the open upper bound.
    if folded >= half {
        folded -= cycle;
    }
    folded
}

/// [`normalize_in_cycle`] in f64, for positions derived from long-running
/// clocks.
pub fn normalize_in_cycle_f64(position: f64, cycle: f64) -> f64 {
    if cycle <= 0.0 || !cycle.is_finite() || !position.is_finite() {
        return position;
    }
    let half = cycle / 2.0;
    let folded = (position + half).rem_euclid(cycle) - half;
    if folded >= half { folded - cycle } else { folded }
}

/// Nearest multiple of `pitch` to `position`, not yet normalized.
pub fn nearest_multiple(position: f32, pitch: f32) -> f32 {
    if pitch <= 0.0 {
        return position;
    }
    (position / pitch).round() * pitch
}

/// How many screen pixels one world unit spans, for a camera at distance
/// `camera_z` with vertical field of view `fov_degrees`, looking at a
/// container of `width × height` pixels.
pub fn pixels_per_world_unit(width: f32, height: f32, fov_degrees: f32, camera_z: f32) -> f32 {
    let v_fov = fov_degrees.to_radians();
    let visible_height = 2.0 * (v_fov / 2.0).tan() * camera_z;
    let visible_width = visible_height * (width / height);
    width / visible_width
}

/// Slot index that must sit under the viewport center at mount time.
pub fn initial_offset(container_width: f32, plane_space_px: f32) -> i32 {
    (container_width / (2.0 * plane_space_px) - 0.5).ceil() as i32
}

/// Number of duplicated slots needed to cover the viewport plus one full
/// loop of distinct slides.
pub fn total_slots(container_width: f32, plane_space_px: f32, slide_amount: usize) -> usize {
    let covering = (container_width / plane_space_px).ceil().max(0.0) as usize + 1 + slide_amount;
    covering.max(slide_amount * 2)
}

/// Whether a screen-space x coordinate lies within the viewport widened by
/// `threshold_fraction × viewport_width` on both sides.
pub fn within_preload_band(screen_x: f32, viewport_width: f32, threshold_fraction: f32) -> bool {
    let threshold = viewport_width * threshold_fraction;
    screen_x >= -threshold && screen_x <= viewport_width + threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn width_with_gap_adds_percentage() {
        assert!(approx(width_with_gap(10.0), 1.1, 1e-6));
        assert!(approx(width_with_gap(0.0), 1.0, 1e-6));
        assert!(approx(cycle_width(10.0, 4), 4.4, 1e-5));
    }

    #[test]
    fn normalize_stays_in_half_open_range() {
        let cycle = cycle_width(10.0, 4);
        let half = cycle / 2.0;
        for i in -400..400 {
            let x = i as f32 * 0.137;
            let n = normalize_position(x, 10.0, 4);
            assert!(n >= -half && n < half, "normalize({x}) = {n} escaped [-{half}, {half})");
        }
    }

    #[test]
    fn normalize_is_periodic() {
        let cycle = cycle_width(10.0, 4);
        for x in [-3.7_f32, -1.0, 0.0, 0.4, 1.3, 2.0, 5.9] {
            let a = normalize_position(x, 10.0, 4);
            let b = normalize_position(x + cycle, 10.0, 4);
            let c = normalize_position(x - 3.0 * cycle, 10.0, 4);
            assert!(approx(a, b, 1e-4), "{x}: {a} vs {b}");
            assert!(approx(a, c, 1e-4), "{x}: {a} vs {c}");
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        for x in [-9.1_f32, -2.5, 0.3, 1.9, 7.7, 123.4] {
            let once = normalize_position(x, 10.0, 4);
            let twice = normalize_position(once, 10.0, 4);
            assert!(approx(once, twice, 1e-5), "{x}: {once} vs {twice}");
        }
    }

    #[test]
    fn normalize_wraps_one_full_cycle() {
        // 6.6 is 2.2 plus one 4.4 cycle; 2.2 is the open upper bound, so the
        // folded value sits on the equivalent lower bound.
        let n = normalize_position(6.6, 10.0, 4);
        assert!(approx(n.abs(), 2.2, 1e-4), "got {n}");
        assert!(n < 2.2);

        assert!(approx(normalize_position(2.5, 10.0, 4), 2.5 - 4.4, 1e-5));
        assert!(approx(normalize_position(-2.5, 10.0, 4), -2.5 + 4.4, 1e-5));
    }

    #[test]
    fn normalize_without_slides_is_identity() {
        assert_eq!(normalize_position(12.5, 10.0, 0), 12.5);
    }

    #[test]
    fn nearest_multiple_rounds_to_pitch() {
        assert!(approx(nearest_multiple(1.6, 1.1), 1.1, 1e-6));
        assert!(approx(nearest_multiple(1.7, 1.1), 2.2, 1e-6));
        assert!(approx(nearest_multiple(-0.6, 1.1), -1.1, 1e-6));
        assert_eq!(nearest_multiple(0.3, 0.0), 0.3);
    }

    #[test]
    fn slot_count_covers_viewport_and_loop() {
        assert_eq!(total_slots(800.0, 215.0, 8), 16);
        assert_eq!(total_slots(2000.0, 100.0, 3), 24);
        let n = total_slots(1000.0, 215.0, 4);
        assert!(n >= 8);
        assert!(n >= (1000.0_f32 / 215.0).ceil() as usize + 1 + 4);
    }

    #[test]
    fn preload_band_extends_both_edges() {
        assert!(within_preload_band(-200.0, 800.0, VISIBILITY_THRESHOLD));
        assert!(within_preload_band(1040.0, 800.0, VISIBILITY_THRESHOLD));
        assert!(!within_preload_band(-241.0, 800.0, VISIBILITY_THRESHOLD));
        assert!(!within_preload_band(1041.0, 800.0, VISIBILITY_THRESHOLD));
    }

    #[test]
    fn f64_fold_matches_f32_and_handles_large_inputs() {
        for x in [-5.0, 0.0, 1.3, 3.0, 9.9] {
            let wide = normalize_in_cycle_f64(x, 4.4) as f32;
            assert!(approx(wide, normalize_in_cycle(x as f32, 4.4), 1e-5), "{x}");
        }
        // Three days of autoplay at speed 30.
        let far = normalize_in_cycle_f64(-2_592.0 * 30.0 - 0.25, 4.4);
        assert!((-2.2..2.2).contains(&far));
    }
}
