//! # Geometry — The Subdivided Slide Plane
//!
//! Every slot draws the same mesh: a 1×1 world-unit plane in the XY plane,
//! facing the camera on +Z. The curvature is applied in the vertex shader,
//! which can only move vertices that exist, so the plane is subdivided into
//! a grid rather than drawn as a single quad.
//!
//! ```text
//!  (-0.5, 0.5) ┌──┬──┬──┐ (0.5, 0.5)      uv (0,0) top-left
//!              ├──┼──┼──┤                  uv (1,1) bottom-right
//!              ├──┼──┼──┤
//! (-0.5, -0.5) └──┴──┴──┘ (0.5, -0.5)     20 × 20 cells in practice
//! ```
//!
//! One [`PlaneGeometry`] is built per mount and shared by every slot.
//!
//! ## Winding
//!
//! Triangles are counter-clockwise seen from +Z, matching wgpu's default
//! `FrontFace::Ccw`. The slide pipeline disables culling anyway, so a plane
//! bent past edge-on still draws.

use crate::render::vertex::SlideVertex;

/// Grid subdivisions along each axis of a slide plane.
pub const PLANE_SEGMENTS: u32 = 20;

/// CPU-side mesh data for the slide plane.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneGeometry {
    pub vertices: Vec<SlideVertex>,
    pub indices: Vec<u32>,
}

impl PlaneGeometry {
    /// The standard slide plane: 1×1, [`PLANE_SEGMENTS`] per side.
    pub fn slide() -> Self {
        Self::subdivided(1.0, 1.0, PLANE_SEGMENTS, PLANE_SEGMENTS)
    }

    /// A `width × height` plane centered at the origin, split into
    /// `segments_x × segments_y` cells. Zero segment counts are treated as 1.
    pub fn subdivided(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Self {
        let sx = segments_x.max(1);
        let sy = segments_y.max(1);
        let mut vertices = Vec::with_capacity(((sx + 1) * (sy + 1)) as usize);
        let mut indices = Vec::with_capacity((sx * sy * 6) as usize);

        // Rows run top to bottom so v grows downward like image rows.
        for iy in 0..=sy {
            let v = iy as f32 / sy as f32;
            let y = (0.5 - v) * height;
            for ix in 0..=sx {
                let u = ix as f32 / sx as f32;
                let x = (u - 0.5) * width;
                vertices.push(SlideVertex {
                    position: [x, y, 0.0],
                    uv: [u, v],
                });
            }
        }

        let row = sx + 1;
        for iy in 0..sy {
            for ix in 0..sx {
                let top_left = iy * row + ix;
                let top_right = top_left + 1;
                let bottom_left = top_left + row;
                let bottom_right = bottom_left + 1;
                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    bottom_right,
                    top_left,
                    bottom_right,
                    top_right,
                ]);
            }
        }

        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_plane_has_correct_counts() {
        let plane = PlaneGeometry::slide();
        assert_eq!(plane.vertex_count(), 21 * 21);
        assert_eq!(plane.index_count(), 20 * 20 * 6);
    }

    #[test]
    fn slide_plane_spans_unit_square() {
        let plane = PlaneGeometry::slide();
        let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
        let (mut min_y, mut max_y) = (f32::MAX, f32::MIN);
        for v in &plane.vertices {
            min_x = min_x.min(v.position[0]);
            max_x = max_x.max(v.position[0]);
            min_y = min_y.min(v.position[1]);
            max_y = max_y.max(v.position[1]);
            assert_eq!(v.position[2], 0.0);
        }
        assert!((min_x + 0.5).abs() < 1e-6 && (max_x - 0.5).abs() < 1e-6);
        assert!((min_y + 0.5).abs() < 1e-6 && (max_y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn indices_in_range() {
        let plane = PlaneGeometry::subdivided(1.0, 1.0, 3, 2);
        for &idx in &plane.indices {
            assert!((idx as usize) < plane.vertices.len(), "index {idx} out of range");
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise() {
        let plane = PlaneGeometry::subdivided(1.0, 1.0, 2, 2);
        for tri in plane.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| plane.vertices[i as usize].position);
            let area = (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]);
            assert!(area > 0.0, "clockwise triangle {tri:?}");
        }
    }

    #[test]
    fn top_left_corner_maps_to_uv_origin() {
        let plane = PlaneGeometry::slide();
        let first = plane.vertices[0];
        assert_eq!(first.position, [-0.5, 0.5, 0.0]);
        assert_eq!(first.uv, [0.0, 0.0]);
    }

    #[test]
    fn zero_segments_still_make_a_quad() {
        let plane = PlaneGeometry::subdivided(1.0, 1.0, 0, 0);
        assert_eq!(plane.vertex_count(), 4);
        assert_eq!(plane.index_count(), 6);
    }
}
