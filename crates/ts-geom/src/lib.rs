//! Bounding quadrilaterals for segmented objects.
//!
//! For each object id of a label mask:
//! 1. Boundary pixels (at least one 4-neighbour outside the object) contribute
//!    their four pixel corners, so a lone pixel still spans a unit square.
//! 2. The convex hull of those corners is computed with a monotone chain.
//! 3. Rotating calipers over hull edges give the minimum-area rectangle.
//!
//! Quad corners are in pixel-edge coordinates (pixel `(x, y)` covers
//! `[x, x + 1) x [y, y + 1)`) and ordered clockwise on screen, starting at
//! the corner nearest the top-left.

mod boundary;
mod hull;
mod rect;

pub use boundary::{binary_mask, boundary_corners, is_boundary};
pub use hull::convex_hull;
pub use rect::{MinAreaRect, Quad, min_area_rect, object_quad, object_quads};
