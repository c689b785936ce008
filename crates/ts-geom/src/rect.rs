use serde::{Deserialize, Serialize};
use ts_core::{ImageView, Point2f, Vec2f};

use crate::boundary::{is_boundary, push_corners};
use crate::hull::convex_hull;

/// Rotated rectangle; `angle` is the direction of the `width` side in
/// radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinAreaRect {
    pub center: Point2f,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl MinAreaRect {
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn quad(&self) -> Quad {
        let u = Vec2f::new(self.angle.cos(), self.angle.sin());
        let v = u.perp();
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);

        let corners = [
            self.center + u * -hw + v * -hh,
            self.center + u * hw + v * -hh,
            self.center + u * hw + v * hh,
            self.center + u * -hw + v * hh,
        ];
        Quad::from_corners(corners)
    }
}

/// Four corners, clockwise on screen (y down) from the top-left-most one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub points: [Point2f; 4],
}

impl Quad {
    pub fn from_corners(mut corners: [Point2f; 4]) -> Self {
        let cx = corners.iter().map(|p| p.x).sum::<f32>() / 4.0;
        let cy = corners.iter().map(|p| p.y).sum::<f32>() / 4.0;

        // With y pointing down, increasing atan2 sweeps clockwise on screen.
        corners.sort_by(|a, b| {
            let ta = (a.y - cy).atan2(a.x - cx);
            let tb = (b.y - cy).atan2(b.x - cx);
            ta.total_cmp(&tb)
        });

        let start = (0..4)
            .min_by(|&i, &j| {
                let (a, b) = (corners[i], corners[j]);
                (a.x + a.y)
                    .total_cmp(&(b.x + b.y))
                    .then(a.x.total_cmp(&b.x))
            })
            .unwrap_or(0);
        corners.rotate_left(start);

        Self { points: corners }
    }

    /// Corners rounded to the nearest integer pixel edge.
    pub fn rounded(&self) -> [(i64, i64); 4] {
        self.points
            .map(|p| (p.x.round() as i64, p.y.round() as i64))
    }
}

/// Minimum-area enclosing rectangle via rotating calipers over the hull.
///
/// Returns `None` for an empty point set; one or two distinct points give a
/// degenerate axis-aligned rectangle.
pub fn min_area_rect(points: &[Point2f]) -> Option<MinAreaRect> {
    let hull = convex_hull(points);
    match hull.len() {
        0 => return None,
        1 | 2 => return Some(axis_aligned(&hull)),
        _ => {}
    }

    let n = hull.len();
    let mut best: Option<(f32, MinAreaRect)> = None;
    for i in 0..n {
        let origin = hull[i];
        let edge = hull[(i + 1) % n] - origin;
        if edge.norm() < f32::EPSILON {
            continue;
        }
        let u = edge.normalize();
        let v = u.perp();

        let (mut min_u, mut max_u) = (f32::MAX, f32::MIN);
        let (mut min_v, mut max_v) = (f32::MAX, f32::MIN);
        for &p in &hull {
            let d = p - origin;
            let pu = d.dot(u);
            let pv = d.dot(v);
            min_u = min_u.min(pu);
            max_u = max_u.max(pu);
            min_v = min_v.min(pv);
            max_v = max_v.max(pv);
        }

        let width = max_u - min_u;
        let height = max_v - min_v;
        let area = width * height;
        if best.is_none_or(|(a, _)| area < a) {
            let center = origin + u * ((min_u + max_u) / 2.0) + v * ((min_v + max_v) / 2.0);
            best = Some((
                area,
                MinAreaRect {
                    center,
                    width,
                    height,
                    angle: u.y.atan2(u.x),
                },
            ));
        }
    }

    best.map(|(_, rect)| rect)
}

fn axis_aligned(points: &[Point2f]) -> MinAreaRect {
    let min_x = points.iter().map(|p| p.x).fold(f32::MAX, f32::min);
    let max_x = points.iter().map(|p| p.x).fold(f32::MIN, f32::max);
    let min_y = points.iter().map(|p| p.y).fold(f32::MAX, f32::min);
    let max_y = points.iter().map(|p| p.y).fold(f32::MIN, f32::max);

    MinAreaRect {
        center: Point2f::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
        width: max_x - min_x,
        height: max_y - min_y,
        angle: 0.0,
    }
}

/// Bounding quadrilateral of object `id`, or `None` if it has no pixels.
pub fn object_quad(labels: &ImageView<'_, u32>, id: u32) -> Option<Quad> {
    let corners = crate::boundary::boundary_corners(labels, id);
    min_area_rect(&corners).map(|r| r.quad())
}

/// Quadrilaterals of ids `1..=num_objects` in one pass over the mask.
/// Ids without pixels are skipped.
pub fn object_quads(labels: &ImageView<'_, u32>, num_objects: usize) -> Vec<(u32, Quad)> {
    let mut corners: Vec<Vec<Point2f>> = vec![Vec::new(); num_objects];
    for y in 0..labels.height() {
        for (x, &id) in labels.row(y).iter().enumerate() {
            if id == 0 || id as usize > num_objects || !is_boundary(labels, x, y) {
                continue;
            }
            push_corners(&mut corners[id as usize - 1], x, y);
        }
    }

    corners
        .iter()
        .enumerate()
        .filter_map(|(i, pts)| min_area_rect(pts).map(|r| (i as u32 + 1, r.quad())))
        .collect()
}
