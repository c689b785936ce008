use ts_core::Point2f;

/// Convex hull by Andrew's monotone chain.
///
/// Collinear points are dropped; the result has no repeated first point.
/// Fewer than three distinct input points are returned as-is (deduplicated).
pub fn convex_hull(points: &[Point2f]) -> Vec<Point2f> {
    let mut pts: Vec<Point2f> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();

    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point2f> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && turn(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point2f> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && turn(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn turn(o: Point2f, a: Point2f, b: Point2f) -> f32 {
    (a - o).cross(b - o)
}
