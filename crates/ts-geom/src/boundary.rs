use ts_core::{Image, ImageView, Point2f};

/// Pixels equal to `id` as a `0`/`255` mask.
pub fn binary_mask(labels: &ImageView<'_, u32>, id: u32) -> Image<u8> {
    let mut data = Vec::with_capacity(labels.width() * labels.height());
    for y in 0..labels.height() {
        data.extend(labels.row(y).iter().map(|&v| if v == id { 255u8 } else { 0 }));
    }
    Image::from_vec(labels.width(), labels.height(), data).expect("mask matches label size")
}

/// Whether the pixel at `(x, y)` is in its object but has a 4-neighbour that
/// is not (image borders count as outside).
pub fn is_boundary(labels: &ImageView<'_, u32>, x: usize, y: usize) -> bool {
    let Some(&id) = labels.get(x, y) else {
        return false;
    };

    for (dx, dy) in [(1isize, 0isize), (-1, 0), (0, 1), (0, -1)] {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx < 0 || ny < 0 {
            return true;
        }
        match labels.get(nx as usize, ny as usize) {
            Some(&v) if v == id => {}
            _ => return true,
        }
    }

    false
}

/// Corners of every boundary pixel of object `id`.
pub fn boundary_corners(labels: &ImageView<'_, u32>, id: u32) -> Vec<Point2f> {
    let mut out = Vec::new();
    for y in 0..labels.height() {
        for (x, &v) in labels.row(y).iter().enumerate() {
            if v == id && is_boundary(labels, x, y) {
                push_corners(&mut out, x, y);
            }
        }
    }
    out
}

pub(crate) fn push_corners(out: &mut Vec<Point2f>, x: usize, y: usize) {
    let (x0, y0) = (x as f32, y as f32);
    out.extend([
        Point2f::new(x0, y0),
        Point2f::new(x0 + 1.0, y0),
        Point2f::new(x0 + 1.0, y0 + 1.0),
        Point2f::new(x0, y0 + 1.0),
    ]);
}
