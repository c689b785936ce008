use ts_core::PlaneStack;

use crate::ClassEncoding;

/// Per-pixel class distributions, stored pixel-major so one pixel's vector is
/// a contiguous slice.
///
/// Every vector is finite, non-negative and sums to 1.
#[derive(Debug, Clone)]
pub struct PixelClasses {
    num_classes: usize,
    data: Vec<f32>,
    sanitized: usize,
}

impl PixelClasses {
    pub fn from_planes(planes: &PlaneStack<f32>, encoding: ClassEncoding) -> Self {
        let num_classes = planes.channels();
        let num_pixels = planes.plane_len();
        let mut data = vec![0.0f32; num_pixels * num_classes];
        let mut sanitized = 0;

        // `chunks_exact_mut` panics on a zero chunk size; an empty stack has
        // no data to walk anyway.
        for (pixel, out) in data.chunks_exact_mut(num_classes.max(1)).enumerate() {
            planes.gather_pixel(pixel, out);
            let degenerate = match encoding {
                ClassEncoding::Probability => sanitize_probabilities(out),
                ClassEncoding::Logit => softmax_in_place(out),
            };
            if degenerate {
                sanitized += 1;
            }
        }

        if sanitized > 0 {
            tracing::warn!(
                sanitized,
                num_pixels,
                "replaced degenerate class vectors with a uniform distribution"
            );
        }

        Self {
            num_classes,
            data,
            sanitized,
        }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn num_pixels(&self) -> usize {
        if self.num_classes == 0 {
            0
        } else {
            self.data.len() / self.num_classes
        }
    }

    /// Pixels whose vector was all-zero or non-finite and got replaced.
    pub fn sanitized_pixels(&self) -> usize {
        self.sanitized
    }

    pub fn pixel(&self, pixel: usize) -> &[f32] {
        let start = pixel * self.num_classes;
        &self.data[start..start + self.num_classes]
    }
}

/// Clears negative and non-finite entries, then normalizes to unit sum.
///
/// Returns `true` when nothing usable was left and the vector was replaced by
/// the uniform distribution.
pub fn sanitize_probabilities(v: &mut [f32]) -> bool {
    if v.is_empty() {
        return false;
    }

    let mut sum = 0.0f32;
    for p in v.iter_mut() {
        if !p.is_finite() || *p < 0.0 {
            *p = 0.0;
        }
        sum += *p;
    }

    if sum <= f32::MIN_POSITIVE || !sum.is_finite() {
        fill_uniform(v);
        return true;
    }

    for p in v.iter_mut() {
        *p /= sum;
    }
    false
}

/// Numerically stable softmax; NaN entries are ignored and `+inf` entries
/// share the mass equally. Returns `true` when the vector was replaced by the
/// uniform distribution.
pub fn softmax_in_place(v: &mut [f32]) -> bool {
    if v.is_empty() {
        return false;
    }

    let num_pos_inf = v.iter().filter(|x| **x == f32::INFINITY).count();
    if num_pos_inf > 0 {
        let share = 1.0 / num_pos_inf as f32;
        for x in v.iter_mut() {
            *x = if *x == f32::INFINITY { share } else { 0.0 };
        }
        return false;
    }

    let max = v
        .iter()
        .copied()
        .filter(|x| x.is_finite())
        .fold(f32::NEG_INFINITY, f32::max);
    if max == f32::NEG_INFINITY {
        fill_uniform(v);
        return true;
    }

    let mut sum = 0.0f32;
    for x in v.iter_mut() {
        *x = if x.is_finite() { (*x - max).exp() } else { 0.0 };
        sum += *x;
    }
    for x in v.iter_mut() {
        *x /= sum;
    }
    false
}

fn fill_uniform(v: &mut [f32]) {
    let u = 1.0 / v.len() as f32;
    v.fill(u);
}
