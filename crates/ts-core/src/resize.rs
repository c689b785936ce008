use crate::image::{Image, ImageView};

/// Nearest-neighbour resample to `width x height`.
///
/// Pixel centers are aligned: destination pixel `x` samples the source at
/// `(x + 0.5) * src_w / width - 0.5`, rounded and clamped. Label values are
/// copied verbatim, so no new ids appear.
pub fn resize_nearest<T: Copy>(src: &ImageView<'_, T>, width: usize, height: usize) -> Image<T>
where
    T: Default,
{
    if src.width() == 0 || src.height() == 0 {
        return Image::new_fill(width, height, T::default());
    }

    let xs: Vec<usize> = (0..width)
        .map(|x| source_index(x, width, src.width()))
        .collect();

    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = src.row(source_index(y, height, src.height()));
        data.extend(xs.iter().map(|&sx| row[sx]));
    }

    Image::from_vec(width, height, data).expect("resize output matches requested size")
}

fn source_index(dst: usize, dst_len: usize, src_len: usize) -> usize {
    let scale = src_len as f64 / dst_len as f64;
    let s = ((dst as f64 + 0.5) * scale - 0.5).round();
    (s.max(0.0) as usize).min(src_len - 1)
}
