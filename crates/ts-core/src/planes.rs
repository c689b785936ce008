use serde::{Deserialize, Serialize};

use crate::{Error, Image, ImageView};

/// A `[channels, height, width]` volume stored plane after plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlaneStackRepr<T>", into = "PlaneStackRepr<T>")]
#[serde(bound(
    serialize = "T: Clone + Serialize",
    deserialize = "T: Deserialize<'de>"
))]
pub struct PlaneStack<T> {
    channels: usize,
    height: usize,
    width: usize,
    data: Vec<T>,
}

#[derive(Serialize, Deserialize)]
struct PlaneStackRepr<T> {
    channels: usize,
    height: usize,
    width: usize,
    data: Vec<T>,
}

impl<T> TryFrom<PlaneStackRepr<T>> for PlaneStack<T> {
    type Error = Error;

    fn try_from(repr: PlaneStackRepr<T>) -> Result<Self, Self::Error> {
        Self::from_vec(repr.channels, repr.height, repr.width, repr.data)
    }
}

impl<T> From<PlaneStack<T>> for PlaneStackRepr<T> {
    fn from(stack: PlaneStack<T>) -> Self {
        Self {
            channels: stack.channels,
            height: stack.height,
            width: stack.width,
            data: stack.data,
        }
    }
}

impl<T> PlaneStack<T> {
    pub fn from_vec(
        channels: usize,
        height: usize,
        width: usize,
        data: Vec<T>,
    ) -> Result<Self, Error> {
        let expected = channels
            .checked_mul(height)
            .and_then(|v| v.checked_mul(width))
            .ok_or(Error::SizeMismatch {
                expected: usize::MAX,
                actual: data.len(),
            })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            channels,
            height,
            width,
            data,
        })
    }

    /// Stacks equally sized planes; fails on an empty list or a size mismatch.
    pub fn from_planes(planes: Vec<Image<T>>) -> Result<Self, Error> {
        let Some(first) = planes.first() else {
            return Err(Error::invalid_input("plane stack needs at least one plane"));
        };
        let (width, height) = (first.width(), first.height());
        let channels = planes.len();

        let mut data = Vec::with_capacity(channels * width * height);
        for plane in planes {
            if plane.width() != width || plane.height() != height {
                return Err(Error::invalid_input(format!(
                    "plane is {}x{}, expected {width}x{height}",
                    plane.width(),
                    plane.height()
                )));
            }
            data.extend(plane.into_vec());
        }

        Ok(Self {
            channels,
            height,
            width,
            data,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn plane_len(&self) -> usize {
        self.width * self.height
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn plane(&self, channel: usize) -> Option<ImageView<'_, T>> {
        if channel >= self.channels {
            return None;
        }
        let len = self.plane_len();
        let start = channel * len;
        ImageView::from_slice(self.width, self.height, self.width, &self.data[start..start + len])
            .ok()
    }

    /// Value at `channel` for the row-major pixel index `pixel`.
    pub fn at(&self, channel: usize, pixel: usize) -> Option<&T> {
        let len = self.plane_len();
        if channel >= self.channels || pixel >= len {
            return None;
        }
        self.data.get(channel * len + pixel)
    }

    pub fn get(&self, channel: usize, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.at(channel, y * self.width + x)
    }
}

impl<T: Copy> PlaneStack<T> {
    /// Copies the per-channel values of one pixel into `out`.
    pub fn gather_pixel(&self, pixel: usize, out: &mut [T]) {
        let len = self.plane_len();
        assert!(pixel < len, "pixel index out of bounds");
        assert_eq!(out.len(), self.channels, "output length must match channels");
        for (c, slot) in out.iter_mut().enumerate() {
            *slot = self.data[c * len + pixel];
        }
    }
}

#[cfg(feature = "ndarray")]
impl<T: Clone> PlaneStack<T> {
    pub fn from_array3(array: ndarray::ArrayView3<'_, T>) -> Self {
        let (channels, height, width) = array.dim();
        let data = array.iter().cloned().collect();
        Self {
            channels,
            height,
            width,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PlaneStack;
    use crate::{Error, Image};

    #[test]
    fn plane_and_pixel_access() {
        let stack = PlaneStack::from_vec(2, 2, 3, (0..12).collect::<Vec<i32>>())
            .expect("valid stack");

        let plane1 = stack.plane(1).expect("plane exists");
        assert_eq!(plane1.row(0), &[6, 7, 8]);
        assert_eq!(plane1.row(1), &[9, 10, 11]);
        assert!(stack.plane(2).is_none());

        assert_eq!(stack.get(1, 2, 1), Some(&11));
        assert_eq!(stack.at(0, 4), Some(&4));

        let mut px = [0; 2];
        stack.gather_pixel(4, &mut px);
        assert_eq!(px, [4, 10]);
    }

    #[test]
    fn from_planes_checks_sizes() {
        let a = Image::new_fill(2, 2, 1.0f32);
        let b = Image::new_fill(3, 2, 0.0f32);
        assert!(matches!(
            PlaneStack::from_planes(vec![a.clone(), b]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            PlaneStack::<f32>::from_planes(Vec::new()),
            Err(Error::InvalidInput(_))
        ));

        let stack = PlaneStack::from_planes(vec![a.clone(), a]).expect("valid planes");
        assert_eq!(stack.channels(), 2);
        assert_eq!(stack.data().len(), 8);
    }

    #[test]
    fn deserialize_validates_length() {
        let ok: PlaneStack<f32> = serde_json::from_str(
            r#"{"channels":1,"height":1,"width":2,"data":[0.25,0.75]}"#,
        )
        .expect("valid json");
        assert_eq!(ok.width(), 2);

        let bad = serde_json::from_str::<PlaneStack<f32>>(
            r#"{"channels":2,"height":1,"width":2,"data":[0.25,0.75]}"#,
        );
        assert!(bad.is_err());
    }
}

#[cfg(all(test, feature = "ndarray"))]
mod ndarray_tests {
    use ndarray::Array3;

    use super::PlaneStack;

    #[test]
    fn from_array3_reads_logical_order_of_permuted_view() {
        // Channels-last `[H, W, C]` buffer, viewed as `[C, H, W]`.
        let (h, w, c) = (2, 3, 2);
        let hwc = Array3::from_shape_fn((h, w, c), |(y, x, k)| (100 * k + 10 * y + x) as f32);
        let chw = hwc.view().permuted_axes([2, 0, 1]);
        assert!(!chw.is_standard_layout());

        let stack = PlaneStack::from_array3(chw);
        assert_eq!((stack.channels(), stack.height(), stack.width()), (c, h, w));

        let mut expected = Vec::with_capacity(c * h * w);
        for k in 0..c {
            for y in 0..h {
                for x in 0..w {
                    expected.push((100 * k + 10 * y + x) as f32);
                }
            }
        }
        assert_eq!(stack.data(), expected.as_slice());

        let plane1 = stack.plane(1).expect("plane exists");
        assert_eq!(plane1.row(1), &[110.0, 111.0, 112.0]);
        assert_eq!(stack.get(0, 2, 1), Some(&12.0));
    }
}
