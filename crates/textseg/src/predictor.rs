use serde::{Deserialize, Serialize};
use ts_core::PlaneStack;

/// Dense network outputs for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// `[num_classes, H, W]`.
    pub class_probs: PlaneStack<f32>,
    /// `[num_offsets, H, W]`, plane `k` scoring `(p, p + offsets[k])`.
    pub adjacency: PlaneStack<f32>,
}

/// Source of class and adjacency maps for a page image.
///
/// The page is a `[num_colors, H, W]` stack with values in `[0, 1]`. The
/// prediction may have a different spatial size (e.g. a model working at a
/// fixed resolution); labels are resized back to the page afterwards.
pub trait Predictor {
    type Error: std::error::Error + Send + Sync + 'static;

    fn predict(&mut self, page: &PlaneStack<f32>) -> Result<Prediction, Self::Error>;
}

impl<P: Predictor + ?Sized> Predictor for &mut P {
    type Error = P::Error;

    fn predict(&mut self, page: &PlaneStack<f32>) -> Result<Prediction, Self::Error> {
        (**self).predict(page)
    }
}
