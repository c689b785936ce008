use serde::Serialize;
use thiserror::Error;
use ts_core::{PlaneStack, resize_nearest};
use ts_geom::{Quad, object_quads};
use ts_segment::{LabelMask, ObjectClasses, ObjectSegmenter, Segmentation, SegmentationStats};

use crate::config::{ConfigError, CoreConfig};
use crate::predictor::{Prediction, Predictor};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] ts_core::Error),
    #[error("predictor failed")]
    Predictor(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("page has {actual} colour channels, expected {expected}")]
    ColorMismatch { expected: usize, actual: usize },
}

/// One detected object in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextRegion {
    pub id: u32,
    pub class: usize,
    pub quad: Quad,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageSegmentation {
    /// Label mask at page resolution.
    pub mask: LabelMask,
    pub classes: ObjectClasses,
    /// Objects still present after resizing, in id order.
    pub regions: Vec<TextRegion>,
    pub stats: SegmentationStats,
}

/// Page-level driver: predict, segment, resize, fit quadrilaterals.
#[derive(Debug)]
pub struct PageSegmenter<P> {
    predictor: P,
    config: CoreConfig,
}

impl<P: Predictor> PageSegmenter<P> {
    pub fn new(predictor: P, config: CoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { predictor, config })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn predictor_mut(&mut self) -> &mut P {
        &mut self.predictor
    }

    pub fn segment_page(&mut self, page: &PlaneStack<f32>) -> Result<PageSegmentation, PipelineError> {
        if page.channels() != self.config.num_colors {
            return Err(PipelineError::ColorMismatch {
                expected: self.config.num_colors,
                actual: page.channels(),
            });
        }

        let prediction = self
            .predictor
            .predict(page)
            .map_err(|e| PipelineError::Predictor(Box::new(e)))?;
        self.segment_prediction(&prediction, page.width(), page.height())
    }

    /// Segments precomputed outputs and maps them onto a `width x height`
    /// page.
    pub fn segment_prediction(
        &self,
        prediction: &Prediction,
        width: usize,
        height: usize,
    ) -> Result<PageSegmentation, PipelineError> {
        segment_prediction(&self.config, prediction, width, height)
    }
}

pub fn segment_prediction(
    config: &CoreConfig,
    prediction: &Prediction,
    width: usize,
    height: usize,
) -> Result<PageSegmentation, PipelineError> {
    let segmenter = ObjectSegmenter::new(
        &prediction.class_probs,
        &prediction.adjacency,
        config.num_classes,
        &config.offsets,
        config.segmenter.clone(),
    )?;
    let Segmentation {
        mask,
        classes,
        stats,
    } = segmenter.run_segmentation_with_stats();

    let mask = if mask.width() == width && mask.height() == height {
        mask
    } else {
        resize_nearest(&mask.as_view(), width, height)
    };

    let regions: Vec<TextRegion> = object_quads(&mask.as_view(), classes.len())
        .into_iter()
        .filter_map(|(id, quad)| {
            let class = classes.class_of(id)?;
            Some(TextRegion { id, class, quad })
        })
        .collect();

    tracing::info!(
        width,
        height,
        objects = classes.len(),
        regions = regions.len(),
        "page segmented"
    );

    Ok(PageSegmentation {
        mask,
        classes,
        regions,
        stats,
    })
}
