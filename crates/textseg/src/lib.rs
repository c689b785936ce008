//! Umbrella crate for the `textseg` workspace.
//!
//! Re-exports the building blocks and adds the page-level pieces:
//! - [`CoreConfig`]: class count, colour channels, adjacency offsets and
//!   segmenter options, loaded from JSON.
//! - [`Predictor`]: the contract a model wrapper implements.
//! - [`PageSegmenter`]: predict, segment, resize to page size, fit one
//!   quadrilateral per object.
//! - [`write_labels`]: ICDAR 2015 style result files.

mod config;
mod labels;
mod pipeline;
mod predictor;

pub use config::{ConfigError, CoreConfig};
pub use labels::{format_label_line, write_labels};
pub use pipeline::{PageSegmentation, PageSegmenter, PipelineError, TextRegion, segment_prediction};
pub use predictor::{Prediction, Predictor};

pub use ts_core::*;
pub use ts_geom::*;
pub use ts_graph::*;
pub use ts_segment::*;
