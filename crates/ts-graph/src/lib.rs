//! Pixel adjacency graph and merge scoring.
//!
//! A predictor emits, per pixel, a class distribution and one adjacency score
//! per configured [`Offset`](ts_core::Offset). This crate turns those dense
//! maps into scored candidate merges:
//! - [`PixelGraph`] enumerates in-bounds `(pixel, pixel + offset)` pairs on
//!   demand, paired with both endpoints' class vectors.
//! - [`MergeScorer`] folds adjacency evidence, class agreement and the
//!   configured biases into one signed score (positive favors merging).
//!
//! Class vectors are sanitized once at graph construction; see
//! [`PixelClasses`].

mod classes;
mod options;
mod pixel_graph;
mod scorer;

pub use classes::{PixelClasses, sanitize_probabilities, softmax_in_place};
pub use options::{AdjacencyEncoding, ClassEncoding, SegmenterOptions};
pub use pixel_graph::{Edges, PixelEdge, PixelGraph};
pub use scorer::{MAX_LOGIT, MergeScorer};
