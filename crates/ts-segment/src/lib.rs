//! Object segmentation from class and adjacency predictions.
//!
//! Given per-pixel class distributions and per-offset adjacency scores,
//! [`ObjectSegmenter`] produces a label mask where `0` is background and
//! `1..=K` are object instances, plus the voted class of each object.
//!
//! Algorithm:
//! - Every pixel starts as its own component with its class vector as tally.
//! - Candidate edges from [`ts_graph::PixelGraph`] are scored by
//!   [`ts_graph::MergeScorer`]; edges at or below `prune_threshold` are
//!   dropped.
//! - Remaining edges are merged in descending score order (ties by pixel scan
//!   order, then offset index) on an arena union-find; tallies are summed.
//! - Components are renumbered `1..=K` in order of their first pixel in a
//!   row-major scan. The class of an object is the argmax of its tally.
//!
//! Since every merge is decided by a single edge, raising the threshold can
//! only remove merges, never add them.

mod object_segmenter;
mod objects;
mod segmenter;
mod union_find;

pub use object_segmenter::{ObjectSegmenter, Segmentation};
pub use objects::{LabelMask, ObjectClasses, SegmentationStats};
pub use segmenter::{FinalizePolicy, ScoredEdge, UnionFindSegmenter};
pub use union_find::DisjointSet;
