use ts_core::{Error, Offset, PlaneStack};
use ts_graph::{MergeScorer, PixelGraph, SegmenterOptions};

use crate::objects::{LabelMask, ObjectClasses, SegmentationStats};
use crate::segmenter::{FinalizePolicy, ScoredEdge, UnionFindSegmenter};

/// Result of one segmentation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub mask: LabelMask,
    pub classes: ObjectClasses,
    pub stats: SegmentationStats,
}

/// Validates predictions once, then segments them on demand.
///
/// Each call of [`ObjectSegmenter::run_segmentation`] builds its own
/// union-find state, so one segmenter may be run repeatedly and concurrently.
#[derive(Debug, Clone)]
pub struct ObjectSegmenter<'a> {
    graph: PixelGraph<'a>,
    scorer: MergeScorer,
    options: SegmenterOptions,
}

impl<'a> ObjectSegmenter<'a> {
    pub fn new(
        class_probs: &'a PlaneStack<f32>,
        adjacency: &'a PlaneStack<f32>,
        num_classes: usize,
        offsets: &'a [Offset],
        options: SegmenterOptions,
    ) -> Result<Self, Error> {
        options.validate()?;
        if let Some(bg) = options.background_class {
            if bg >= num_classes {
                return Err(Error::invalid_input(format!(
                    "background_class {bg} is outside 0..{num_classes}"
                )));
            }
        }

        let graph = PixelGraph::new(
            class_probs,
            adjacency,
            num_classes,
            offsets,
            options.class_encoding,
        )?;
        let scorer = MergeScorer::new(&options, offsets.len(), num_classes);

        Ok(Self {
            graph,
            scorer,
            options,
        })
    }

    pub fn options(&self) -> &SegmenterOptions {
        &self.options
    }

    pub fn graph(&self) -> &PixelGraph<'a> {
        &self.graph
    }

    pub fn run_segmentation(&self) -> (LabelMask, ObjectClasses) {
        let seg = self.run_segmentation_with_stats();
        (seg.mask, seg.classes)
    }

    pub fn run_segmentation_with_stats(&self) -> Segmentation {
        let graph = &self.graph;
        let mut segmenter =
            UnionFindSegmenter::new(graph.width(), graph.height(), graph.classes());

        let scored = graph.edges().map(|e| ScoredEdge {
            score: self.scorer.score(&e),
            a: e.a as u32,
            b: e.b as u32,
            offset: e.offset as u32,
        });
        segmenter.run(scored, self.options.prune_threshold);

        let policy = FinalizePolicy {
            min_object_size: self.options.min_object_size,
            background_class: self.options.background_class,
        };
        let (mask, classes, stats) = segmenter.finalize(&policy);

        tracing::debug!(
            width = graph.width(),
            height = graph.height(),
            edges = stats.edges,
            pruned = stats.pruned,
            merges = stats.merges,
            redundant = stats.redundant,
            objects = stats.objects,
            "object segmentation finished"
        );

        Segmentation {
            mask,
            classes,
            stats,
        }
    }
}
