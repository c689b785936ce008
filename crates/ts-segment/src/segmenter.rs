use std::cmp::Ordering;

use ts_core::Image;
use ts_graph::PixelClasses;

use crate::objects::{LabelMask, ObjectClasses, SegmentationStats};
use crate::union_find::DisjointSet;

const UNLABELED: u32 = u32::MAX;

/// A surviving candidate merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEdge {
    pub score: f32,
    pub a: u32,
    pub b: u32,
    pub offset: u32,
}

impl ScoredEdge {
    /// Descending score, then ascending `(a, offset)`.
    fn priority_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then(self.a.cmp(&other.a))
            .then(self.offset.cmp(&other.offset))
            .then(self.b.cmp(&other.b))
    }
}

/// Which components survive renumbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizePolicy {
    pub min_object_size: usize,
    pub background_class: Option<usize>,
}

impl Default for FinalizePolicy {
    fn default() -> Self {
        Self {
            min_object_size: 1,
            background_class: None,
        }
    }
}

/// Greedy single-linkage merging over an arena union-find.
///
/// Each component carries the element-wise sum of its pixels' class vectors,
/// stored at the component root.
#[derive(Debug, Clone)]
pub struct UnionFindSegmenter {
    width: usize,
    height: usize,
    num_classes: usize,
    sets: DisjointSet,
    tallies: Vec<f32>,
    stats: SegmentationStats,
}

impl UnionFindSegmenter {
    pub fn new(width: usize, height: usize, classes: &PixelClasses) -> Self {
        let num_pixels = width * height;
        assert_eq!(
            classes.num_pixels(),
            num_pixels,
            "class table must cover every pixel"
        );
        let num_classes = classes.num_classes();

        let mut tallies = Vec::with_capacity(num_pixels * num_classes);
        for p in 0..num_pixels {
            tallies.extend_from_slice(classes.pixel(p));
        }

        Self {
            width,
            height,
            num_classes,
            sets: DisjointSet::new(num_pixels),
            tallies,
            stats: SegmentationStats {
                num_pixels,
                ..SegmentationStats::default()
            },
        }
    }

    pub fn stats(&self) -> &SegmentationStats {
        &self.stats
    }

    /// Processes every candidate: edges scoring at or below `prune_threshold`
    /// are pruned, the rest merge in priority order.
    pub fn run<I>(&mut self, edges: I, prune_threshold: f32)
    where
        I: IntoIterator<Item = ScoredEdge>,
    {
        let mut kept = Vec::new();
        for edge in edges {
            self.stats.edges += 1;
            if edge.score > prune_threshold {
                kept.push(edge);
            } else {
                self.stats.pruned += 1;
            }
        }

        kept.sort_unstable_by(ScoredEdge::priority_cmp);
        for edge in &kept {
            if !self.merge(edge.a as usize, edge.b as usize) {
                self.stats.redundant += 1;
            }
        }
    }

    /// Unites the components of two pixels and sums their tallies. Returns
    /// `false` without touching any state when they already share one.
    pub fn merge(&mut self, a: usize, b: usize) -> bool {
        let Some((root, absorbed)) = self.sets.union(a, b) else {
            return false;
        };

        let c = self.num_classes;
        for k in 0..c {
            let moved = self.tallies[absorbed * c + k];
            self.tallies[root * c + k] += moved;
        }
        self.stats.merges += 1;
        true
    }

    /// Class tally of the component containing `pixel`.
    pub fn tally(&mut self, pixel: usize) -> &[f32] {
        let root = self.sets.find(pixel);
        let c = self.num_classes;
        &self.tallies[root * c..(root + 1) * c]
    }

    pub fn same_component(&mut self, a: usize, b: usize) -> bool {
        self.sets.find(a) == self.sets.find(b)
    }

    /// Renumbers surviving components `1..=K` by first pixel in row-major
    /// order and votes each object's class.
    pub fn finalize(
        mut self,
        policy: &FinalizePolicy,
    ) -> (LabelMask, ObjectClasses, SegmentationStats) {
        let num_pixels = self.width * self.height;
        let c = self.num_classes;

        let mut root_label = vec![UNLABELED; num_pixels];
        let mut labels = Vec::with_capacity(num_pixels);
        let mut classes = Vec::new();

        for p in 0..num_pixels {
            let root = self.sets.find(p);
            if root_label[root] == UNLABELED {
                let class = argmax(&self.tallies[root * c..(root + 1) * c]);
                let too_small = self.sets.root_size(root) < policy.min_object_size;
                let is_background = policy.background_class == Some(class);

                root_label[root] = if too_small || is_background {
                    0
                } else {
                    classes.push(class);
                    classes.len() as u32
                };
            }

            let label = root_label[root];
            if label == 0 {
                self.stats.background_pixels += 1;
            }
            labels.push(label);
        }

        self.stats.objects = classes.len();
        let mask =
            Image::from_vec(self.width, self.height, labels).expect("one label per pixel");
        (mask, ObjectClasses::new(classes), self.stats)
    }
}

/// Index of the largest value; ties resolve to the lowest index.
fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
