use crate::{AdjacencyEncoding, PixelEdge, SegmenterOptions};

/// Bound on adjacency log-odds; infinite inputs are clamped to it.
pub const MAX_LOGIT: f32 = 30.0;

const PROB_EPS: f32 = 1e-6;
const OVERLAP_EPS: f32 = 1e-6;

/// Signed merge evidence for a pixel pair:
///
/// `factor * logit + ln(max(pA . pB, eps)) + ln(C) + merge_logprob_bias - same_different_bias`
///
/// The class term is zero for uniform vectors (or a single class), `ln(C)` for
/// identical one-hot vectors, and strongly negative for disjoint ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeScorer {
    merge_factor: f32,
    bias: f32,
    class_prior: f32,
    encoding: AdjacencyEncoding,
}

impl MergeScorer {
    pub fn new(options: &SegmenterOptions, num_offsets: usize, num_classes: usize) -> Self {
        Self {
            merge_factor: options.resolved_merge_factor(num_offsets),
            bias: options.merge_logprob_bias - options.same_different_bias,
            class_prior: (num_classes.max(1) as f32).ln(),
            encoding: options.adjacency_encoding,
        }
    }

    pub fn merge_factor(&self) -> f32 {
        self.merge_factor
    }

    pub fn score(&self, edge: &PixelEdge<'_>) -> f32 {
        self.score_parts(edge.raw, edge.class_a, edge.class_b)
    }

    pub fn score_parts(&self, raw: f32, class_a: &[f32], class_b: &[f32]) -> f32 {
        self.merge_factor * self.adjacency_logit(raw)
            + self.class_agreement(class_a, class_b)
            + self.bias
    }

    /// Raw adjacency value as finite log-odds in `[-MAX_LOGIT, MAX_LOGIT]`.
    pub fn adjacency_logit(&self, raw: f32) -> f32 {
        let logit = match self.encoding {
            AdjacencyEncoding::Logit => raw,
            AdjacencyEncoding::Probability => {
                if raw.is_nan() {
                    return 0.0;
                }
                let p = raw.clamp(PROB_EPS, 1.0 - PROB_EPS);
                (p / (1.0 - p)).ln()
            }
        };

        if logit.is_nan() {
            0.0
        } else {
            logit.clamp(-MAX_LOGIT, MAX_LOGIT)
        }
    }

    pub fn class_agreement(&self, class_a: &[f32], class_b: &[f32]) -> f32 {
        let overlap: f32 = class_a.iter().zip(class_b).map(|(a, b)| a * b).sum();
        let overlap = if overlap.is_finite() { overlap } else { 0.0 };
        overlap.max(OVERLAP_EPS).ln() + self.class_prior
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{MAX_LOGIT, MergeScorer};
    use crate::{AdjacencyEncoding, SegmenterOptions};

    #[test]
    fn default_factor_normalizes_by_offset_count() {
        let scorer = MergeScorer::new(&SegmenterOptions::default(), 2, 1);
        assert_abs_diff_eq!(scorer.merge_factor(), 0.5);
        assert_abs_diff_eq!(scorer.score_parts(10.0, &[1.0], &[1.0]), 5.0);
        assert_abs_diff_eq!(scorer.score_parts(-10.0, &[1.0], &[1.0]), -5.0);
    }

    #[test]
    fn biases_are_additive() {
        let opts = SegmenterOptions {
            object_merge_factor: Some(1.0),
            merge_logprob_bias: 0.75,
            same_different_bias: 2.0,
            ..SegmenterOptions::default()
        };
        let scorer = MergeScorer::new(&opts, 4, 1);
        assert_abs_diff_eq!(scorer.score_parts(1.0, &[1.0], &[1.0]), -0.25);
    }

    #[test]
    fn class_agreement_is_monotonic_in_overlap() {
        let scorer = MergeScorer::new(&SegmenterOptions::default(), 2, 2);

        let same = scorer.class_agreement(&[1.0, 0.0], &[1.0, 0.0]);
        let partial = scorer.class_agreement(&[1.0, 0.0], &[0.7, 0.3]);
        let uniform = scorer.class_agreement(&[0.5, 0.5], &[0.5, 0.5]);
        let disjoint = scorer.class_agreement(&[1.0, 0.0], &[0.0, 1.0]);

        assert_abs_diff_eq!(same, 2.0f32.ln(), epsilon = 1e-6);
        assert_abs_diff_eq!(uniform, 0.0, epsilon = 1e-6);
        assert!(same > partial && partial > uniform && uniform > disjoint);
        assert!(disjoint.is_finite());
    }

    #[test]
    fn single_class_contributes_nothing() {
        let scorer = MergeScorer::new(&SegmenterOptions::default(), 4, 1);
        assert_eq!(scorer.class_agreement(&[1.0], &[1.0]), 0.0);
    }

    #[test]
    fn degenerate_adjacency_values_stay_finite() {
        let scorer = MergeScorer::new(&SegmenterOptions::default(), 1, 1);
        assert_eq!(scorer.adjacency_logit(f32::NAN), 0.0);
        assert_eq!(scorer.adjacency_logit(f32::INFINITY), MAX_LOGIT);
        assert_eq!(scorer.adjacency_logit(f32::NEG_INFINITY), -MAX_LOGIT);

        let prob = MergeScorer::new(
            &SegmenterOptions {
                adjacency_encoding: AdjacencyEncoding::Probability,
                ..SegmenterOptions::default()
            },
            1,
            1,
        );
        assert_abs_diff_eq!(prob.adjacency_logit(0.5), 0.0, epsilon = 1e-6);
        assert!(prob.adjacency_logit(0.9) > 0.0);
        assert!(prob.adjacency_logit(0.0).is_finite());
        assert!(prob.adjacency_logit(1.0).is_finite());
        assert_eq!(prob.adjacency_logit(f32::NAN), 0.0);
    }
}
