use serde::{Deserialize, Serialize};
use ts_core::Error;

/// How adjacency planes encode same-object evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyEncoding {
    /// Raw log-odds; positive means "same object".
    #[default]
    Logit,
    /// Sigmoid outputs in `[0, 1]`.
    Probability,
}

/// How class planes encode per-pixel class evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassEncoding {
    /// Per-pixel probabilities (renormalized after sanitation).
    #[default]
    Probability,
    /// Pre-softmax scores; soft-maxed per pixel.
    Logit,
}

/// Tuning knobs of the object segmenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterOptions {
    /// Subtracted from every merge score; larger values favor "different".
    pub same_different_bias: f32,
    /// Scale on adjacency evidence. `None` resolves to `1 / num_offsets`.
    pub object_merge_factor: Option<f32>,
    /// Added to every merge score.
    pub merge_logprob_bias: f32,
    /// A merge is committed only when its score is strictly above this.
    pub prune_threshold: f32,
    /// Objects with fewer pixels are relabeled as background (id 0).
    pub min_object_size: usize,
    /// Objects voted into this class are relabeled as background (id 0).
    pub background_class: Option<usize>,
    pub adjacency_encoding: AdjacencyEncoding,
    pub class_encoding: ClassEncoding,
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            same_different_bias: 0.0,
            object_merge_factor: None,
            merge_logprob_bias: 0.0,
            prune_threshold: 0.0,
            min_object_size: 1,
            background_class: None,
            adjacency_encoding: AdjacencyEncoding::Logit,
            class_encoding: ClassEncoding::Probability,
        }
    }
}

impl SegmenterOptions {
    pub fn resolved_merge_factor(&self, num_offsets: usize) -> f32 {
        self.object_merge_factor
            .unwrap_or_else(|| 1.0 / num_offsets.max(1) as f32)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let scalars = [
            ("same_different_bias", self.same_different_bias),
            ("merge_logprob_bias", self.merge_logprob_bias),
            ("prune_threshold", self.prune_threshold),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(Error::invalid_input(format!("{name} must be finite, got {value}")));
            }
        }

        if let Some(f) = self.object_merge_factor {
            if !f.is_finite() || f < 0.0 {
                return Err(Error::invalid_input(format!(
                    "object_merge_factor must be finite and non-negative, got {f}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AdjacencyEncoding, ClassEncoding, SegmenterOptions};

    #[test]
    fn merge_factor_defaults_to_inverse_offset_count() {
        let opts = SegmenterOptions::default();
        assert_eq!(opts.resolved_merge_factor(4), 0.25);

        let explicit = SegmenterOptions {
            object_merge_factor: Some(0.0),
            ..SegmenterOptions::default()
        };
        assert_eq!(explicit.resolved_merge_factor(4), 0.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let opts: SegmenterOptions = serde_json::from_str(
            r#"{"prune_threshold": 1.5, "adjacency_encoding": "probability"}"#,
        )
        .expect("valid json");

        assert_eq!(opts.prune_threshold, 1.5);
        assert_eq!(opts.adjacency_encoding, AdjacencyEncoding::Probability);
        assert_eq!(opts.class_encoding, ClassEncoding::Probability);
        assert_eq!(opts.object_merge_factor, None);
        assert_eq!(opts.min_object_size, 1);
    }

    #[test]
    fn validate_rejects_non_finite_values() {
        let opts = SegmenterOptions {
            prune_threshold: f32::NAN,
            ..SegmenterOptions::default()
        };
        assert!(opts.validate().is_err());

        let opts = SegmenterOptions {
            object_merge_factor: Some(-1.0),
            ..SegmenterOptions::default()
        };
        assert!(opts.validate().is_err());

        assert!(SegmenterOptions::default().validate().is_ok());
    }
}
