use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_core::Offset;
use ts_graph::SegmenterOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Model-facing layout shared by the predictor and the segmenter.
///
/// ```json
/// {
///   "num_classes": 2,
///   "num_colors": 3,
///   "offsets": [[0, 1], [1, 0], [1, 1], [-1, 1]],
///   "segmenter": { "prune_threshold": 0.5 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    pub num_classes: usize,
    #[serde(default = "default_num_colors")]
    pub num_colors: usize,
    /// One adjacency plane per offset, `[dy, dx]`.
    pub offsets: Vec<Offset>,
    #[serde(default)]
    pub segmenter: SegmenterOptions,
}

fn default_num_colors() -> usize {
    3
}

impl CoreConfig {
    pub fn new(num_classes: usize, num_colors: usize, offsets: Vec<Offset>) -> Self {
        Self {
            num_classes,
            num_colors,
            offsets,
            segmenter: SegmenterOptions::default(),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn num_offsets(&self) -> usize {
        self.offsets.len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_classes == 0 {
            return Err(ConfigError::Invalid("num_classes must be at least 1".into()));
        }
        if self.num_colors == 0 {
            return Err(ConfigError::Invalid("num_colors must be at least 1".into()));
        }
        if self.offsets.is_empty() {
            return Err(ConfigError::Invalid("offsets must not be empty".into()));
        }

        let mut seen = HashSet::with_capacity(self.offsets.len());
        for o in &self.offsets {
            if o.is_zero() {
                return Err(ConfigError::Invalid("offset [0, 0] is not allowed".into()));
            }
            if !seen.insert(*o) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate offset [{}, {}]",
                    o.dy, o.dx
                )));
            }
        }

        self.segmenter
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if let Some(bg) = self.segmenter.background_class {
            if bg >= self.num_classes {
                return Err(ConfigError::Invalid(format!(
                    "background_class {bg} is outside 0..{}",
                    self.num_classes
                )));
            }
        }

        Ok(())
    }
}
