//! Generator configuration.
//!
//! Values come from, highest precedence first:
//! 1. Command-line flags
//! 2. A YAML configuration file
//! 3. Default values
//!
//! ```yaml
//! tolerance: 1.0e-6
//! workers: 8
//! stride: 1
//! seed: 0
//! batch_timeout_secs: 600
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};
use crate::qft::DEFAULT_TOLERANCE;
use crate::schedule::ThinningPolicy;

/// Settings of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// AQFT phase-error tolerance ε
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Rounds rendered concurrently (0 or 1 runs sequentially)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Thinning stride: one round in every `stride` is emitted
    #[serde(default = "default_stride")]
    pub stride: u32,

    /// Seed for the thinning and feedback generator
    #[serde(default)]
    pub seed: u64,

    /// Bounded wait per batch in seconds
    #[serde(default = "default_batch_timeout")]
    pub batch_timeout_secs: u64,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_workers() -> usize {
    8
}

fn default_stride() -> u32 {
    1
}

fn default_batch_timeout() -> u64 {
    600 // 10 minutes
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            tolerance: default_tolerance(),
            workers: default_workers(),
            stride: default_stride(),
            seed: 0,
            batch_timeout_secs: default_batch_timeout(),
        }
    }
}

impl GeneratorConfig {
    /// Load and validate a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SynthResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SynthError::Config(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate YAML text.
    pub fn from_yaml(contents: &str) -> SynthResult<Self> {
        let config: GeneratorConfig =
            serde_yaml_ng::from_str(contents).map_err(|e| SynthError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> SynthResult<()> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(SynthError::InvalidConfig(format!(
                "tolerance must lie in (0, 1), got {}",
                self.tolerance
            )));
        }
        if self.stride == 0 {
            return Err(SynthError::InvalidConfig(
                "stride must be at least 1".to_string(),
            ));
        }
        if self.batch_timeout_secs == 0 {
            return Err(SynthError::InvalidConfig(
                "batch_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Thinning policy for the configured stride.
    pub fn thinning(&self) -> SynthResult<ThinningPolicy> {
        ThinningPolicy::new(self.stride)
    }

    /// Batch wait as a [`Duration`].
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }

    /// Whether the run uses the parallel pipeline.
    pub fn is_parallel(&self) -> bool {
        self.workers > 1
    }
}
