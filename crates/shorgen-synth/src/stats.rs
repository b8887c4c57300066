//! Summary of one generation run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SynthResult;

/// Counters reported after a circuit has been written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Register width `n`.
    pub width: u32,
    /// Bit length of the modulus.
    pub modulus_bits: u64,
    /// AQFT coupling bound.
    pub max_denominator: u32,
    /// Rounds in the schedule, emitted or not.
    pub rounds: u32,
    /// Rounds written out.
    pub emitted_rounds: u32,
    /// Instruction lines written, preamble excluded.
    pub instruction_lines: u64,
    /// Bytes written.
    pub bytes_written: u64,
    /// Worker count; 0 for a sequential run.
    pub workers: usize,
    /// Total wall-clock time.
    pub duration: Duration,
    /// Additional metrics.
    #[serde(default)]
    pub metrics: serde_json::Map<String, serde_json::Value>,
}

impl RunStats {
    /// Set the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add a metric.
    pub fn with_metric(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metrics.insert(key.into(), value.into());
        self
    }

    /// Pretty JSON rendering.
    pub fn to_json(&self) -> SynthResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
