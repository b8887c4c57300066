//! `shorgen-synth`: modular-exponentiation benchmark circuit synthesis.
//!
//! Emits OpenQASM 2.0 text for the controlled modular-exponentiation core of
//! Shor's algorithm, built entirely from QFT arithmetic:
//!
//! - **Approximate QFT** truncated to the couplings that matter at a given
//!   phase-error tolerance
//! - **Draper adders** adding classical constants in the Fourier basis
//! - **Beauregard modular adders and multipliers** using a single ancilla
//! - **Semiclassical phase estimation** with one recycled control qubit
//!
//! Rotation angles are written as fixed-point tokens (see [`angle`]) rather
//! than floats, so circuits for 2048-bit moduli stay exact.
//!
//! # Quick start
//!
//! ```rust
//! use num_bigint::BigUint;
//! use shorgen_synth::{BenchmarkEmitter, ModExpParams, Schedule, ThinningPolicy};
//!
//! let params = ModExpParams::new(4, BigUint::from(15u32), BigUint::from(7u32)).unwrap();
//! let schedule = Schedule::from_seed(&params, ThinningPolicy::every_round(), 0);
//! let mut emitter = BenchmarkEmitter::new(params, 1e-6);
//!
//! let mut out = Vec::new();
//! let stats = emitter.write_sequential(&schedule, &mut out).unwrap();
//! assert_eq!(stats.emitted_rounds, 8);
//! assert!(String::from_utf8(out).unwrap().starts_with("OPENQASM 2.0;"));
//! ```

pub mod angle;
pub mod arithmetic;
pub mod config;
pub mod emitter;
pub mod error;
pub mod instruction;
pub mod params;
pub mod pipeline;
pub mod presets;
pub mod qft;
pub mod register;
pub mod schedule;
pub mod stats;

use std::io::Write;

pub use angle::AngleToken;
pub use arithmetic::Synthesizer;
pub use config::GeneratorConfig;
pub use emitter::{BenchmarkEmitter, BenchmarkLayout, CircuitWriter, emit_qft_benchmark};
pub use error::{SynthError, SynthResult};
pub use instruction::Instruction;
pub use params::ModExpParams;
pub use pipeline::{ParallelPipeline, ProgressFn};
pub use presets::KeyPreset;
pub use qft::{DEFAULT_TOLERANCE, QftEngine, max_denominator};
pub use register::{Qubit, Register};
pub use schedule::{Round, Schedule, ThinningPolicy};
pub use stats::RunStats;

/// Generate the full benchmark for `params` under `config`.
///
/// Runs the parallel pipeline when `config.workers > 1`, otherwise writes
/// sequentially. Both modes produce identical bytes.
pub async fn generate<W: Write>(
    params: ModExpParams,
    config: &GeneratorConfig,
    writer: W,
    progress: Option<ProgressFn>,
) -> SynthResult<RunStats> {
    config.validate()?;
    let schedule = Schedule::from_seed(&params, config.thinning()?, config.seed);
    let mut emitter = BenchmarkEmitter::new(params, config.tolerance);

    if config.is_parallel() {
        let mut pipeline =
            ParallelPipeline::new(config.workers).with_batch_timeout(config.batch_timeout());
        if let Some(progress) = progress {
            pipeline = pipeline.with_progress_fn(progress);
        }
        pipeline.run(&emitter, &schedule, writer).await
    } else {
        let stats = emitter.write_sequential(&schedule, writer)?;
        if let Some(progress) = progress {
            progress(stats.rounds, stats.rounds);
        }
        Ok(stats)
    }
}
