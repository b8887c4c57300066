//! Benchmark circuit emission: `INIT → ITERATE → FINALIZE`.
//!
//! The circuit is semiclassical phase estimation of `x ↦ a·x mod N` with a
//! single recycled control qubit:
//!
//! ```text
//! OPENQASM 2.0;
//! include "qelib1.inc";
//! qreg c;
//! qreg anc_blk[n];
//! qreg anc_mod_adder;
//! qreg q[n];
//!
//! x q;
//! h c;
//! // iteration 0
//!
//! <cua block>
//! rz(<feedback>) c;
//!
//! ...
//! h c;
//! ```
//!
//! Each round's text depends only on its [`Round`] record, so this module
//! also exposes the per-round renderer used by the parallel pipeline.

use std::io::Write;
use std::time::Instant;

use tracing::{debug, info};

use crate::angle::encode;
use crate::arithmetic::Synthesizer;
use crate::error::{SynthError, SynthResult};
use crate::instruction::{Instruction, count_instructions, push_line};
use crate::params::ModExpParams;
use crate::qft::{max_denominator, render_qft};
use crate::register::Register;
use crate::schedule::{Round, Schedule};
use crate::stats::RunStats;

const PREAMBLE: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\n";

/// The four registers of the benchmark circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkLayout {
    /// Phase-estimation control qubit `c`.
    pub control: Register,
    /// Multiplier scratch register `anc_blk`.
    pub accumulator: Register,
    /// Modular-adder ancilla `anc_mod_adder`.
    pub ancilla: Register,
    /// Exponentiated register `q`.
    pub selector: Register,
}

impl BenchmarkLayout {
    /// Registers for width `n`.
    pub fn new(width: u32) -> Self {
        Self {
            control: Register::scalar("c"),
            accumulator: Register::new("anc_blk", width),
            ancilla: Register::scalar("anc_mod_adder"),
            selector: Register::new("q", width),
        }
    }

    /// Declarations in file order.
    pub fn declarations(&self) -> [Instruction; 4] {
        [
            Instruction::Declare(self.control.clone()),
            Instruction::Declare(self.accumulator.clone()),
            Instruction::Declare(self.ancilla.clone()),
            Instruction::Declare(self.selector.clone()),
        ]
    }
}

/// Text of one round: empty for skipped rounds.
pub fn render_round(synth: &mut Synthesizer, layout: &BenchmarkLayout, round: &Round) -> String {
    if !round.emitted {
        return String::new();
    }
    let control = layout.control.qubit(0);
    let mut out = format!("// iteration {}\n\n", round.index);
    synth.cua(
        &control,
        &layout.selector,
        &layout.accumulator,
        &layout.ancilla.qubit(0),
        &round.base,
        &round.base_inv,
        &mut out,
    );
    push_line(
        &mut out,
        &Instruction::Rz {
            angle: encode(&round.feedback, layout.selector.width()),
            target: control,
        },
    );
    out.push('\n');
    out
}

/// Output sink that counts what passes through it.
#[derive(Debug)]
pub struct CircuitWriter<W: Write> {
    inner: W,
    bytes: u64,
    instructions: u64,
}

impl<W: Write> CircuitWriter<W> {
    /// Wrap `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes: 0,
            instructions: 0,
        }
    }

    /// Write a chunk of circuit text.
    pub fn write_block(&mut self, text: &str) -> SynthResult<()> {
        self.inner.write_all(text.as_bytes())?;
        self.bytes += text.len() as u64;
        self.instructions += count_instructions(text) as u64;
        Ok(())
    }

    /// Bytes written so far.
    pub const fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Instruction lines written so far.
    pub const fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> SynthResult<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Sequential benchmark emitter.
#[derive(Debug)]
pub struct BenchmarkEmitter {
    params: ModExpParams,
    layout: BenchmarkLayout,
    synth: Synthesizer,
}

impl BenchmarkEmitter {
    /// Emitter for `params` with AQFT tolerance `tolerance`.
    pub fn new(params: ModExpParams, tolerance: f64) -> Self {
        let d = max_denominator(params.width(), tolerance);
        debug!(width = params.width(), max_denominator = d, "initialising emitter");
        Self {
            layout: BenchmarkLayout::new(params.width()),
            synth: Synthesizer::new(params.modulus().clone(), d),
            params,
        }
    }

    /// The parameters being synthesised.
    pub fn params(&self) -> &ModExpParams {
        &self.params
    }

    /// The register layout.
    pub fn layout(&self) -> &BenchmarkLayout {
        &self.layout
    }

    /// The arithmetic builder, with its QFT cache.
    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synth
    }

    /// `INIT`: preamble, declarations, `x q;`, `h c;`.
    pub fn header(&self) -> String {
        let mut out = String::from(PREAMBLE);
        for declaration in self.layout.declarations() {
            push_line(&mut out, &declaration);
        }
        out.push('\n');
        push_line(&mut out, &Instruction::X(self.layout.selector.whole()));
        push_line(&mut out, &Instruction::H(self.layout.control.qubit(0)));
        out
    }

    /// One round's text using this emitter's cache.
    pub fn round_text(&mut self, round: &Round) -> String {
        render_round(&mut self.synth, &self.layout, round)
    }

    /// `FINALIZE`: `h c;`.
    pub fn footer(&self) -> String {
        Instruction::H(self.layout.control.qubit(0)).to_string() + "\n"
    }

    /// Skeleton of the run statistics; the caller fills in the writer's
    /// counters and the duration.
    pub fn stats_template(&self, schedule: &Schedule, workers: usize) -> RunStats {
        RunStats {
            width: self.params.width(),
            modulus_bits: self.params.modulus().bits(),
            max_denominator: self.synth.max_denominator(),
            rounds: schedule.len() as u32,
            emitted_rounds: schedule.emitted_count() as u32,
            instruction_lines: 0,
            bytes_written: 0,
            workers,
            duration: Default::default(),
            metrics: Default::default(),
        }
    }

    /// Write the whole circuit in one thread.
    pub fn write_sequential<W: Write>(
        &mut self,
        schedule: &Schedule,
        writer: W,
    ) -> SynthResult<RunStats> {
        let start = Instant::now();
        let mut out = CircuitWriter::new(writer);
        out.write_block(&self.header())?;
        for round in schedule.rounds() {
            let text = self.round_text(round);
            out.write_block(&text)?;
        }
        out.write_block(&self.footer())?;

        let mut stats = self.stats_template(schedule, 0);
        stats.instruction_lines = out.instructions();
        stats.bytes_written = out.bytes();
        out.finish()?;

        info!(
            rounds = stats.rounds,
            emitted = stats.emitted_rounds,
            bytes = stats.bytes_written,
            "circuit written"
        );
        Ok(stats
            .with_duration(start.elapsed())
            .with_metric("qft_cache_hits", self.synth.qft_engine().hits()))
    }
}

/// Write the standalone AQFT benchmark on `qreg q[n]`.
pub fn emit_qft_benchmark<W: Write>(writer: W, width: u32, tolerance: f64) -> SynthResult<RunStats> {
    if width == 0 {
        return Err(SynthError::InvalidWidth(width));
    }
    let start = Instant::now();
    let register = Register::new("q", width);
    let d = max_denominator(width, tolerance);

    let mut out = CircuitWriter::new(writer);
    let mut header = String::from(PREAMBLE);
    push_line(&mut header, &Instruction::Declare(register.clone()));
    out.write_block(&header)?;
    out.write_block(&render_qft(&register, d, false))?;

    let stats = RunStats {
        width,
        modulus_bits: 0,
        max_denominator: d,
        rounds: 0,
        emitted_rounds: 0,
        instruction_lines: out.instructions(),
        bytes_written: out.bytes(),
        workers: 0,
        duration: Default::default(),
        metrics: Default::default(),
    };
    out.finish()?;
    Ok(stats.with_duration(start.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ThinningPolicy;
    use num_bigint::BigUint;

    fn emitter(width: u32, modulus: u32, base: u32) -> BenchmarkEmitter {
        let params =
            ModExpParams::new(width, BigUint::from(modulus), BigUint::from(base)).unwrap();
        BenchmarkEmitter::new(params, 1e-6)
    }

    #[test]
    fn test_header_layout() {
        let header = emitter(4, 15, 7).header();
        let expected = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg c;\nqreg anc_blk[4];\n\
                        qreg anc_mod_adder;\nqreg q[4];\n\nx q;\nh c;\n";
        assert_eq!(header, expected);
    }

    #[test]
    fn test_skipped_round_is_empty() {
        let mut emitter = emitter(4, 15, 7);
        let round = Round {
            index: 3,
            base: BigUint::from(1u32),
            base_inv: BigUint::from(1u32),
            emitted: false,
            feedback: BigUint::from(0u32),
        };
        assert!(emitter.round_text(&round).is_empty());
    }

    #[test]
    fn test_round_framing() {
        let mut emitter = emitter(4, 15, 7);
        let round = Round {
            index: 2,
            base: BigUint::from(4u32),
            base_inv: BigUint::from(4u32),
            emitted: true,
            feedback: BigUint::from(1u32),
        };
        let text = emitter.round_text(&round);
        assert!(text.starts_with("// iteration 2\n\n"));
        assert!(text.ends_with("rz(fpa80x8) c;\n\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("cswap")).count(), 4);
    }

    #[test]
    fn test_sequential_counts_match_output() {
        let mut emitter = emitter(4, 15, 7);
        let schedule = Schedule::from_seed(emitter.params(), ThinningPolicy::new(3).unwrap(), 1);
        let mut buffer = Vec::new();
        let stats = emitter.write_sequential(&schedule, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(stats.bytes_written, text.len() as u64);
        assert_eq!(stats.instruction_lines, count_instructions(&text) as u64);
        assert_eq!(stats.rounds, 8);
        assert_eq!(stats.emitted_rounds, 3);
        assert_eq!(text.matches("// iteration").count(), 3);
        assert!(text.ends_with("h c;\n"));
    }

    #[test]
    fn test_qft_benchmark_layout() {
        let mut buffer = Vec::new();
        let stats = emit_qft_benchmark(&mut buffer, 3, 1e-6).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(&lines[..3], &["OPENQASM 2.0;", "include \"qelib1.inc\";", "qreg q[3];"]);
        assert_eq!(lines[3], "h q[0];");
        // Declaration, 3 Hadamards, 3 couplings.
        assert_eq!(stats.instruction_lines, 7);
    }
}
