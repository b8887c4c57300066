//! The fixed OpenQASM 2.0 instruction vocabulary of the generated circuits.
//!
//! Downstream tooling parses exactly these forms, so rendering is fixed:
//!
//! ```text
//! qreg c;                  qreg q[16];
//! h q[0];                  x q;
//! cx q[15], anc;           cswap c, q[3], anc_blk[3];
//! p(fpa..) q[2];           cp(fpa..) q[1], q[0];
//! ccp(fpa..) c, q[4], anc_blk[2];
//! rz(fpa..) c;
//! ```

use std::fmt::{self, Write};

use crate::angle::AngleToken;
use crate::register::{Qubit, Register};

/// One line of emitted circuit text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Register declaration.
    Declare(Register),
    /// Hadamard.
    H(Qubit),
    /// NOT.
    X(Qubit),
    /// CNOT.
    Cx {
        /// Control qubit.
        control: Qubit,
        /// Target qubit.
        target: Qubit,
    },
    /// Uncontrolled phase rotation.
    P {
        /// Rotation angle.
        angle: AngleToken,
        /// Target qubit.
        target: Qubit,
    },
    /// Controlled phase rotation.
    Cp {
        /// Rotation angle.
        angle: AngleToken,
        /// Control qubit.
        control: Qubit,
        /// Target qubit.
        target: Qubit,
    },
    /// Doubly-controlled phase rotation.
    Ccp {
        /// Rotation angle.
        angle: AngleToken,
        /// Both control qubits.
        controls: [Qubit; 2],
        /// Target qubit.
        target: Qubit,
    },
    /// Controlled SWAP (Fredkin).
    Cswap {
        /// Control qubit.
        control: Qubit,
        /// First swapped qubit.
        a: Qubit,
        /// Second swapped qubit.
        b: Qubit,
    },
    /// Z rotation, used for the phase-estimation feedback correction.
    Rz {
        /// Rotation angle.
        angle: AngleToken,
        /// Target qubit.
        target: Qubit,
    },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declare(register) if register.is_scalar() => {
                write!(f, "qreg {};", register.name())
            }
            Self::Declare(register) => {
                write!(f, "qreg {}[{}];", register.name(), register.width())
            }
            Self::H(q) => write!(f, "h {q};"),
            Self::X(q) => write!(f, "x {q};"),
            Self::Cx { control, target } => write!(f, "cx {control}, {target};"),
            Self::P { angle, target } => write!(f, "p({angle}) {target};"),
            Self::Cp {
                angle,
                control,
                target,
            } => write!(f, "cp({angle}) {control}, {target};"),
            Self::Ccp {
                angle,
                controls: [c1, c2],
                target,
            } => write!(f, "ccp({angle}) {c1}, {c2}, {target};"),
            Self::Cswap { control, a, b } => write!(f, "cswap {control}, {a}, {b};"),
            Self::Rz { angle, target } => write!(f, "rz({angle}) {target};"),
        }
    }
}

/// Append one instruction and a newline to `out`.
pub fn push_line(out: &mut String, instruction: &Instruction) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{instruction}");
}

/// Render a sequence of instructions, one per line.
pub fn render<'a>(instructions: impl IntoIterator<Item = &'a Instruction>) -> String {
    let mut out = String::new();
    for instruction in instructions {
        push_line(&mut out, instruction);
    }
    out
}

/// Count the instruction lines in a chunk of circuit text.
///
/// Comments, blank lines and the `OPENQASM`/`include` preamble do not count.
pub fn count_instructions(text: &str) -> usize {
    text.lines()
        .map(str::trim)
        .filter(|line| line.ends_with(';'))
        .filter(|line| !line.starts_with("OPENQASM") && !line.starts_with("include"))
        .count()
}
