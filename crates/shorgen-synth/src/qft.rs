//! Approximate quantum Fourier transform (AQFT).
//!
//! The exact QFT on `n` qubits couples every pair of qubits, `O(n²)` gates.
//! Dropping every controlled rotation finer than `π/2^d` bounds the
//! accumulated phase error per qubit by `2πn / 2^d`; choosing
//!
//! ```text
//! d = ceil(log2(2πn) − log2(ε))
//! ```
//!
//! keeps that error below the tolerance `ε` with `O(n·d)` gates.
//!
//! Blocks are pure functions of `(register, n, d)`, so [`QftEngine`] memoises
//! their text for the lifetime of a synthesis run.

use std::f64::consts::PI;
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::One;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::angle::{AngleToken, encode};
use crate::instruction::{Instruction, render};
use crate::register::Register;

/// Default phase-error tolerance ε.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Number of cross-qubit couplings kept per qubit for width `n` and
/// tolerance `ε`. Never less than 1.
pub fn max_denominator(n: u32, tolerance: f64) -> u32 {
    let bound = (2.0 * PI * f64::from(n)).log2() - tolerance.log2();
    if bound.is_nan() || bound < 1.0 {
        return 1;
    }
    // Saturating float-to-int cast; widths large enough to overflow u32 are
    // not representable anyway.
    bound.ceil() as u32
}

/// Angle tokens for coupling distances `1..=min(d, n-1)`.
///
/// The first coupling carries `(2^n − 1) >> 1`; every further step halves it.
fn coupling_angles(n: u32, max_denominator: u32) -> Vec<AngleToken> {
    let full = (BigUint::one() << n) - 1u32;
    let steps = max_denominator.min(n.saturating_sub(1));
    (1..=steps).map(|k| encode(&(&full >> k), n)).collect()
}

/// Forward AQFT instructions for `register`.
///
/// For each qubit `i`: a Hadamard on `i`, then a controlled phase from each of
/// the next `d` qubits `j > i` (control `j`, target `i`).
pub fn qft_instructions(register: &Register, max_denominator: u32) -> Vec<Instruction> {
    let n = register.width();
    let angles = coupling_angles(n, max_denominator);

    let mut steps = Vec::with_capacity(n as usize * (angles.len() + 1));
    for i in 0..n {
        steps.push(Instruction::H(register.qubit(i)));
        for (distance, angle) in (1..).zip(&angles) {
            let j = i + distance;
            if j >= n {
                break;
            }
            steps.push(Instruction::Cp {
                angle: angle.clone(),
                control: register.qubit(j),
                target: register.qubit(i),
            });
        }
    }
    steps
}

/// Inverse AQFT instructions: the forward sequence in reverse order.
///
/// Angles are not negated.
pub fn iqft_instructions(register: &Register, max_denominator: u32) -> Vec<Instruction> {
    let mut steps = qft_instructions(register, max_denominator);
    steps.reverse();
    steps
}

/// Render a QFT block without consulting any cache.
pub fn render_qft(register: &Register, max_denominator: u32, inverse: bool) -> String {
    if inverse {
        render(&iqft_instructions(register, max_denominator))
    } else {
        render(&qft_instructions(register, max_denominator))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QftKey {
    register: Register,
    max_denominator: u32,
}

/// Forward and inverse block text for one register.
#[derive(Debug, Clone)]
pub struct QftBlocks {
    /// Forward transform.
    pub forward: Arc<str>,
    /// Inverse transform.
    pub inverse: Arc<str>,
}

/// Memoising QFT/IQFT block builder.
#[derive(Debug, Default)]
pub struct QftEngine {
    cache: FxHashMap<QftKey, QftBlocks>,
    hits: u64,
}

impl QftEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward and inverse blocks for `register`, built on first request.
    pub fn blocks(&mut self, register: &Register, max_denominator: u32) -> QftBlocks {
        let key = QftKey {
            register: register.clone(),
            max_denominator,
        };
        if let Some(blocks) = self.cache.get(&key) {
            self.hits += 1;
            return blocks.clone();
        }

        debug!(
            register = register.name(),
            width = register.width(),
            max_denominator,
            "building AQFT blocks"
        );
        let forward = qft_instructions(register, max_denominator);
        let inverse = render(forward.iter().rev());
        let blocks = QftBlocks {
            forward: render(&forward).into(),
            inverse: inverse.into(),
        };
        self.cache.insert(key, blocks.clone());
        blocks
    }

    /// Forward block text.
    pub fn qft(&mut self, register: &Register, max_denominator: u32) -> Arc<str> {
        self.blocks(register, max_denominator).forward
    }

    /// Inverse block text.
    pub fn iqft(&mut self, register: &Register, max_denominator: u32) -> Arc<str> {
        self.blocks(register, max_denominator).inverse
    }

    /// Number of distinct cached entries.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Requests served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }
}
