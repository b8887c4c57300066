//! QFT-based modular arithmetic.
//!
//! Layers, each built on the previous one:
//!
//! - [`adder::fourier_adder`]: add a constant to a Fourier-basis register
//! - [`Synthesizer::mod_adder`]: `x ← (x + a) mod N`, doubly controlled,
//!   one ancilla
//! - [`Synthesizer::cmul`]: `acc ← (acc + a·x) mod N`, controlled
//! - [`Synthesizer::cua`]: `x ← (a·x) mod N` in place, controlled
//!
//! All emitters append text to a caller-owned `String`.

pub mod adder;
mod modular;
mod multiplier;

use std::sync::Arc;

use num_bigint::BigUint;
use rustc_hash::FxHashMap;

use crate::qft::{QftBlocks, QftEngine};
use crate::register::{Qubit, Register};

pub use adder::{Controls, fourier_adder};

/// Modular-arithmetic circuit builder for a fixed modulus.
///
/// Owns the QFT cache of one synthesis run; every block it hands out is a
/// pure function of its inputs.
#[derive(Debug)]
pub struct Synthesizer {
    modulus: BigUint,
    max_denominator: u32,
    qft: QftEngine,
    corrections: FxHashMap<(Register, Qubit), ModulusCorrection>,
}

/// The two constant-`N` adders used by every modular addition on a given
/// `(register, ancilla)` pair.
#[derive(Debug, Clone)]
struct ModulusCorrection {
    /// Unconditional subtraction of `N`.
    subtract: Arc<str>,
    /// Addition of `N` controlled on the ancilla.
    restore: Arc<str>,
}

impl Synthesizer {
    /// Create a builder for modulus `N` and AQFT depth `max_denominator`.
    pub fn new(modulus: BigUint, max_denominator: u32) -> Self {
        Self {
            modulus,
            max_denominator,
            qft: QftEngine::new(),
            corrections: FxHashMap::default(),
        }
    }

    /// The modulus `N`.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// AQFT coupling bound in use.
    pub const fn max_denominator(&self) -> u32 {
        self.max_denominator
    }

    /// The QFT cache.
    pub fn qft_engine(&self) -> &QftEngine {
        &self.qft
    }

    /// Forward and inverse AQFT text for `register`.
    pub fn qft_blocks(&mut self, register: &Register) -> QftBlocks {
        self.qft.blocks(register, self.max_denominator)
    }
}
