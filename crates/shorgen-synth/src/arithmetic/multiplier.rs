//! Controlled modular multiplication and the in-place exponentiation step.

use num_bigint::BigUint;
use tracing::trace;

use super::Synthesizer;
use crate::instruction::{Instruction, push_line};
use crate::register::{Qubit, Register};

impl Synthesizer {
    /// Append `accumulator ← (accumulator + a·selector) mod N`, controlled
    /// on `control`.
    ///
    /// Shift-and-add: selector bit `i` gates a modular addition of
    /// `a·2^i mod N`. The accumulator is transformed once up front and once
    /// at the end rather than around every addition.
    pub fn cmul(
        &mut self,
        control: &Qubit,
        selector: &Register,
        accumulator: &Register,
        ancilla: &Qubit,
        a: &BigUint,
        out: &mut String,
    ) {
        trace!(width = selector.width(), "emitting controlled multiplier");
        let blocks = self.qft_blocks(accumulator);
        out.push_str(&blocks.forward);

        let mut addend = a % &self.modulus;
        for i in 0..selector.width() {
            self.mod_adder(control, &selector.qubit(i), accumulator, ancilla, &addend, out);
            addend = (addend << 1u32) % &self.modulus;
        }

        out.push_str(&blocks.inverse);
    }

    /// Append the controlled in-place step `selector ← (a·selector) mod N`.
    ///
    /// `accumulator` is scratch: it starts and ends at 0. Multiplying into
    /// it, swapping the two registers, then running the multiplier with
    /// `a_inv` leaves the product in `selector`.
    #[allow(clippy::too_many_arguments)]
    pub fn cua(
        &mut self,
        control: &Qubit,
        selector: &Register,
        accumulator: &Register,
        ancilla: &Qubit,
        a: &BigUint,
        a_inv: &BigUint,
        out: &mut String,
    ) {
        self.cmul(control, selector, accumulator, ancilla, a, out);
        for k in 0..selector.width() {
            push_line(
                out,
                &Instruction::Cswap {
                    control: control.clone(),
                    a: selector.qubit(k),
                    b: accumulator.qubit(k),
                },
            );
        }
        self.cmul(control, selector, accumulator, ancilla, a_inv, out);
    }
}
