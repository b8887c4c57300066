//! Single-ancilla modular adder (Beauregard construction).

use num_bigint::BigUint;

use super::adder::{Controls, fourier_adder};
use super::{ModulusCorrection, Synthesizer};
use crate::instruction::{Instruction, push_line, render};
use crate::register::{Qubit, Register};

impl Synthesizer {
    /// Append `register ← (register + a) mod N` controlled on `c1` and `c2`.
    ///
    /// `register` must be in the Fourier basis on entry and is left there.
    /// With either control at 0 the block is the identity. `ancilla` starts
    /// and ends in |0⟩ whatever the control values, so one ancilla serves a
    /// whole multiplier.
    pub fn mod_adder(
        &mut self,
        c1: &Qubit,
        c2: &Qubit,
        register: &Register,
        ancilla: &Qubit,
        a: &BigUint,
        out: &mut String,
    ) {
        let controls = Controls::Double(c1, c2);
        let add_a = render(&fourier_adder(controls, register, a, false));
        let sub_a = render(&fourier_adder(controls, register, a, true));
        let correction = self.modulus_correction(register, ancilla);
        let blocks = self.qft_blocks(register);
        let sign = register.msb();

        // x + a − N; the sign qubit flags underflow into the ancilla.
        out.push_str(&add_a);
        out.push_str(&correction.subtract);
        out.push_str(&blocks.inverse);
        push_line(
            out,
            &Instruction::Cx {
                control: sign.clone(),
                target: ancilla.clone(),
            },
        );
        out.push_str(&blocks.forward);
        out.push_str(&correction.restore);

        // Uncompute the ancilla: it is set exactly when x + a < N.
        out.push_str(&sub_a);
        out.push_str(&blocks.inverse);
        push_line(out, &Instruction::X(sign.clone()));
        push_line(
            out,
            &Instruction::Cx {
                control: sign.clone(),
                target: ancilla.clone(),
            },
        );
        push_line(out, &Instruction::X(sign));
        out.push_str(&blocks.forward);
        out.push_str(&add_a);
    }

    fn modulus_correction(&mut self, register: &Register, ancilla: &Qubit) -> ModulusCorrection {
        let key = (register.clone(), ancilla.clone());
        if let Some(correction) = self.corrections.get(&key) {
            return correction.clone();
        }
        let correction = ModulusCorrection {
            subtract: render(&fourier_adder(
                Controls::Uncontrolled,
                register,
                &self.modulus,
                true,
            ))
            .into(),
            restore: render(&fourier_adder(
                Controls::Single(ancilla),
                register,
                &self.modulus,
                false,
            ))
            .into(),
        };
        self.corrections.insert(key, correction.clone());
        correction
    }
}
