//! Draper-style addition of a classical constant in the Fourier basis.
//!
//! With the target register already transformed by a QFT, adding `a` is a
//! single phase rotation per qubit: qubit `i` rotates by the angle encoding
//! the bits of `a` at positions `i..n`. The caller brackets the adder with
//! `qft`/`iqft`.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::angle::{encode, negate};
use crate::instruction::Instruction;
use crate::register::{Qubit, Register};

/// Quantum controls applied to every rotation of an adder.
#[derive(Debug, Clone, Copy)]
pub enum Controls<'a> {
    /// `p(..)` gates.
    Uncontrolled,
    /// `cp(..)` gates.
    Single(&'a Qubit),
    /// `ccp(..)` gates.
    Double(&'a Qubit, &'a Qubit),
}

/// Phase rotations adding (or, with `inverse`, subtracting) `a` to a
/// Fourier-basis register.
///
/// Qubits whose masked magnitude is zero are skipped, so `a = 0` yields no
/// instructions. Subtraction negates every token payload modulo `2^n` (see
/// [`negate`]) and reverses the instruction order.
pub fn fourier_adder(
    controls: Controls<'_>,
    register: &Register,
    a: &BigUint,
    inverse: bool,
) -> Vec<Instruction> {
    let n = register.width();
    let field = BigUint::one() << n;
    let a = a % &field;

    let mut steps = Vec::new();
    for i in 0..n {
        // Keep the bits of `a` at positions i..n.
        let masked = (&a >> i) << i;
        if masked.is_zero() {
            continue;
        }
        let magnitude = if inverse { negate(&masked, n) } else { masked };
        let angle = encode(&magnitude, n);
        let target = register.qubit(i);

        steps.push(match controls {
            Controls::Uncontrolled => Instruction::P { angle, target },
            Controls::Single(control) => Instruction::Cp {
                angle,
                control: control.clone(),
                target,
            },
            Controls::Double(c1, c2) => Instruction::Ccp {
                angle,
                controls: [c1.clone(), c2.clone()],
                target,
            },
        });
    }

    if inverse {
        steps.reverse();
    }
    steps
}
