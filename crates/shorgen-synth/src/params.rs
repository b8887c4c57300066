//! The classical constants of one modular-exponentiation benchmark.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{SynthError, SynthResult};

/// Register width `n`, modulus `N`, base `a` and its inverse `a_inv`.
///
/// The public constructors guarantee `2 ≤ N < 2^n`, `a, a_inv < N` and
/// `a · a_inv ≡ 1 (mod N)`. Synthesis never re-checks these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModExpParams {
    width: u32,
    modulus: BigUint,
    base: BigUint,
    base_inv: BigUint,
}

impl ModExpParams {
    /// Validate `(n, N, a)` and compute `a_inv = a^{-1} mod N`.
    pub fn new(width: u32, modulus: BigUint, base: BigUint) -> SynthResult<Self> {
        check_ranges(width, &modulus, &base)?;
        let base_inv = base
            .modinv(&modulus)
            .ok_or_else(|| SynthError::NotInvertible {
                base: base.clone(),
                modulus: modulus.clone(),
            })?;
        Ok(Self {
            width,
            modulus,
            base,
            base_inv,
        })
    }

    /// Validate a caller-supplied inverse as well.
    pub fn with_inverse(
        width: u32,
        modulus: BigUint,
        base: BigUint,
        base_inv: BigUint,
    ) -> SynthResult<Self> {
        check_ranges(width, &modulus, &base)?;
        if base_inv >= modulus {
            return Err(SynthError::BaseOutOfRange {
                value: base_inv,
                modulus,
            });
        }
        if !((&base * &base_inv) % &modulus).is_one() {
            return Err(SynthError::InverseMismatch {
                base,
                inverse: base_inv,
                modulus,
            });
        }
        Ok(Self {
            width,
            modulus,
            base,
            base_inv,
        })
    }

    /// Register width `n`.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Modulus `N`.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Base `a`.
    pub fn base(&self) -> &BigUint {
        &self.base
    }

    /// `a^{-1} mod N`.
    pub fn base_inv(&self) -> &BigUint {
        &self.base_inv
    }

    /// Number of phase-estimation rounds, `2n`.
    pub const fn iterations(&self) -> u32 {
        2 * self.width
    }
}

fn check_ranges(width: u32, modulus: &BigUint, base: &BigUint) -> SynthResult<()> {
    if width == 0 {
        return Err(SynthError::InvalidWidth(width));
    }
    if modulus < &BigUint::from(2u32) || modulus.bits() > u64::from(width) {
        return Err(SynthError::ModulusOutOfRange {
            modulus: modulus.clone(),
            width,
        });
    }
    if base >= modulus {
        return Err(SynthError::BaseOutOfRange {
            value: base.clone(),
            modulus: modulus.clone(),
        });
    }
    if base.is_zero() {
        return Err(SynthError::NotInvertible {
            base: base.clone(),
            modulus: modulus.clone(),
        });
    }
    Ok(())
}
