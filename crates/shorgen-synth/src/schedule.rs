//! Phase-estimation round schedule.
//!
//! Round `i` multiplies by `a^(2^(i+1)) mod N`, so the constants of each round
//! depend on the previous one. The schedule runs that squaring chain once, up
//! front, and records per round everything the emitter needs. Emission of
//! the rounds is then independent and may run in any order.
//!
//! To bound output size, a [`ThinningPolicy`] keeps one round per stride of
//! `s` consecutive rounds; skipped rounds still advance the chain.

use num_bigint::BigUint;
use num_traits::One;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::error::{SynthError, SynthResult};
use crate::params::ModExpParams;

/// Keep one pseudo-randomly chosen round out of every `stride` rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinningPolicy {
    stride: u32,
}

impl ThinningPolicy {
    /// A policy with stride `s ≥ 1`.
    pub fn new(stride: u32) -> SynthResult<Self> {
        if stride == 0 {
            return Err(SynthError::InvalidConfig(
                "thinning stride must be at least 1".into(),
            ));
        }
        Ok(Self { stride })
    }

    /// Stride 1: every round is emitted.
    pub const fn every_round() -> Self {
        Self { stride: 1 }
    }

    /// Stride length.
    pub const fn stride(&self) -> u32 {
        self.stride
    }

    /// Number of rounds kept out of `iterations`: `⌈iterations / s⌉`.
    pub const fn emitted_rounds(&self, iterations: u32) -> u32 {
        iterations.div_ceil(self.stride)
    }

    /// Emission flags for rounds `0..iterations`.
    ///
    /// Draws one value per stride from `rng`, even when the stride holds a
    /// single round, so the draw sequence depends only on the round count.
    pub fn select<R: Rng + ?Sized>(&self, iterations: u32, rng: &mut R) -> Vec<bool> {
        let mut keep = vec![false; iterations as usize];
        for start in (0..iterations).step_by(self.stride as usize) {
            let len = self.stride.min(iterations - start);
            let pick = rng.gen_range(0..len);
            keep[(start + pick) as usize] = true;
        }
        keep
    }
}

impl Default for ThinningPolicy {
    fn default() -> Self {
        Self::every_round()
    }
}

/// One phase-estimation round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    /// Iteration index `i`.
    pub index: u32,
    /// Multiplier constant of this round.
    pub base: BigUint,
    /// Its modular inverse.
    pub base_inv: BigUint,
    /// Whether the round's block is written out.
    pub emitted: bool,
    /// Magnitude of the `rz` correction on the control qubit.
    pub feedback: BigUint,
}

/// The precomputed squaring chain with thinning and feedback decisions.
#[derive(Debug, Clone)]
pub struct Schedule {
    rounds: Vec<Round>,
}

impl Schedule {
    /// Build the schedule, drawing all randomness from `rng`.
    ///
    /// The measurement record used for the feedback rotations is drawn
    /// before the thinning choices.
    pub fn plan<R: Rng + ?Sized>(
        params: &ModExpParams,
        policy: ThinningPolicy,
        rng: &mut R,
    ) -> Self {
        let n = params.width();
        let iterations = params.iterations();
        let record = measurement_record(iterations, rng);
        let keep = policy.select(iterations, rng);
        if policy.stride() > iterations {
            warn!(
                stride = policy.stride(),
                iterations, "thinning stride exceeds round count, emitting a single round"
            );
        }

        let modulus = params.modulus();
        let mut base = params.base().clone();
        let mut base_inv = params.base_inv().clone();
        let mut rounds = Vec::with_capacity(iterations as usize);
        for (index, emitted) in (0..iterations).zip(keep) {
            base = (&base * &base) % modulus;
            base_inv = (&base_inv * &base_inv) % modulus;

            let known = index.min(n);
            let feedback = &record & ((BigUint::one() << known) - 1u32);
            rounds.push(Round {
                index,
                base: base.clone(),
                base_inv: base_inv.clone(),
                emitted,
                feedback,
            });
        }

        let schedule = Self { rounds };
        debug!(
            rounds = iterations,
            emitted = schedule.emitted_count(),
            stride = policy.stride(),
            "planned round schedule"
        );
        schedule
    }

    /// Build the schedule from a seeded [`StdRng`].
    pub fn from_seed(params: &ModExpParams, policy: ThinningPolicy, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::plan(params, policy, &mut rng)
    }

    /// All rounds in index order.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Rounds that are written out.
    pub fn emitted(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter().filter(|round| round.emitted)
    }

    /// Number of rounds written out.
    pub fn emitted_count(&self) -> usize {
        self.emitted().count()
    }

    /// Total number of rounds.
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// Whether the schedule has no rounds.
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}

/// A uniformly random `bits`-bit integer.
fn measurement_record<R: Rng + ?Sized>(bits: u32, rng: &mut R) -> BigUint {
    let digits: Vec<u32> = (0..bits.div_ceil(32)).map(|_| rng.r#gen()).collect();
    BigUint::from_slice(&digits) & ((BigUint::one() << bits) - 1u32)
}
