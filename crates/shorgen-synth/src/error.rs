//! Error types for the synthesis crate.

use num_bigint::BigUint;
use thiserror::Error;

/// Errors produced while validating inputs or emitting a benchmark circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// Register width must be at least one qubit.
    #[error("register width must be at least 1, got {0}")]
    InvalidWidth(u32),

    /// The modulus does not fit the register (or is trivially small).
    #[error("modulus {modulus} must satisfy 2 <= N < 2^{width}")]
    ModulusOutOfRange {
        /// The offending modulus.
        modulus: BigUint,
        /// Register width in qubits.
        width: u32,
    },

    /// The base (or its inverse) is not reduced modulo N.
    #[error("value {value} must be smaller than modulus {modulus}")]
    BaseOutOfRange {
        /// The offending value.
        value: BigUint,
        /// The modulus.
        modulus: BigUint,
    },

    /// The base shares a factor with the modulus.
    #[error("base {base} has no inverse modulo {modulus}")]
    NotInvertible {
        /// The base.
        base: BigUint,
        /// The modulus.
        modulus: BigUint,
    },

    /// A caller-supplied inverse does not satisfy `a · a_inv ≡ 1 (mod N)`.
    #[error("{base} * {inverse} is not congruent to 1 modulo {modulus}")]
    InverseMismatch {
        /// The base.
        base: BigUint,
        /// The supplied inverse.
        inverse: BigUint,
        /// The modulus.
        modulus: BigUint,
    },

    /// An angle token could not be decoded.
    #[error("malformed angle token `{token}`: {reason}")]
    MalformedAngle {
        /// The token text.
        token: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A configuration value is outside its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read or parsed.
    #[error("failed to load configuration: {0}")]
    Config(String),

    /// Run statistics could not be serialized.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the output stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A pipeline worker panicked or was torn down before reporting.
    #[error("worker for iteration {iteration} failed: {reason}")]
    WorkerFailed {
        /// Iteration the worker was building.
        iteration: u32,
        /// Failure description.
        reason: String,
    },

    /// Not every report of a batch arrived within the configured wait.
    #[error("batch starting at iteration {batch_start} did not complete within {waited_secs}s")]
    BatchTimeout {
        /// First iteration index of the stalled batch.
        batch_start: u32,
        /// Seconds waited before giving up.
        waited_secs: u64,
    },
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;
