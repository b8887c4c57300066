//! Fixed-point rotation-angle tokens.
//!
//! A phase built from terms `π/2^k` is carried as an `n`-bit integer
//! magnitude. Its textual form reverses the magnitude within the `n`-bit
//! field and renders the result in hexadecimal:
//!
//! ```text
//! fpa<2n>0x<hex(reverse_n(magnitude))>
//! ```
//!
//! The width prefix is `2n`, not `n`: the consuming `fpa` reader loads the
//! payload into a `2n`-bit fixed-point word.
//!
//! ```rust
//! use num_bigint::BigUint;
//! use shorgen_synth::angle::{decode, encode};
//!
//! let token = encode(&BigUint::from(1u32), 4);
//! assert_eq!(token.as_str(), "fpa80x8");
//! assert_eq!(decode(token.as_str(), 4).unwrap(), BigUint::from(1u32));
//! ```

use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{SynthError, SynthResult};

/// Textual rotation angle, e.g. `fpa320x8000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AngleToken(String);

impl AngleToken {
    /// The token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AngleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reverse the low `n` bits of `x`. Bits at positions `>= n` are dropped.
pub fn reverse_bits(x: &BigUint, n: u32) -> BigUint {
    let width = u64::from(n);
    let mut y = BigUint::zero();
    for i in 0..width.min(x.bits()) {
        if x.bit(i) {
            y.set_bit(width - 1 - i, true);
        }
    }
    y
}

/// Magnitude whose token carries the two's-complement negation of the
/// token payload of `magnitude`.
///
/// The `fpa` reader treats the payload as the fixed-point number, so a
/// phase is undone by negating `reverse_n(magnitude)`, not `magnitude`.
pub fn negate(magnitude: &BigUint, n: u32) -> BigUint {
    let payload = reverse_bits(magnitude, n);
    if payload.is_zero() {
        return payload;
    }
    let field = BigUint::one() << n;
    reverse_bits(&(field - payload), n)
}

/// Encode an `n`-bit phase magnitude as an angle token.
///
/// The caller masks `magnitude` into `[0, 2^n)`; higher bits are silently
/// discarded.
pub fn encode(magnitude: &BigUint, n: u32) -> AngleToken {
    debug_assert!(
        magnitude.bits() <= u64::from(n),
        "angle magnitude wider than its {n}-bit field"
    );
    let payload = reverse_bits(magnitude, n);
    AngleToken(format!("fpa{}0x{payload:x}", 2 * u64::from(n)))
}

/// Decode a token produced by [`encode`] for the same `n`.
pub fn decode(token: &str, n: u32) -> SynthResult<BigUint> {
    let malformed = |reason: String| SynthError::MalformedAngle {
        token: token.to_string(),
        reason,
    };

    let rest = token
        .strip_prefix("fpa")
        .ok_or_else(|| malformed("missing `fpa` prefix".into()))?;
    let (width, hex) = rest
        .split_once("0x")
        .ok_or_else(|| malformed("missing `0x` payload".into()))?;

    let width: u64 = width
        .parse()
        .map_err(|_| malformed(format!("invalid width prefix `{width}`")))?;
    if width != 2 * u64::from(n) {
        return Err(malformed(format!(
            "width prefix {width} does not match a {n}-bit field"
        )));
    }

    let payload = BigUint::parse_bytes(hex.as_bytes(), 16)
        .ok_or_else(|| malformed(format!("invalid hexadecimal payload `{hex}`")))?;
    if payload.bits() > u64::from(n) {
        return Err(malformed(format!("payload wider than {n} bits")));
    }

    Ok(reverse_bits(&payload, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits(&BigUint::from(0b0001u32), 4), BigUint::from(0b1000u32));
        assert_eq!(reverse_bits(&BigUint::from(0b0110u32), 4), BigUint::from(0b0110u32));
        assert_eq!(reverse_bits(&BigUint::from(0b0011u32), 8), BigUint::from(0b1100_0000u32));
        assert!(reverse_bits(&BigUint::zero(), 16).is_zero());
    }

    #[test]
    fn test_encode_known_tokens() {
        assert_eq!(encode(&BigUint::from(1u32), 4).as_str(), "fpa80x8");
        assert_eq!(encode(&BigUint::from(0b0111u32), 4).as_str(), "fpa80xe");
        assert_eq!(encode(&BigUint::zero(), 16).as_str(), "fpa320x0");
        assert_eq!(encode(&BigUint::from(0x7fffu32), 16).as_str(), "fpa320xfffe");
    }

    #[test]
    fn test_negate_works_on_payload() {
        let m = BigUint::from(0b0110u32);
        assert_eq!(encode(&m, 4).as_str(), "fpa80x6");
        assert_eq!(encode(&negate(&m, 4), 4).as_str(), "fpa80xa");
        // 0b0001 has payload 0b1000, its own negation mod 16.
        assert_eq!(negate(&BigUint::from(1u32), 4), BigUint::from(1u32));
        assert!(negate(&BigUint::zero(), 8).is_zero());
    }

    #[test]
    fn test_width_prefix_is_twice_field() {
        let token = encode(&BigUint::from(5u32), 128);
        assert!(token.as_str().starts_with("fpa2560x"));
    }

    #[test]
    fn test_decode_accepts_upper_case_hex() {
        assert_eq!(decode("fpa80xE", 4).unwrap(), BigUint::from(0b0111u32));
    }

    #[test]
    fn test_decode_rejects_malformed_tokens() {
        for bad in ["pa80x8", "fpa88", "fpa8x0x8", "fpa160x8", "fpa80xg", "fpa80x", "fpa80x1f"] {
            assert!(
                matches!(decode(bad, 4), Err(SynthError::MalformedAngle { .. })),
                "accepted {bad}"
            );
        }
    }
}
