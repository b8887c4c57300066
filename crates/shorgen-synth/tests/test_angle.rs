//! Tests for the fixed-point angle codec.

use num_bigint::BigUint;
use proptest::prelude::*;
use shorgen_synth::SynthError;
use shorgen_synth::angle::{decode, encode, reverse_bits};

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn round_trip_8_bits(m in any::<u8>()) {
        let m = BigUint::from(m);
        prop_assert_eq!(decode(encode(&m, 8).as_str(), 8).unwrap(), m);
    }

    #[test]
    fn round_trip_16_bits(m in any::<u16>()) {
        let m = BigUint::from(m);
        prop_assert_eq!(decode(encode(&m, 16).as_str(), 16).unwrap(), m);
    }

    #[test]
    fn round_trip_64_bits(m in any::<u64>()) {
        let m = BigUint::from(m);
        prop_assert_eq!(decode(encode(&m, 64).as_str(), 64).unwrap(), m);
    }

    #[test]
    fn round_trip_128_bits(hi in any::<u64>(), lo in any::<u64>()) {
        let m = (BigUint::from(hi) << 64u32) | BigUint::from(lo);
        prop_assert_eq!(decode(encode(&m, 128).as_str(), 128).unwrap(), m);
    }

    #[test]
    fn distinct_magnitudes_give_distinct_tokens(a in any::<u16>(), b in any::<u16>()) {
        prop_assume!(a != b);
        prop_assert_ne!(
            encode(&BigUint::from(a), 16),
            encode(&BigUint::from(b), 16)
        );
    }

    #[test]
    fn reverse_is_an_involution(m in any::<u32>()) {
        let m = BigUint::from(m);
        prop_assert_eq!(reverse_bits(&reverse_bits(&m, 32), 32), m);
    }
}

// ---------------------------------------------------------------------------
// Token grammar
// ---------------------------------------------------------------------------

#[test]
fn token_carries_double_width_prefix() {
    for n in [1u32, 8, 16, 64, 2048] {
        let token = encode(&BigUint::from(1u32), n);
        assert!(token.as_str().starts_with(&format!("fpa{}0x", 2 * n)), "{token}");
    }
}

#[test]
fn single_qubit_field() {
    assert_eq!(encode(&BigUint::from(0u32), 1).as_str(), "fpa20x0");
    assert_eq!(encode(&BigUint::from(1u32), 1).as_str(), "fpa20x1");
}

#[test]
fn decode_rejects_wrong_width() {
    let token = encode(&BigUint::from(3u32), 8);
    assert!(matches!(
        decode(token.as_str(), 16),
        Err(SynthError::MalformedAngle { .. })
    ));
}
