//! Named RSA test keys.

use num_bigint::BigUint;

use crate::error::{SynthError, SynthResult};
use crate::params::ModExpParams;

/// A built-in `(n, N, a)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPreset {
    /// Preset name.
    pub name: &'static str,
    /// Register width `n`.
    pub width: u32,
    /// Modulus `N`, decimal.
    pub modulus: &'static str,
    /// Base `a`, decimal.
    pub base: &'static str,
}

/// All presets, smallest first.
pub const PRESETS: &[KeyPreset] = &[
    KeyPreset {
        name: "rsa16",
        width: 16,
        modulus: "22499",
        base: "230",
    },
    KeyPreset {
        name: "rsa128",
        width: 128,
        modulus: "168425339336371607834480189065517156539",
        base: "15286634156585511877",
    },
    KeyPreset {
        name: "rsa256",
        width: 256,
        modulus: "79311112543800559059544670893166856913365574321673273203857240979443239847857",
        base: "329916967358087561489242136217384669929",
    },
];

/// Look up a preset by name.
pub fn find(name: &str) -> Option<&'static KeyPreset> {
    PRESETS.iter().find(|preset| preset.name.eq_ignore_ascii_case(name))
}

impl KeyPreset {
    /// Validated parameters, with `a_inv` computed.
    pub fn params(&self) -> SynthResult<ModExpParams> {
        ModExpParams::new(
            self.width,
            parse_decimal(self.modulus)?,
            parse_decimal(self.base)?,
        )
    }
}

/// Parse a non-negative decimal integer.
pub fn parse_decimal(text: &str) -> SynthResult<BigUint> {
    BigUint::parse_bytes(text.trim().as_bytes(), 10)
        .ok_or_else(|| SynthError::InvalidConfig(format!("`{text}` is not a decimal integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_are_valid() {
        for preset in PRESETS {
            let params = preset.params().unwrap();
            assert_eq!(params.width(), preset.width, "{}", preset.name);
        }
    }

    #[test]
    fn test_rsa16_inverse() {
        let params = find("rsa16").unwrap().params().unwrap();
        assert_eq!(params.base_inv(), &BigUint::from(9880u32));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(find("RSA128").map(|p| p.width), Some(128));
        assert!(find("rsa2048").is_none());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(" 42 ").unwrap(), BigUint::from(42u32));
        assert!(parse_decimal("0x2a").is_err());
        assert!(parse_decimal("").is_err());
    }
}
