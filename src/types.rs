// src/types.rs
use crate::utils::error::MinerError;
use hex_literal::hex;
use lazy_static::lazy_static;
use num_bigint::BigUint;
use std::fmt;
use std::str::FromStr;

/// Width of a 256-bit value rendered as hex digits
pub const HEX_WIDTH: usize = 64;

lazy_static! {
    /// Largest 256-bit value, `2^256 - 1`
    pub static ref MAX_HASH: BigUint = BigUint::from_bytes_be(&hex!(
        "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
    ));

    /// Starting difficulty of every session: 32 bits of leading zeros
    pub static ref INITIAL_TARGET: Target = Target(BigUint::from_bytes_be(&hex!(
        "00000000ffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
    )));
}

/// A 256-bit difficulty target
///
/// Candidate solutions are valid when their computed value is numerically
/// below the target, so a smaller target means a harder search.
///
/// Renders as `0x` followed by exactly 64 lowercase, zero-padded hex digits,
/// which is the form both the pool and the compute worker expect.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Target(BigUint);

impl Target {
    /// Wraps an arbitrary-precision value, saturating at `2^256 - 1`
    pub fn new(value: BigUint) -> Self {
        if value > *MAX_HASH {
            Target(MAX_HASH.clone())
        } else {
            Target(value)
        }
    }

    /// Underlying numeric value
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_bytes_be();
        let mut padded = [0u8; HEX_WIDTH / 2];
        padded[HEX_WIDTH / 2 - bytes.len()..].copy_from_slice(&bytes);
        write!(f, "0x{}", hex::encode(padded))
    }
}

impl FromStr for Target {
    type Err = MinerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = pad_hex(s)?;
        let bytes = hex::decode(&digits[2..])?;
        Ok(Target(BigUint::from_bytes_be(&bytes)))
    }
}

/// Normalizes a hex string to the fixed `0x` + 64 digit form
///
/// Accepts input with or without a `0x` prefix and left-pads it with zeros.
/// Digits are preserved as given, so the value round-trips bit-for-bit.
///
/// # Errors
/// Returns `MinerError::InputError` if the input is empty, longer than 64
/// digits, or contains non-hex characters
pub fn pad_hex(s: &str) -> Result<String, MinerError> {
    let digits = s
        .trim()
        .strip_prefix("0x")
        .or_else(|| s.trim().strip_prefix("0X"))
        .unwrap_or(s.trim());

    if digits.is_empty() || digits.len() > HEX_WIDTH {
        return Err(MinerError::InputError(format!(
            "Expected 1 to {} hex digits, got '{}'",
            HEX_WIDTH, s
        )));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(MinerError::InputError(format!("Not a hex value: '{}'", s)));
    }

    Ok(format!("0x{}{}", "0".repeat(HEX_WIDTH - digits.len()), digits))
}
