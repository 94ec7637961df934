use alloy::primitives::{Address, Bytes, U256};

use crate::errors::EncodeError;

/// Parses a `0x`-prefixed 20 byte address.
///
/// All-lowercase and all-uppercase hex is accepted as is. Mixed case is
/// treated as an EIP-55 checksum and must match.
pub fn parse_address(s: &str) -> Result<Address, EncodeError> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| EncodeError::encoding(format!("invalid address `{s}`: missing 0x prefix")))?;

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(s, None)
            .map_err(|e| EncodeError::encoding(format!("invalid address `{s}`: {e}")))
    } else {
        s.parse::<Address>()
            .map_err(|e| EncodeError::encoding(format!("invalid address `{s}`: {e}")))
    }
}

/// Parses a decimal or `0x` hex unsigned integer. Anything above 256 bits
/// is rejected, as are separators and other radix prefixes.
pub fn parse_uint(s: &str) -> Result<U256, EncodeError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(EncodeError::encoding("expected a number, got an empty string"));
    }

    let (digits, radix) = match s.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    let well_formed = !digits.is_empty()
        && digits
            .chars()
            .all(|c| if radix == 16 { c.is_ascii_hexdigit() } else { c.is_ascii_digit() });
    if !well_formed {
        return Err(EncodeError::encoding(format!("invalid uint256 `{s}`: not a number")));
    }

    U256::from_str_radix(digits, radix)
        .map_err(|e| EncodeError::encoding(format!("invalid uint256 `{s}`: {e}")))
}

/// Like [`parse_uint`], but an empty string reads as zero. Used for the wei
/// `value` of a call, which new rows leave blank.
pub fn parse_value(s: &str) -> Result<U256, EncodeError> {
    if s.trim().is_empty() {
        return Ok(U256::ZERO);
    }
    parse_uint(s)
}

/// Parses `0x`-prefixed whole-byte hex. An empty string and a bare `0x`
/// both yield empty bytes.
pub fn parse_hex_bytes(s: &str) -> Result<Bytes, EncodeError> {
    let s = s.trim();
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| EncodeError::encoding(format!("invalid hex data `{s}`: {e}")))
}
