//! PIN rules and secret sealing for vault creation.

use solana_program::hash::hash;

use crate::constants::{FLAGSHIP_PIN_LEN, STANDARD_PIN_MAX_LEN, STANDARD_PIN_MIN_LEN};
use crate::errors::{Result, VaultClientError};

/// Commitment stored on the vault: sha256 of the PIN's bytes.
pub fn seal_secret(pin: &str) -> [u8; 32] {
    hash(pin.as_bytes()).to_bytes()
}

/// Flagship length passes through, anything else is forced into the
/// standard range.
pub fn clamp_pin_len(len: usize) -> u8 {
    let len = if len == FLAGSHIP_PIN_LEN {
        len
    } else {
        len.clamp(STANDARD_PIN_MIN_LEN, STANDARD_PIN_MAX_LEN)
    };
    len as u8
}

/// Checks `pin` is all digits and of an allowed length. Returns the length.
pub fn validate_pin(pin: &str) -> Result<u8> {
    if pin.is_empty() {
        return Err(VaultClientError::InvalidPin("empty"));
    }
    if !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VaultClientError::InvalidPin("digits only"));
    }
    let len = pin.len();
    if len != FLAGSHIP_PIN_LEN && !(STANDARD_PIN_MIN_LEN..=STANDARD_PIN_MAX_LEN).contains(&len) {
        return Err(VaultClientError::InvalidPin("length must be 3-6, or 8 for the flagship"));
    }
    Ok(len as u8)
}

/// Fee of the first guess for a vault with `base_fee` and `pin_len`.
/// Shorter PINs are easier and start more expensive.
pub fn starting_fee_preview(base_fee: u64, pin_len: usize) -> u64 {
    let multiplier = match clamp_pin_len(pin_len) {
        3 => 100,
        4 => 25,
        5 => 10,
        8 => 1,
        _ => 10,
    };
    base_fee.saturating_mul(multiplier)
}
