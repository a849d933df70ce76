// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Password-based key derivation (PBKDF2-HMAC-SHA256).
//!
//! The salt travels in the clear in the file header. The work factor and key
//! length are part of the file format, so they are constants, not knobs.

use sha2::Sha256;

use super::envelope::KEY_LEN;
use crate::error::{Error, Result};

/// PBKDF2 iteration count baked into the format.
pub const PBKDF2_ITERATIONS: u32 = 16_384;

/// Derive the AES key for `password` and `salt`.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<[u8; KEY_LEN]> {
    if password.is_empty() {
        return Err(Error::invalid_input("password must not be empty"));
    }
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut key);
    Ok(key)
}
