// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Cryptographic plumbing: key derivation, the streaming AEAD envelope, and
//! the `Pending` wrapper that keeps decrypted state sealed off until the tag
//! checks out.
//!
//! Decrypted bytes exist in memory before the tag is known. That is
//! unavoidable with a streaming AEAD. What we can control is who sees them:
//! everything decrypted goes into a [`Pending`], which has no accessors. The
//! only way out is [`Pending::release`], which demands a [`TagVerified`], which
//! only [`CryptoEnvelope::verify`] can mint. If verification fails, the
//! `Pending` is dropped and the plaintext with it.

mod envelope;
mod kdf;

pub use envelope::{CryptoEnvelope, Direction, TagVerified, KEY_LEN, NONCE_LEN, TAG_LEN};
pub use kdf::{derive_key, PBKDF2_ITERATIONS};

/// Decrypted state that has not been authenticated yet.
pub struct Pending<T> {
    inner: T,
}

impl<T> Pending<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Hand out the value once the tag has been verified.
    pub fn release(self, _proof: TagVerified) -> T {
        self.inner
    }
}

impl<T> std::fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Pending(<unverified>)")
    }
}
