// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Streaming AES-128-GCM session bound to one key and nonce.
//!
//! One-shot AEAD APIs want the whole ciphertext in memory. Index bodies can be
//! gigabytes, so the envelope is assembled from its parts instead: CTR mode for
//! the keystream, GHASH for authentication. Chunks can be any size; partial
//! GHASH blocks are buffered so `k` chunks produce exactly the bytes and tag of
//! one big chunk.
//!
//! The transcript is strictly ordered:
//!
//! ```text
//! authenticate* ──▶ (decrypt | encrypt)* ──▶ finalize / verify
//!      AAD phase          data phase              consumed
//! ```
//!
//! Feeding AAD after the first data chunk, or anything after finalize, fails
//! with [`Error::InvalidState`].

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit, KeyIvInit, StreamCipher};
use aes::Aes128;
use ghash::universal_hash::UniversalHash;
use ghash::GHash;
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

/// AES-128 key length in bytes.
pub const KEY_LEN: usize = 16;

/// GCM nonce length in bytes (the 96-bit fast path).
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

const BLOCK_LEN: usize = 16;

type Keystream = ctr::Ctr32BE<Aes128>;

/// Which way data flows through the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ciphertext in, plaintext out. GHASH sees the input.
    Open,
    /// Plaintext in, ciphertext out. GHASH sees the output.
    Seal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Aad,
    Data,
    Finalized,
}

/// Proof that a tag was checked and matched.
///
/// Only [`CryptoEnvelope::verify`] can create one. Holding it is the sole way
/// to release decrypted state from a [`Pending`](super::Pending).
#[derive(Debug)]
#[must_use]
pub struct TagVerified {
    _private: (),
}

/// An authenticated-encryption session. Consumed exactly once.
pub struct CryptoEnvelope {
    direction: Direction,
    phase: Phase,
    keystream: Keystream,
    ghash: GHash,
    tag_mask: [u8; BLOCK_LEN],
    partial: [u8; BLOCK_LEN],
    partial_len: usize,
    aad_len: u64,
    data_len: u64,
}

impl std::fmt::Debug for CryptoEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("CryptoEnvelope")
            .field("direction", &self.direction)
            .field("phase", &self.phase)
            .field("aad_len", &self.aad_len)
            .field("data_len", &self.data_len)
            .finish_non_exhaustive()
    }
}

impl CryptoEnvelope {
    /// Begin a decrypting session.
    pub fn open(key: &[u8], nonce: &[u8; NONCE_LEN]) -> Result<Self> {
        Self::new(Direction::Open, key, nonce)
    }

    /// Begin an encrypting session.
    pub fn seal(key: &[u8], nonce: &[u8; NONCE_LEN]) -> Result<Self> {
        Self::new(Direction::Seal, key, nonce)
    }

    fn new(direction: Direction, key: &[u8], nonce: &[u8; NONCE_LEN]) -> Result<Self> {
        if key.len() != KEY_LEN {
            return Err(Error::Key {
                expected: KEY_LEN,
                actual: key.len(),
            });
        }
        let key = GenericArray::from_slice(key);
        let cipher = Aes128::new(key);

        // H = E_K(0^128)
        let mut hash_key = aes::Block::default();
        cipher.encrypt_block(&mut hash_key);

        // J0 = nonce || 0^31 || 1, masks the final GHASH value
        let mut counter = [0u8; BLOCK_LEN];
        counter[..NONCE_LEN].copy_from_slice(nonce);
        counter[BLOCK_LEN - 1] = 1;
        let mut mask = aes::Block::clone_from_slice(&counter);
        cipher.encrypt_block(&mut mask);
        let mut tag_mask = [0u8; BLOCK_LEN];
        tag_mask.copy_from_slice(&mask);

        // Payload keystream starts at inc32(J0)
        counter[BLOCK_LEN - 1] = 2;
        let keystream = Keystream::new(key, GenericArray::from_slice(&counter));
        let ghash = <GHash as ghash::universal_hash::KeyInit>::new(&hash_key);

        Ok(Self {
            direction,
            phase: Phase::Aad,
            keystream,
            ghash,
            tag_mask,
            partial: [0u8; BLOCK_LEN],
            partial_len: 0,
            aad_len: 0,
            data_len: 0,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Bytes of associated data processed so far.
    pub fn aad_len(&self) -> u64 {
        self.aad_len
    }

    /// Bytes of payload processed so far.
    pub fn data_len(&self) -> u64 {
        self.data_len
    }

    /// Feed unencrypted bytes as associated data.
    pub fn authenticate(&mut self, bytes: &[u8]) -> Result<()> {
        match self.phase {
            Phase::Aad => {}
            Phase::Data => {
                return Err(Error::InvalidState(
                    "associated data after payload processing started",
                ))
            }
            Phase::Finalized => return Err(Error::InvalidState("envelope already finalized")),
        }
        self.aad_len += bytes.len() as u64;
        self.absorb(bytes);
        Ok(())
    }

    /// Decrypt `buf` in place. Chunk boundaries do not affect the result.
    pub fn decrypt_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        self.require_direction(Direction::Open)?;
        self.begin_data()?;
        self.absorb(buf);
        self.apply_keystream(buf)
    }

    /// Decrypt into a fresh buffer of matching length.
    pub fn decrypt_chunk(&mut self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let mut plaintext = ciphertext.to_vec();
        self.decrypt_in_place(&mut plaintext)?;
        Ok(plaintext)
    }

    /// Encrypt `buf` in place.
    pub fn encrypt_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        self.require_direction(Direction::Seal)?;
        self.begin_data()?;
        self.apply_keystream(buf)?;
        self.absorb(buf);
        Ok(())
    }

    /// Produce the tag over everything processed so far and consume the session.
    pub fn finalize(&mut self) -> Result<[u8; TAG_LEN]> {
        if self.phase == Phase::Finalized {
            return Err(Error::InvalidState("envelope already finalized"));
        }
        self.flush_partial();

        let mut lengths = [0u8; BLOCK_LEN];
        lengths[..8].copy_from_slice(&(self.aad_len * 8).to_be_bytes());
        lengths[8..].copy_from_slice(&(self.data_len * 8).to_be_bytes());
        self.ghash.update(&[ghash::Block::clone_from_slice(&lengths)]);
        self.phase = Phase::Finalized;

        let digest = self.ghash.clone().finalize();
        let mut tag = [0u8; TAG_LEN];
        for (i, byte) in tag.iter_mut().enumerate() {
            *byte = digest[i] ^ self.tag_mask[i];
        }
        Ok(tag)
    }

    /// Compare the computed tag against `expected` in constant time.
    pub fn verify(&mut self, expected: &[u8]) -> Result<TagVerified> {
        let tag = self.finalize()?;
        if expected.len() == TAG_LEN && bool::from(tag.ct_eq(expected)) {
            Ok(TagVerified { _private: () })
        } else {
            Err(Error::Integrity("authentication tag mismatch"))
        }
    }

    fn require_direction(&self, direction: Direction) -> Result<()> {
        if self.direction == direction {
            Ok(())
        } else {
            Err(Error::InvalidState(match direction {
                Direction::Open => "decrypt called on a sealing envelope",
                Direction::Seal => "encrypt called on an opening envelope",
            }))
        }
    }

    fn begin_data(&mut self) -> Result<()> {
        match self.phase {
            Phase::Aad => {
                // AAD is padded to a block boundary before the payload starts
                self.flush_partial();
                self.phase = Phase::Data;
                Ok(())
            }
            Phase::Data => Ok(()),
            Phase::Finalized => Err(Error::InvalidState("envelope already finalized")),
        }
    }

    fn apply_keystream(&mut self, buf: &mut [u8]) -> Result<()> {
        self.keystream
            .try_apply_keystream(buf)
            .map_err(|_| Error::InvalidState("GCM keystream exhausted"))?;
        self.data_len += buf.len() as u64;
        Ok(())
    }

    fn absorb(&mut self, mut data: &[u8]) {
        if self.partial_len > 0 {
            let take = (BLOCK_LEN - self.partial_len).min(data.len());
            self.partial[self.partial_len..self.partial_len + take].copy_from_slice(&data[..take]);
            self.partial_len += take;
            data = &data[take..];
            if self.partial_len < BLOCK_LEN {
                return;
            }
            self.ghash
                .update(&[ghash::Block::clone_from_slice(&self.partial)]);
            self.partial_len = 0;
        }

        let mut blocks = data.chunks_exact(BLOCK_LEN);
        for block in &mut blocks {
            self.ghash.update(&[ghash::Block::clone_from_slice(block)]);
        }
        let rest = blocks.remainder();
        self.partial[..rest.len()].copy_from_slice(rest);
        self.partial_len = rest.len();
    }

    fn flush_partial(&mut self) {
        if self.partial_len == 0 {
            return;
        }
        self.partial[self.partial_len..].fill(0);
        self.ghash
            .update(&[ghash::Block::clone_from_slice(&self.partial)]);
        self.partial_len = 0;
    }
}
