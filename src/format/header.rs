// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Plaintext file header.
//!
//! The header is the only unencrypted part of the file. It has to be, since
//! the salt is needed to derive the key. Every byte of it is fed to the
//! envelope as associated data, in file order, so tampering with it fails the
//! tag check at the end just like tampering with the body.
//!
//! ```text
//! algorithm_id  u64   slot (mod 4) + 4 if a suffix array is present
//! text_len      u64   N
//! alphabet_size u64   1..=256
//! int_width     u64   must be 4
//! salt_len      u64
//! nonce         [u8; 12]
//! salt          [u8; salt_len]
//! ```

use std::io::{self, Read, Write};

use crate::config::MAX_TEXT_LEN;
use crate::crypto::{CryptoEnvelope, NONCE_LEN};
use crate::error::{Error, Result};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Only 4-byte on-disk integers are supported.
pub const INT_WIDTH: u64 = 4;

/// Any `algorithm_id` at or above this carries a suffix array.
pub const SUFFIX_ARRAY_FLAG: u64 = 4;

/// Largest supported alphabet (symbol codes are bytes).
pub const MAX_ALPHABET: u64 = 256;

/// Salt length cap (prevents huge allocations from a hostile header).
pub const MAX_SALT_LEN: u64 = 1024;

/// Salt length written by the encoder.
pub const DEFAULT_SALT_LEN: usize = 16;

/// Bytes before the salt: algorithm id, four header words, nonce.
pub const FIXED_LEN: usize = 8 + 4 * 8 + NONCE_LEN;

// ============================================================================
// REPRESENTATION SELECTOR
// ============================================================================

/// The three interchangeable index layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepresentationKind {
    /// Psi array over suffix-array order.
    SaPsi,
    /// One ascending row list per symbol.
    BucketedBwt,
    /// Sampled occurrence counters plus bit-packed BWT.
    FullBwt,
}

impl RepresentationKind {
    pub const ALL: [RepresentationKind; 3] = [
        RepresentationKind::SaPsi,
        RepresentationKind::BucketedBwt,
        RepresentationKind::FullBwt,
    ];

    /// Decode `algorithm_id mod 4`. Slot 3 is reserved.
    pub fn from_algorithm_id(algorithm_id: u64) -> Result<Self> {
        match algorithm_id % 4 {
            0 => Ok(RepresentationKind::SaPsi),
            1 => Ok(RepresentationKind::BucketedBwt),
            2 => Ok(RepresentationKind::FullBwt),
            _ => Err(Error::UnsupportedAlgorithm(algorithm_id)),
        }
    }

    pub fn slot(self) -> u64 {
        match self {
            RepresentationKind::SaPsi => 0,
            RepresentationKind::BucketedBwt => 1,
            RepresentationKind::FullBwt => 2,
        }
    }

    /// Algorithm id as written to the header.
    pub fn algorithm_id(self, with_suffix_array: bool) -> u64 {
        self.slot()
            + if with_suffix_array {
                SUFFIX_ARRAY_FLAG
            } else {
                0
            }
    }

    pub fn name(self) -> &'static str {
        match self {
            RepresentationKind::SaPsi => "sa-psi",
            RepresentationKind::BucketedBwt => "bucketed-bwt",
            RepresentationKind::FullBwt => "full-bwt",
        }
    }
}

impl std::fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// HEADER
// ============================================================================

/// Parsed plaintext header. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMetadata {
    pub algorithm_id: u64,
    pub text_len: u64,
    pub alphabet_size: u64,
    pub int_width: u64,
    pub nonce: [u8; NONCE_LEN],
    pub salt: Vec<u8>,
}

impl IndexMetadata {
    pub fn new(
        kind: RepresentationKind,
        with_suffix_array: bool,
        text_len: u64,
        alphabet_size: u64,
        nonce: [u8; NONCE_LEN],
        salt: Vec<u8>,
    ) -> Self {
        Self {
            algorithm_id: kind.algorithm_id(with_suffix_array),
            text_len,
            alphabet_size,
            int_width: INT_WIDTH,
            nonce,
            salt,
        }
    }

    pub fn kind(&self) -> Result<RepresentationKind> {
        RepresentationKind::from_algorithm_id(self.algorithm_id)
    }

    pub fn has_suffix_array(&self) -> bool {
        self.algorithm_id >= SUFFIX_ARRAY_FLAG
    }

    /// `N`, checked by [`validate`](Self::validate) to fit a `usize`.
    pub fn text_len(&self) -> usize {
        self.text_len as usize
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size as usize
    }

    /// Total header length on disk.
    pub fn encoded_len(&self) -> usize {
        FIXED_LEN + self.salt.len()
    }

    fn words(&self) -> [u64; 4] {
        [
            self.text_len,
            self.alphabet_size,
            self.int_width,
            self.salt.len() as u64,
        ]
    }

    /// Read and shape-check the header. Nothing here is authenticated yet.
    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let mut fixed = [0u8; FIXED_LEN];
        r.read_exact(&mut fixed)?;

        let word = |i: usize| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&fixed[i * 8..(i + 1) * 8]);
            u64::from_le_bytes(buf)
        };
        let algorithm_id = word(0);
        let text_len = word(1);
        let alphabet_size = word(2);
        let int_width = word(3);
        let salt_len = word(4);

        // for now only 4-byte integers are supported
        if int_width != INT_WIDTH {
            return Err(Error::unsupported_format(format!(
                "integer width {} (only {} is supported)",
                int_width, INT_WIDTH
            )));
        }
        if salt_len > MAX_SALT_LEN {
            return Err(Error::unsupported_format(format!(
                "salt length {} exceeds {}",
                salt_len, MAX_SALT_LEN
            )));
        }

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&fixed[40..]);
        let mut salt = vec![0u8; salt_len as usize];
        r.read_exact(&mut salt)?;

        let metadata = Self {
            algorithm_id,
            text_len,
            alphabet_size,
            int_width,
            nonce,
            salt,
        };
        metadata.validate(MAX_TEXT_LEN)?;
        Ok(metadata)
    }

    /// Check the declared dimensions against format limits and `max_text_len`.
    pub fn validate(&self, max_text_len: u64) -> Result<()> {
        if self.int_width != INT_WIDTH {
            return Err(Error::unsupported_format(format!(
                "integer width {}",
                self.int_width
            )));
        }
        if self.text_len == 0 {
            return Err(Error::unsupported_format("text length must be positive"));
        }
        if self.text_len > max_text_len.min(MAX_TEXT_LEN) {
            return Err(Error::unsupported_format(format!(
                "text length {} exceeds limit {}",
                self.text_len,
                max_text_len.min(MAX_TEXT_LEN)
            )));
        }
        if self.alphabet_size == 0 || self.alphabet_size > MAX_ALPHABET {
            return Err(Error::unsupported_format(format!(
                "alphabet size {} outside 1..={}",
                self.alphabet_size, MAX_ALPHABET
            )));
        }
        Ok(())
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.algorithm_id.to_le_bytes())?;
        for word in self.words() {
            w.write_all(&word.to_le_bytes())?;
        }
        w.write_all(&self.nonce)?;
        w.write_all(&self.salt)?;
        Ok(())
    }

    /// Feed the header to the envelope as associated data.
    ///
    /// Order is part of the file format: algorithm id, the four header words,
    /// nonce, salt.
    pub fn authenticate(&self, envelope: &mut CryptoEnvelope) -> Result<()> {
        envelope.authenticate(&self.algorithm_id.to_le_bytes())?;
        let mut words = [0u8; 32];
        for (i, word) in self.words().iter().enumerate() {
            words[i * 8..(i + 1) * 8].copy_from_slice(&word.to_le_bytes());
        }
        envelope.authenticate(&words)?;
        envelope.authenticate(&self.nonce)?;
        envelope.authenticate(&self.salt)?;
        Ok(())
    }
}
