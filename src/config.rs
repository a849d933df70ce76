// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Session loading configuration.
//!
//! Chunk sizes bound how much ciphertext is held in memory while a body is
//! streamed through the envelope. They never change results. The defaults
//! are the buffer sizes each representation was tuned with.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest text length representable with 4-byte on-disk integers
/// (the suffix array stores `N + 1` rows).
pub const MAX_TEXT_LEN: u64 = u32::MAX as u64 - 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionConfig {
    /// Suffix array entries decrypted per chunk.
    pub suffix_array_chunk: usize,
    /// Psi entries decrypted per chunk.
    pub psi_chunk: usize,
    /// Bucket entries decrypted per chunk.
    pub bucket_chunk: usize,
    /// FullBwt samples decrypted per chunk.
    pub sample_chunk: usize,
    /// Refuse headers that declare a longer text.
    pub max_text_len: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            suffix_array_chunk: 512,
            psi_chunk: 32,
            bucket_chunk: 32,
            sample_chunk: 5,
            max_text_len: MAX_TEXT_LEN,
        }
    }
}

impl SessionConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| Error::invalid_input(format!("bad session config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        let chunks = [
            ("suffixArrayChunk", self.suffix_array_chunk),
            ("psiChunk", self.psi_chunk),
            ("bucketChunk", self.bucket_chunk),
            ("sampleChunk", self.sample_chunk),
        ];
        for (name, value) in chunks {
            if value == 0 {
                return Err(Error::invalid_input(format!("{} must be positive", name)));
            }
        }
        if self.max_text_len == 0 || self.max_text_len > MAX_TEXT_LEN {
            return Err(Error::invalid_input(format!(
                "maxTextLen must be in 1..={}",
                MAX_TEXT_LEN
            )));
        }
        Ok(())
    }
}
