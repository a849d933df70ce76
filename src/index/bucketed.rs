// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-symbol occurrence lists.
//!
//! Body layout:
//!
//! ```text
//! counts  : alpha × u32                  occurrences of each symbol
//! buckets : alpha × max(counts) × u32    bucket a = ascending BWT rows holding a,
//!                                        zero-padded to the largest count
//! ```
//!
//! Padding every bucket to the same length keeps the file size from leaking
//! the symbol distribution. Only the first `counts[a]` entries of each bucket
//! are kept in memory.

use std::io::Read;

use tracing::debug;

use super::count::CountTable;
use super::Occurrence;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::format::{IndexMetadata, SealedReader};

#[derive(Debug, Clone)]
pub struct BucketedBwt {
    buckets: Vec<Vec<u32>>,
}

impl BucketedBwt {
    pub(crate) fn load<R: Read>(
        reader: &mut SealedReader<R>,
        metadata: &IndexMetadata,
        config: &SessionConfig,
    ) -> Result<(CountTable, Self)> {
        let n = metadata.text_len();
        let alpha = metadata.alphabet_size();

        let freqs = reader.read_u32s(alpha, config.bucket_chunk.max(alpha))?;
        let counts = CountTable::from_frequencies(&freqs, n)?;
        let stride = counts.max_frequency();

        let mut buckets = Vec::with_capacity(alpha);
        for symbol in 0..alpha {
            let keep = freqs[symbol] as usize;
            buckets.push(reader.read_u32s_truncated(stride, keep, config.bucket_chunk)?);
        }
        debug!(
            buckets = alpha,
            stride,
            bytes = alpha * stride * 4,
            "decrypted occurrence buckets"
        );
        Ok((counts, Self { buckets }))
    }

    #[cfg(test)]
    pub(crate) fn from_parts(buckets: Vec<Vec<u32>>) -> Self {
        Self { buckets }
    }

    pub fn bucket(&self, symbol: u8) -> &[u32] {
        self.buckets
            .get(symbol as usize)
            .map_or(&[][..], |b| b.as_slice())
    }

    pub(crate) fn payload_bytes(&self) -> usize {
        self.buckets.iter().map(|b| b.len() * 4).sum()
    }
}

impl Occurrence for BucketedBwt {
    #[inline]
    fn occurrence(&self, symbol: u8, row: usize) -> usize {
        self.bucket(symbol).partition_point(|&r| (r as usize) < row)
    }
}
