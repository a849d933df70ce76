// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Suffix-array order with the Psi function.
//!
//! Body layout:
//!
//! ```text
//! C   : (alpha + 1) × u32   cumulative counts
//! psi : (N + 1) × u32       psi[r] = ISA[SA[r] + 1], psi[0] = ISA[0]
//! ```
//!
//! Psi maps a row to the row of the next-shorter suffix. Restricted to the
//! rows starting with one symbol it is strictly increasing, so "how many rows
//! of bucket `c` step into `[0, lo)`" is a binary search. Two of those per
//! pattern symbol narrow the interval without any explicit `occ` table.

use std::io::Read;

use tracing::debug;

use super::count::CountTable;
use super::RankRange;
use crate::config::SessionConfig;
use crate::contracts::check_range_ordered;
use crate::error::Result;
use crate::format::{IndexMetadata, SealedReader};

#[derive(Debug, Clone)]
pub struct SaPsi {
    psi: Vec<u32>,
}

impl SaPsi {
    pub(crate) fn load<R: Read>(
        reader: &mut SealedReader<R>,
        metadata: &IndexMetadata,
        config: &SessionConfig,
    ) -> Result<(CountTable, Self)> {
        let n = metadata.text_len();
        let alpha = metadata.alphabet_size();

        let raw_counts = reader.read_u32s(alpha + 1, config.psi_chunk.max(alpha + 1))?;
        let counts = CountTable::from_cumulative(&raw_counts, alpha, n)?;

        let psi = reader.read_u32s(n + 1, config.psi_chunk)?;
        debug!(
            entries = psi.len(),
            bytes = psi.len() * 4,
            "decrypted psi array"
        );
        Ok((counts, Self { psi }))
    }

    #[cfg(test)]
    pub(crate) fn from_parts(psi: Vec<u32>) -> Self {
        Self { psi }
    }

    pub fn len(&self) -> usize {
        self.psi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.psi.is_empty()
    }

    pub(crate) fn payload_bytes(&self) -> usize {
        self.psi.len() * 4
    }

    /// Number of rows in `symbol`'s bucket whose psi lands before `row`.
    #[inline]
    fn rank_into(&self, counts: &CountTable, symbol: u8, row: usize) -> usize {
        let bucket = &self.psi[counts.rows(symbol)];
        bucket.partition_point(|&p| (p as usize) < row)
    }

    /// Backward search over `[lo, hi)` matrix rows.
    pub(crate) fn search(&self, counts: &CountTable, pattern: &[u8]) -> RankRange {
        let mut lo = 0;
        let mut hi = counts.total() + 1;
        for &symbol in pattern.iter().rev() {
            let base = counts.rows(symbol).start;
            lo = base + self.rank_into(counts, symbol, lo);
            hi = base + self.rank_into(counts, symbol, hi);
            if lo >= hi {
                return RankRange::empty_at(lo - 1);
            }
        }
        check_range_ordered(lo, hi, counts.total() + 1);
        RankRange::new(lo - 1, hi - 1)
    }
}
