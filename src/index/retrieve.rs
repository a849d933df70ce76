// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Rank interval → text positions.
//!
//! When the header flags it, the encrypted body starts with the suffix array
//! in matrix-row order: `N + 1` `u32`s, `sa[0] = N` for the sentinel row.
//! Public rank `r` is row `r + 1`, so `fetch` reads `sa[start + 1 ..]`.

use std::io::Read;

use tracing::debug;

use super::RankRange;
use crate::config::SessionConfig;
use crate::contracts::check_positions_in_text;
use crate::error::{Error, Result};
use crate::format::{IndexMetadata, SealedReader};

#[derive(Debug, Clone)]
pub struct SuffixArraySample {
    rows: Vec<u32>,
}

impl SuffixArraySample {
    pub(crate) fn load<R: Read>(
        reader: &mut SealedReader<R>,
        metadata: &IndexMetadata,
        config: &SessionConfig,
    ) -> Result<Self> {
        let n = metadata.text_len();
        let rows = reader.read_u32s(n + 1, config.suffix_array_chunk)?;
        if rows.first().map(|&p| p as usize) != Some(n) {
            return Err(Error::Integrity("suffix array does not start with the sentinel"));
        }
        debug!(entries = rows.len(), bytes = rows.len() * 4, "decrypted suffix array");
        Ok(Self { rows })
    }

    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<u32>) -> Self {
        Self { rows }
    }

    /// `N`.
    pub fn text_len(&self) -> usize {
        self.rows.len() - 1
    }

    pub(crate) fn payload_bytes(&self) -> usize {
        self.rows.len() * 4
    }

    /// Text positions for ranks in `range`, in rank order, at most `limit`.
    pub fn fetch(&self, range: RankRange, limit: Option<usize>) -> Result<Vec<usize>> {
        let n = self.text_len();
        if range.start > n || range.end > n {
            return Err(Error::invalid_input(format!(
                "rank range {}..{} outside 0..{}",
                range.start, range.end, n
            )));
        }
        let take = limit.map_or(range.len(), |l| l.min(range.len()));
        let positions: Vec<usize> = self.rows[range.start + 1..range.start + 1 + take]
            .iter()
            .map(|&p| p as usize)
            .collect();
        check_positions_in_text(&positions, n);
        Ok(positions)
    }
}
