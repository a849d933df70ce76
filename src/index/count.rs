// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The cumulative count table `C`.
//!
//! `C[c]` is the number of text symbols strictly smaller than `c`. It has
//! `alpha + 1` slots: `C[0] = 0` and `C[alpha] = N`. Rows of the conceptual
//! BWT matrix are numbered `0..=N`, row 0 being the sentinel suffix, so the
//! rows starting with symbol `c` are `1 + C[c] .. 1 + C[c + 1]`.
//!
//! Tables are validated on load. The values come from ciphertext that has not
//! been authenticated yet, so a bad table means tampering or a wrong
//! password and is reported as [`Error::Integrity`].

use std::ops::Range;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable {
    cumulative: Vec<usize>,
}

impl CountTable {
    /// Accept an on-disk cumulative table of `alpha + 1` entries.
    pub fn from_cumulative(raw: &[u32], alphabet_size: usize, text_len: usize) -> Result<Self> {
        if raw.len() != alphabet_size + 1 {
            return Err(Error::Integrity("count table has the wrong length"));
        }
        if raw[0] != 0 {
            return Err(Error::Integrity("count table does not start at zero"));
        }
        if raw.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::Integrity("count table is not monotone"));
        }
        if raw[alphabet_size] as usize != text_len {
            return Err(Error::Integrity("count table total differs from text length"));
        }
        Ok(Self {
            cumulative: raw.iter().map(|&v| v as usize).collect(),
        })
    }

    /// Build from per-symbol frequencies (`alpha` entries summing to `N`).
    pub fn from_frequencies(freqs: &[u32], text_len: usize) -> Result<Self> {
        let mut cumulative = Vec::with_capacity(freqs.len() + 1);
        let mut total = 0usize;
        cumulative.push(0);
        for &f in freqs {
            total = total
                .checked_add(f as usize)
                .ok_or(Error::Integrity("symbol frequencies overflow"))?;
            cumulative.push(total);
        }
        if total != text_len {
            return Err(Error::Integrity(
                "symbol frequencies do not sum to text length",
            ));
        }
        Ok(Self { cumulative })
    }

    pub fn alphabet_size(&self) -> usize {
        self.cumulative.len() - 1
    }

    /// `N`.
    pub fn total(&self) -> usize {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// `C[symbol]`: number of text symbols smaller than `symbol`.
    #[inline]
    pub fn smaller_than(&self, symbol: u8) -> usize {
        self.cumulative[symbol as usize]
    }

    /// Occurrences of `symbol` in the text.
    pub fn frequency(&self, symbol: u8) -> usize {
        let c = symbol as usize;
        self.cumulative[c + 1] - self.cumulative[c]
    }

    /// Largest single-symbol frequency.
    pub fn max_frequency(&self) -> usize {
        self.cumulative
            .windows(2)
            .map(|w| w[1] - w[0])
            .max()
            .unwrap_or(0)
    }

    /// Matrix rows whose suffix starts with `symbol`.
    #[inline]
    pub fn rows(&self, symbol: u8) -> Range<usize> {
        let c = symbol as usize;
        1 + self.cumulative[c]..1 + self.cumulative[c + 1]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.cumulative
    }
}
