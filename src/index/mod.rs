// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The verified, queryable index.
//!
//! # Rows and ranks
//!
//! The text is terminated by a sentinel `$` smaller than every symbol. The
//! conceptual BWT matrix has `N + 1` rows; row 0 is the sentinel suffix and
//! matches nothing, so public ranks are `row - 1` and run over `0..N`.
//!
//! # Backward search
//!
//! ```text
//! rows = [0, N + 1)
//! for c in pattern, last to first:
//!     lo = 1 + C[c] + occ(c, lo)
//!     hi = 1 + C[c] + occ(c, hi)
//!     if lo >= hi: no match
//! ranks = [lo - 1, hi - 1)
//! ```
//!
//! `occ(c, row)` counts BWT symbols equal to `c` in rows `< row`. BucketedBwt
//! and FullBwt implement it ([`Occurrence`]); SaPsi narrows the same interval
//! with binary searches over Psi instead.
//!
//! # Lifecycle
//!
//! A [`ReferenceIndex`] can only be obtained from
//! [`SessionFactory`](crate::SessionFactory), which hands it out after the
//! authentication tag checked out. It is immutable from then on and can be
//! shared across threads.

mod bucketed;
mod count;
mod full_bwt;
mod retrieve;
mod sapsi;

pub use bucketed::BucketedBwt;
pub use count::CountTable;
pub use full_bwt::{pack_samples, FullBwt, SampleLayout, DEFAULT_SAMPLE_RATE, MAX_SAMPLE_RATE};
pub use retrieve::SuffixArraySample;
pub use sapsi::SaPsi;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use crate::contracts::{check_count_table, check_range_ordered};
use crate::error::{Error, Result};
use crate::format::{IndexMetadata, RepresentationKind};

// ============================================================================
// RANK RANGE
// ============================================================================

/// Half-open interval of suffix-array ranks. `end <= start` means no match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RankRange {
    pub start: usize,
    pub end: usize,
}

impl RankRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn empty_at(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

// ============================================================================
// BACKWARD SEARCH
// ============================================================================

/// Rank support over the BWT.
pub(crate) trait Occurrence {
    /// Occurrences of `symbol` in BWT rows `0..row`.
    fn occurrence(&self, symbol: u8, row: usize) -> usize;
}

/// FM-index backward search. `pattern` must be non-empty with codes below
/// `counts.alphabet_size()`.
pub(crate) fn backward_search<O: Occurrence + ?Sized>(
    occ: &O,
    counts: &CountTable,
    pattern: &[u8],
) -> RankRange {
    let mut lo = 0;
    let mut hi = counts.total() + 1;
    for &symbol in pattern.iter().rev() {
        let base = counts.rows(symbol).start;
        lo = base + occ.occurrence(symbol, lo);
        hi = base + occ.occurrence(symbol, hi);
        if lo >= hi {
            return RankRange::empty_at(lo - 1);
        }
    }
    check_range_ordered(lo, hi, counts.total() + 1);
    RankRange::new(lo - 1, hi - 1)
}

// ============================================================================
// REPRESENTATIONS
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) enum Representation {
    SaPsi(SaPsi),
    BucketedBwt(BucketedBwt),
    FullBwt(FullBwt),
}

impl Representation {
    fn kind(&self) -> RepresentationKind {
        match self {
            Representation::SaPsi(_) => RepresentationKind::SaPsi,
            Representation::BucketedBwt(_) => RepresentationKind::BucketedBwt,
            Representation::FullBwt(_) => RepresentationKind::FullBwt,
        }
    }

    fn search(&self, counts: &CountTable, pattern: &[u8]) -> RankRange {
        match self {
            Representation::SaPsi(psi) => psi.search(counts, pattern),
            Representation::BucketedBwt(buckets) => backward_search(buckets, counts, pattern),
            Representation::FullBwt(bwt) => backward_search(bwt, counts, pattern),
        }
    }

    fn payload_bytes(&self) -> usize {
        match self {
            Representation::SaPsi(psi) => psi.payload_bytes(),
            Representation::BucketedBwt(buckets) => buckets.payload_bytes(),
            Representation::FullBwt(bwt) => bwt.payload_bytes(),
        }
    }
}

// ============================================================================
// REFERENCE INDEX
// ============================================================================

/// An authenticated, immutable full-text index.
#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    metadata: IndexMetadata,
    counts: CountTable,
    representation: Representation,
    suffix_array: Option<SuffixArraySample>,
}

impl ReferenceIndex {
    pub(crate) fn new(
        metadata: IndexMetadata,
        counts: CountTable,
        representation: Representation,
        suffix_array: Option<SuffixArraySample>,
    ) -> Self {
        check_count_table(counts.as_slice(), metadata.text_len());
        Self {
            metadata,
            counts,
            representation,
            suffix_array,
        }
    }

    pub fn metadata(&self) -> &IndexMetadata {
        &self.metadata
    }

    /// `N`.
    pub fn text_len(&self) -> usize {
        self.counts.total()
    }

    pub fn alphabet_size(&self) -> usize {
        self.counts.alphabet_size()
    }

    pub fn counts(&self) -> &CountTable {
        &self.counts
    }

    pub fn kind(&self) -> RepresentationKind {
        self.representation.kind()
    }

    pub fn has_suffix_array(&self) -> bool {
        self.suffix_array.is_some()
    }

    /// Decrypted bytes held in memory (representation plus suffix array).
    pub fn payload_bytes(&self) -> usize {
        self.representation.payload_bytes()
            + self
                .suffix_array
                .as_ref()
                .map_or(0, SuffixArraySample::payload_bytes)
    }

    /// Rank interval of suffixes starting with `pattern`.
    ///
    /// The empty pattern matches every suffix: `[0, N)`.
    pub fn query(&self, pattern: &[u8]) -> Result<RankRange> {
        let alpha = self.alphabet_size();
        if let Some(&code) = pattern.iter().find(|&&c| c as usize >= alpha) {
            return Err(Error::invalid_input(format!(
                "symbol code {} outside alphabet of size {}",
                code, alpha
            )));
        }
        if pattern.is_empty() {
            return Ok(RankRange::new(0, self.text_len()));
        }
        Ok(self.representation.search(&self.counts, pattern))
    }

    /// Number of occurrences of `pattern`.
    pub fn count(&self, pattern: &[u8]) -> Result<usize> {
        Ok(self.query(pattern)?.len())
    }

    /// Text positions for `range`, in rank order. `None` means no limit.
    pub fn fetch(&self, range: RankRange, limit: Option<usize>) -> Result<Vec<usize>> {
        self.suffix_array
            .as_ref()
            .ok_or(Error::HasNoSuffixArray)?
            .fetch(range, limit)
    }

    /// `query` followed by `fetch`.
    pub fn locate(&self, pattern: &[u8], limit: Option<usize>) -> Result<Vec<usize>> {
        let range = self.query(pattern)?;
        self.fetch(range, limit)
    }

    /// Answer a batch of patterns. Results are in input order.
    pub fn query_many<P>(&self, patterns: &[P]) -> Vec<Result<RankRange>>
    where
        P: AsRef<[u8]> + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            patterns.par_iter().map(|p| self.query(p.as_ref())).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            patterns.iter().map(|p| self.query(p.as_ref())).collect()
        }
    }
}
