// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for the search core.
//!
//! Debug-mode assertions over invariants that hold for every index that
//! passed authentication. They are free in release builds (`debug_assert!`).
//! Conditions that can be violated by a hostile file are checked with real
//! errors at load time instead; these only catch bugs.
//!
//! | Contract                   | Invariant                                        |
//! |----------------------------|--------------------------------------------------|
//! | `check_count_table`        | `C` non-decreasing, `C[0] = 0`, `C[alpha] = N`   |
//! | `check_range_ordered`      | backward search keeps `lo <= hi <= N + 1`        |
//! | `check_positions_in_text`  | fetched positions lie in `0..N`                  |

// ============================================================================
// COMPILE-TIME ASSERTIONS
// ============================================================================

const _: () = {
    use crate::config::MAX_TEXT_LEN;
    use crate::format::FIXED_LEN;

    // N + 1 suffix array rows must fit 4-byte integers
    assert!(MAX_TEXT_LEN + 1 <= u32::MAX as u64);

    // algorithm id, four header words, 96-bit nonce
    assert!(FIXED_LEN == 52);
};

// ============================================================================
// COUNT TABLE
// ============================================================================

/// `C` is cumulative and ends at `N`.
#[inline]
pub fn check_count_table(cumulative: &[usize], text_len: usize) {
    debug_assert!(
        cumulative.first() == Some(&0),
        "Contract violation: count table must start at 0"
    );
    debug_assert!(
        cumulative.windows(2).all(|w| w[0] <= w[1]),
        "Contract violation: count table must be non-decreasing"
    );
    debug_assert!(
        cumulative.last() == Some(&text_len),
        "Contract violation: count table total {:?} != text length {}",
        cumulative.last(),
        text_len
    );
}

// ============================================================================
// SEARCH
// ============================================================================

/// A non-empty backward-search interval stays inside the matrix and never
/// contains the sentinel row.
#[inline]
pub fn check_range_ordered(lo: usize, hi: usize, rows: usize) {
    debug_assert!(
        lo >= 1 && lo <= hi && hi <= rows,
        "Contract violation: row interval [{}, {}) outside [1, {}]",
        lo,
        hi,
        rows
    );
}

/// Every fetched position is a real text offset.
#[inline]
pub fn check_positions_in_text(positions: &[usize], text_len: usize) {
    debug_assert!(
        positions.iter().all(|&p| p < text_len),
        "Contract violation: fetched position outside text of length {}",
        text_len
    );
}
