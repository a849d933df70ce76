//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::LazyLock;

use subtol::{open_session, ReferenceIndex, RepresentationKind};

// Re-export canonical test utilities from subtol::testing
pub use subtol::testing::{
    acgt_fixture, brute_force_positions, map_text, seal_index, SealParams, ACGT_TEXT, DNA,
    FIXTURE_PASSWORD,
};

// ============================================================================
// SEALED FIXTURES
// ============================================================================

/// Sealing runs PBKDF2; build each fixture file once per test binary.
pub static ACGT_FILES: LazyLock<Vec<(RepresentationKind, Vec<u8>)>> = LazyLock::new(|| {
    RepresentationKind::ALL
        .iter()
        .map(|&kind| (kind, acgt_fixture(kind).expect("sealing fixture")))
        .collect()
});

/// A longer text exercising every symbol and multiple FullBwt samples.
pub const GENOME: &str = "GATTACAGATTACACATGCATGCCGTAAGTCGATTACATTAGGCATCGATCGATGCATTACA";

pub static GENOME_FILES: LazyLock<Vec<(RepresentationKind, Vec<u8>)>> = LazyLock::new(|| {
    let text = map_text(GENOME, DNA);
    RepresentationKind::ALL
        .iter()
        .map(|&kind| {
            let params = SealParams::new(kind).sample_rate(8);
            (kind, seal_index(&text, 4, &params).expect("sealing fixture"))
        })
        .collect()
});

/// Open a sealed fixture with the fixture password.
pub fn open(bytes: &[u8]) -> ReferenceIndex {
    open_session(Cursor::new(bytes), FIXTURE_PASSWORD).expect("fixture should open")
}

/// Sealed bytes for one representation out of a fixture set.
pub fn file_for(files: &[(RepresentationKind, Vec<u8>)], kind: RepresentationKind) -> &[u8] {
    files
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, bytes)| bytes.as_slice())
        .expect("fixture for every representation")
}

// ============================================================================
// ASSERTIONS
// ============================================================================

/// `query` + `fetch` agree with a brute-force scan of `text`.
pub fn assert_matches_oracle(index: &ReferenceIndex, text: &[u8], pattern: &[u8]) {
    let expected = brute_force_positions(text, pattern);
    let range = index.query(pattern).expect("valid pattern");
    assert_eq!(
        range.len(),
        expected.len(),
        "count mismatch for {:?} ({})",
        pattern,
        index.kind()
    );
    if expected.is_empty() {
        assert!(range.is_empty());
        return;
    }
    let mut positions = index.fetch(range, None).expect("suffix array present");
    positions.sort_unstable();
    assert_eq!(positions, expected, "positions for {:?} ({})", pattern, index.kind());
}

/// Sorted text positions of `pattern`.
pub fn sorted_positions(index: &ReferenceIndex, pattern: &[u8]) -> Vec<usize> {
    let mut positions = index.locate(pattern, None).expect("locate");
    positions.sort_unstable();
    positions
}
