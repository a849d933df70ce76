//! Chunk sizes change memory use, never answers.

use std::io::Cursor;

use proptest::prelude::*;
use subtol::{open_session_with, SessionConfig};

use crate::common::{map_text, open, DNA, FIXTURE_PASSWORD, GENOME, GENOME_FILES};

// ============================================================================
// STRATEGIES
// ============================================================================

fn config_strategy() -> impl Strategy<Value = SessionConfig> {
    (1usize..50, 1usize..50, 1usize..50, 1usize..50).prop_map(|(sa, psi, bucket, sample)| {
        SessionConfig {
            suffix_array_chunk: sa,
            psi_chunk: psi,
            bucket_chunk: bucket,
            sample_chunk: sample,
            ..SessionConfig::default()
        }
    })
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Property: any chunk configuration loads an identical index.
    #[test]
    fn prop_chunk_sizes_do_not_change_results(
        config in config_strategy(),
        file in 0usize..3,
        start in 0usize..50,
        len in 1usize..8,
    ) {
        let (_, bytes) = &GENOME_FILES[file];
        let reference = open(bytes);
        let chunked = open_session_with(Cursor::new(bytes), FIXTURE_PASSWORD, &config).unwrap();

        prop_assert_eq!(chunked.counts(), reference.counts());

        let text = map_text(GENOME, DNA);
        let end = (start + len).min(text.len());
        let pattern = &text[start..end];
        let range = chunked.query(pattern).unwrap();
        prop_assert_eq!(range, reference.query(pattern).unwrap());
        prop_assert_eq!(
            chunked.fetch(range, None).unwrap(),
            reference.fetch(range, None).unwrap()
        );
    }
}
