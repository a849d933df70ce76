//! Opening sealed files end to end.

use std::fs;
use std::io::Cursor;
use std::sync::Arc;
use std::thread;

use subtol::{
    open_session, Error, RankRange, RepresentationKind, SessionConfig, SessionFactory,
};

use crate::common::{
    file_for, map_text, open, seal_index, sorted_positions, SealParams, ACGT_FILES, ACGT_TEXT,
    DNA, FIXTURE_PASSWORD, GENOME, GENOME_FILES,
};

// ============================================================================
// HAPPY PATH
// ============================================================================

#[test]
fn test_acgt_scenario_every_representation() {
    let pattern = map_text("ACGT", DNA);
    for (kind, bytes) in ACGT_FILES.iter() {
        let index = open(bytes);
        let range = index.query(&pattern).unwrap();
        assert_eq!(range.len(), 2, "{}", kind);
        assert_eq!(sorted_positions(&index, &pattern), vec![0, 5], "{}", kind);
        assert_eq!(index.text_len(), ACGT_TEXT.len());
    }
}

#[test]
fn test_open_path_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let factory = SessionFactory::default();
    for (kind, bytes) in GENOME_FILES.iter() {
        let path = dir.path().join(format!("{}.idx", kind));
        fs::write(&path, bytes).unwrap();

        let index = factory.open_path(&path, FIXTURE_PASSWORD).unwrap();
        assert_eq!(index.kind(), *kind);
        assert_eq!(index.text_len(), GENOME.len());
        assert_eq!(index.count(&map_text("GATTACA", DNA)).unwrap(), 3);
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SessionFactory::default()
        .open_path(dir.path().join("absent.idx"), FIXTURE_PASSWORD)
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_fetch_limit_and_bounds() {
    let index = open(file_for(&GENOME_FILES, RepresentationKind::SaPsi));
    let range = index.query(&map_text("A", DNA)).unwrap();
    assert!(range.len() > 3);

    assert_eq!(index.fetch(range, Some(3)).unwrap().len(), 3);
    assert_eq!(index.fetch(range, Some(0)).unwrap(), Vec::<usize>::new());
    assert_eq!(index.fetch(range, None).unwrap().len(), range.len());

    let past_end = RankRange::new(0, GENOME.len() + 1);
    assert!(index.fetch(past_end, None).unwrap_err().is_invalid_input());
}

#[test]
fn test_every_position_is_fetchable() {
    let index = open(file_for(&GENOME_FILES, RepresentationKind::BucketedBwt));
    let mut all = index.fetch(RankRange::new(0, GENOME.len()), None).unwrap();
    all.sort_unstable();
    assert_eq!(all, (0..GENOME.len()).collect::<Vec<_>>());
}

#[test]
fn test_without_suffix_array() {
    let text = map_text(GENOME, DNA);
    let pattern = map_text("CAT", DNA);
    for kind in RepresentationKind::ALL {
        let params = SealParams::new(kind).without_suffix_array();
        let bytes = seal_index(&text, 4, &params).unwrap();
        let index = open(&bytes);

        assert!(!index.has_suffix_array());
        assert_eq!(index.metadata().algorithm_id, kind.slot());
        let range = index.query(&pattern).unwrap();
        assert_eq!(range.len(), GENOME.matches("CAT").count());
        assert!(matches!(
            index.fetch(range, None),
            Err(Error::HasNoSuffixArray)
        ));
    }
}

// ============================================================================
// FAILURE MODES
// ============================================================================

#[test]
fn test_wrong_password_every_representation() {
    for (kind, bytes) in ACGT_FILES.iter() {
        let err = open_session(Cursor::new(bytes), b"Tr0ub4dor&3").unwrap_err();
        assert!(err.is_integrity(), "{}: {}", kind, err);
    }
}

#[test]
fn test_empty_password_is_invalid_input() {
    let bytes = file_for(&ACGT_FILES, RepresentationKind::FullBwt);
    let err = open_session(Cursor::new(bytes), b"").unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn test_missing_tag_is_integrity_error() {
    let bytes = file_for(&ACGT_FILES, RepresentationKind::SaPsi);
    let truncated = &bytes[..bytes.len() - 4];
    let err = open_session(Cursor::new(truncated), FIXTURE_PASSWORD).unwrap_err();
    assert!(err.is_integrity(), "{}", err);
}

#[test]
fn test_truncated_header_is_io_error() {
    let bytes = file_for(&ACGT_FILES, RepresentationKind::SaPsi);
    assert!(matches!(
        open_session(Cursor::new(&bytes[..20]), FIXTURE_PASSWORD),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_reserved_slot_is_unsupported_algorithm() {
    let mut bytes = file_for(&ACGT_FILES, RepresentationKind::SaPsi).to_vec();
    bytes[..8].copy_from_slice(&3u64.to_le_bytes());
    assert!(matches!(
        open_session(Cursor::new(&bytes), FIXTURE_PASSWORD),
        Err(Error::UnsupportedAlgorithm(3))
    ));
}

#[test]
fn test_wide_integers_are_unsupported_format() {
    let mut bytes = file_for(&ACGT_FILES, RepresentationKind::BucketedBwt).to_vec();
    bytes[24..32].copy_from_slice(&8u64.to_le_bytes());
    assert!(matches!(
        open_session(Cursor::new(&bytes), FIXTURE_PASSWORD),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn test_suffix_array_flag_is_authenticated() {
    // Dropping the flag shifts where the body is parsed from, and the header
    // no longer matches the AAD the file was sealed with.
    let mut bytes = file_for(&ACGT_FILES, RepresentationKind::BucketedBwt).to_vec();
    let id = RepresentationKind::BucketedBwt.slot();
    bytes[..8].copy_from_slice(&id.to_le_bytes());
    let err = open_session(Cursor::new(&bytes), FIXTURE_PASSWORD).unwrap_err();
    assert!(err.is_integrity(), "{}", err);
}

#[test]
fn test_out_of_alphabet_pattern() {
    let index = open(file_for(&ACGT_FILES, RepresentationKind::FullBwt));
    assert!(index.query(&[4]).unwrap_err().is_invalid_input());
    assert!(index.query(&[0, 1, 200]).unwrap_err().is_invalid_input());
}

// ============================================================================
// CONCURRENCY
// ============================================================================

#[test]
fn test_concurrent_queries_share_one_index() {
    let text = map_text(GENOME, DNA);
    for (kind, bytes) in GENOME_FILES.iter() {
        let index = Arc::new(open(bytes));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let index = Arc::clone(&index);
                let text = text.clone();
                thread::spawn(move || {
                    for start in (t..text.len() - 4).step_by(4) {
                        let pattern = &text[start..start + 4];
                        let positions = index.locate(pattern, None).unwrap();
                        assert!(positions.contains(&start));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap_or_else(|_| panic!("{} worker panicked", kind));
        }
    }
}

#[test]
fn test_query_many_matches_sequential() {
    let index = open(file_for(&GENOME_FILES, RepresentationKind::FullBwt));
    let patterns: Vec<Vec<u8>> = ["GAT", "TTA", "CCCC", "", "GATTACA", "T"]
        .iter()
        .map(|p| map_text(p, DNA))
        .collect();
    let batch = index.query_many(&patterns);
    assert_eq!(batch.len(), patterns.len());
    for (pattern, result) in patterns.iter().zip(batch) {
        assert_eq!(result.unwrap(), index.query(pattern).unwrap());
    }
}

#[test]
fn test_custom_config_through_factory() {
    let config = SessionConfig {
        suffix_array_chunk: 3,
        sample_chunk: 1,
        ..SessionConfig::default()
    };
    let factory = SessionFactory::new(config.clone()).unwrap();
    assert_eq!(factory.config(), &config);

    let bytes = file_for(&GENOME_FILES, RepresentationKind::FullBwt);
    let index = factory.open(Cursor::new(bytes), FIXTURE_PASSWORD).unwrap();
    let reference = open(bytes);
    let pattern = map_text("GCAT", DNA);
    assert_eq!(index.query(&pattern).unwrap(), reference.query(&pattern).unwrap());
}
