//! Reading the plaintext header without a password.

use std::io::Cursor;

use subtol::{Error, IndexMetadata, RepresentationKind};

use crate::common::{file_for, ACGT_FILES};

#[test]
fn test_header_reads_without_password() {
    for &(kind, ref bytes) in ACGT_FILES.iter() {
        let header = IndexMetadata::read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(header.kind().unwrap(), kind);
        assert!(header.has_suffix_array());
        assert_eq!(header.algorithm_id, kind.slot() + 4);
        assert_eq!(header.text_len, 9);
        assert_eq!(header.alphabet_size, 4);
        assert_eq!(header.int_width, 4);
        assert_eq!(header.salt.len(), 16);
    }
}

#[test]
fn test_header_rejects_unknown_shape() {
    let bytes = file_for(&ACGT_FILES, RepresentationKind::FullBwt);

    // alphabet size 0
    let mut bad = bytes.to_vec();
    bad[16..24].copy_from_slice(&0u64.to_le_bytes());
    assert!(matches!(
        IndexMetadata::read(&mut Cursor::new(&bad)),
        Err(Error::UnsupportedFormat(_))
    ));

    // 8-byte integers
    let mut bad = bytes.to_vec();
    bad[24..32].copy_from_slice(&8u64.to_le_bytes());
    assert!(matches!(
        IndexMetadata::read(&mut Cursor::new(&bad)),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn test_empty_stream_is_io_error() {
    assert!(matches!(
        IndexMetadata::read(&mut Cursor::new(&[] as &[u8])),
        Err(Error::Io(_))
    ));
}
