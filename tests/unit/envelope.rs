//! The on-disk body is plain AES-128-GCM, and the envelope enforces its
//! call protocol.

use std::io::Cursor;

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Nonce};
use subtol::{derive_key, CryptoEnvelope, Error, IndexMetadata, RepresentationKind};

use crate::common::{file_for, ACGT_FILES, FIXTURE_PASSWORD};

#[test]
fn test_fixture_file_decrypts_with_standard_gcm() {
    let bytes = file_for(&ACGT_FILES, RepresentationKind::SaPsi);
    let header = IndexMetadata::read(&mut Cursor::new(bytes)).unwrap();
    let header_len = header.encoded_len();

    let key = derive_key(FIXTURE_PASSWORD, &header.salt).unwrap();
    let cipher = Aes128Gcm::new_from_slice(&key).unwrap();
    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&header.nonce),
            Payload {
                msg: &bytes[header_len..],
                aad: &bytes[..header_len],
            },
        )
        .unwrap();

    // suffix array (10 rows) + C (5) + psi (10)
    assert_eq!(plaintext.len(), (10 + 5 + 10) * 4);
    // first suffix array row is the sentinel, at N = 9
    assert_eq!(&plaintext[..4], &9u32.to_le_bytes());
}

#[test]
fn test_header_is_authenticated_data() {
    let bytes = file_for(&ACGT_FILES, RepresentationKind::BucketedBwt);
    let header = IndexMetadata::read(&mut Cursor::new(bytes)).unwrap();
    let header_len = header.encoded_len();
    let key = derive_key(FIXTURE_PASSWORD, &header.salt).unwrap();
    let cipher = Aes128Gcm::new_from_slice(&key).unwrap();

    let mut aad = bytes[..header_len].to_vec();
    aad[header_len - 1] ^= 1;
    let result = cipher.decrypt(
        Nonce::from_slice(&header.nonce),
        Payload {
            msg: &bytes[header_len..],
            aad: &aad,
        },
    );
    assert!(result.is_err());
}

#[test]
fn test_envelope_is_single_use() {
    let mut env = CryptoEnvelope::seal(&[1u8; 16], &[2u8; 12]).unwrap();
    env.authenticate(b"aad").unwrap();
    let mut data = *b"payload";
    env.encrypt_in_place(&mut data).unwrap();
    let _tag = env.finalize().unwrap();

    assert!(matches!(
        env.encrypt_in_place(&mut data),
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(env.finalize(), Err(Error::InvalidState(_))));
}

#[test]
fn test_wrong_tag_is_integrity_error() {
    let mut seal = CryptoEnvelope::seal(&[3u8; 16], &[4u8; 12]).unwrap();
    let mut data = [0u8; 40];
    seal.encrypt_in_place(&mut data).unwrap();
    let mut tag = seal.finalize().unwrap();
    tag[15] ^= 0x80;

    let mut open = CryptoEnvelope::open(&[3u8; 16], &[4u8; 12]).unwrap();
    open.decrypt_in_place(&mut data).unwrap();
    assert!(open.verify(&tag).unwrap_err().is_integrity());
}

#[test]
fn test_short_key_is_key_error() {
    assert!(matches!(
        CryptoEnvelope::open(&[0u8; 15], &[0u8; 12]),
        Err(Error::Key {
            expected: 16,
            actual: 15
        })
    ));
}
