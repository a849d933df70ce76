// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Plaintext header parsing under adversarial input.
//!
//! `inspect` reads headers without a password, so anyone can hand it a
//! crafted file. Lengths that overflow, salts longer than the file and
//! unknown algorithm ids must all come back as errors.

#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use subtol::IndexMetadata;

fuzz_target!(|data: &[u8]| {
    let mut cursor = Cursor::new(data);
    if let Ok(header) = IndexMetadata::read(&mut cursor) {
        // A parsed header consumed exactly its encoded length.
        assert_eq!(cursor.position() as usize, header.encoded_len());
        assert_eq!(header.int_width, 4);
        assert!(header.alphabet_size > 0);

        let mut encoded = Vec::new();
        header.write(&mut encoded).unwrap();
        assert_eq!(&encoded[..], &data[..header.encoded_len()]);
    }
});
