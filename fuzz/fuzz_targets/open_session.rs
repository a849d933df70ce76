// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Session opening on garbage.
//!
//! Everything after the header is attacker-controlled until the tag checks
//! out. Body lengths come from the header, payload values from unverified
//! plaintext; neither may cause a panic or an unbounded allocation.

#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use subtol::{open_session_with, SessionConfig};

fuzz_target!(|data: &[u8]| {
    // Keep declared texts small so the fuzzer spends its time on parsing.
    let config = SessionConfig {
        max_text_len: 1 << 16,
        ..SessionConfig::default()
    };
    // Forging a valid tag is out of reach, so every input must be rejected.
    let result = open_session_with(Cursor::new(data), b"fuzz", &config);
    assert!(result.is_err());
});
