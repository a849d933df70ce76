// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Queries against freshly sealed indexes agree with a linear scan.
//!
//! The fuzzer picks the text, alphabet, representation, sample rate and
//! patterns. Any disagreement between the index and brute force is a bug.

#![no_main]

use std::io::Cursor;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use subtol::testing::{brute_force_positions, seal_index, SealParams, FIXTURE_PASSWORD};
use subtol::{open_session, RepresentationKind};

#[derive(Debug, Arbitrary)]
struct Input {
    kind: u8,
    alphabet_size: u8,
    sample_rate: u8,
    text: Vec<u8>,
    patterns: Vec<Vec<u8>>,
}

fuzz_target!(|input: Input| {
    let alpha = usize::from(input.alphabet_size % 8) + 1;
    let text: Vec<u8> = input.text.iter().take(512).map(|b| b % alpha as u8).collect();
    if text.is_empty() {
        return;
    }
    let kind = RepresentationKind::ALL[usize::from(input.kind) % 3];
    let params = SealParams::new(kind).sample_rate(usize::from(input.sample_rate).max(1));

    let bytes = seal_index(&text, alpha, &params).unwrap();
    let index = open_session(Cursor::new(&bytes), FIXTURE_PASSWORD).unwrap();

    for raw in input.patterns.iter().take(16) {
        let result = index.query(raw);
        if raw.iter().any(|&c| usize::from(c) >= alpha) {
            assert!(result.unwrap_err().is_invalid_input());
            continue;
        }
        let range = result.unwrap();
        let mut positions = index.fetch(range, None).unwrap();
        positions.sort_unstable();
        if raw.is_empty() {
            assert_eq!(positions.len(), text.len());
        } else {
            assert_eq!(positions, brute_force_positions(&text, raw));
        }
    }
});
