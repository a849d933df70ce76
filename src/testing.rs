// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It holds a small matching encoder (naive suffix array, BWT, Psi, buckets,
//! packed samples, sealed writer) and a brute-force oracle. Building indexes
//! is not a library feature; this exists so tests and benches can produce
//! files the session loader accepts.

#![doc(hidden)]

use crate::crypto::{derive_key, CryptoEnvelope, NONCE_LEN};
use crate::error::{Error, Result};
use crate::format::{IndexMetadata, RepresentationKind, SealedWriter};
use crate::index::{pack_samples, SampleLayout, DEFAULT_SAMPLE_RATE};

/// Nucleotide alphabet, in code order.
pub const DNA: &str = "ACGT";

/// Two copies of the motif separated by a space.
pub const ACGT_TEXT: &str = "ACGT ACGT";

pub const FIXTURE_PASSWORD: &[u8] = b"correct horse battery staple";
pub const FIXTURE_SALT: [u8; 16] = *b"subtol-test-salt";
pub const FIXTURE_NONCE: [u8; NONCE_LEN] = [
    0xca, 0xfe, 0xba, 0xbe, 0xfa, 0xce, 0xdb, 0xad, 0xde, 0xca, 0xf8, 0x88,
];

// ============================================================================
// TEXT MAPPING
// ============================================================================

/// Map characters to their index in `alphabet`. Anything outside the
/// alphabet (separators, `N`) folds onto code 0.
pub fn map_text(text: &str, alphabet: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| alphabet.chars().position(|a| a == ch).map_or(0, |i| i as u8))
        .collect()
}

/// All positions where `pattern` starts in `text`, ascending.
pub fn brute_force_positions(text: &[u8], pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() {
        return (0..text.len()).collect();
    }
    if pattern.len() > text.len() {
        return Vec::new();
    }
    text.windows(pattern.len())
        .enumerate()
        .filter(|(_, w)| *w == pattern)
        .map(|(i, _)| i)
        .collect()
}

// ============================================================================
// NAIVE TABLES
// ============================================================================

/// Every structure an encoder derives from a text.
#[derive(Debug, Clone)]
pub struct Tables {
    /// `N + 1` rows, `suffix_array[0] = N`.
    pub suffix_array: Vec<u32>,
    /// `alpha + 1` cumulative counts.
    pub cumulative: Vec<u32>,
    /// `alpha` per-symbol counts.
    pub frequencies: Vec<u32>,
    /// `N + 1` Psi entries.
    pub psi: Vec<u32>,
    /// `N + 1` BWT symbols, `None` for `$`.
    pub bwt: Vec<Option<u8>>,
    /// Ascending BWT rows per symbol.
    pub buckets: Vec<Vec<u32>>,
}

/// Build all tables by sorting suffixes directly. Quadratic worst case; fine
/// for test inputs.
pub fn build_tables(text: &[u8], alphabet_size: usize) -> Tables {
    let n = text.len();

    // A shorter slice that is a prefix of a longer one sorts first, which is
    // exactly the sentinel rule.
    let mut order: Vec<usize> = (0..=n).collect();
    order.sort_by(|&a, &b| text[a..].cmp(&text[b..]));

    let mut inverse = vec![0usize; n + 1];
    for (row, &pos) in order.iter().enumerate() {
        inverse[pos] = row;
    }

    let psi = order
        .iter()
        .map(|&pos| {
            let next = if pos == n { inverse[0] } else { inverse[pos + 1] };
            next as u32
        })
        .collect();

    let bwt: Vec<Option<u8>> = order
        .iter()
        .map(|&pos| pos.checked_sub(1).map(|p| text[p]))
        .collect();

    let mut frequencies = vec![0u32; alphabet_size];
    for &c in text {
        frequencies[c as usize] += 1;
    }
    let mut cumulative = Vec::with_capacity(alphabet_size + 1);
    let mut total = 0u32;
    cumulative.push(0);
    for &f in &frequencies {
        total += f;
        cumulative.push(total);
    }

    let mut buckets = vec![Vec::new(); alphabet_size];
    for (row, symbol) in bwt.iter().enumerate() {
        if let Some(c) = symbol {
            buckets[*c as usize].push(row as u32);
        }
    }

    Tables {
        suffix_array: order.iter().map(|&p| p as u32).collect(),
        cumulative,
        frequencies,
        psi,
        bwt,
        buckets,
    }
}

// ============================================================================
// SEALING
// ============================================================================

/// How to encode a fixture file.
#[derive(Debug, Clone)]
pub struct SealParams {
    pub kind: RepresentationKind,
    pub with_suffix_array: bool,
    pub password: Vec<u8>,
    pub salt: Vec<u8>,
    pub nonce: [u8; NONCE_LEN],
    pub sample_rate: usize,
}

impl SealParams {
    /// Fixture password, salt and nonce, suffix array included.
    pub fn new(kind: RepresentationKind) -> Self {
        Self {
            kind,
            with_suffix_array: true,
            password: FIXTURE_PASSWORD.to_vec(),
            salt: FIXTURE_SALT.to_vec(),
            nonce: FIXTURE_NONCE,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    pub fn without_suffix_array(mut self) -> Self {
        self.with_suffix_array = false;
        self
    }

    pub fn sample_rate(mut self, rate: usize) -> Self {
        self.sample_rate = rate;
        self
    }
}

/// Encode and encrypt an index over `text` (codes below `alphabet_size`).
pub fn seal_index(text: &[u8], alphabet_size: usize, params: &SealParams) -> Result<Vec<u8>> {
    if let Some(&code) = text.iter().find(|&&c| c as usize >= alphabet_size) {
        return Err(Error::invalid_input(format!(
            "text code {} outside alphabet of size {}",
            code, alphabet_size
        )));
    }
    let tables = build_tables(text, alphabet_size);
    let metadata = IndexMetadata::new(
        params.kind,
        params.with_suffix_array,
        text.len() as u64,
        alphabet_size as u64,
        params.nonce,
        params.salt.clone(),
    );

    let key = derive_key(&params.password, &metadata.salt)?;
    let mut envelope = CryptoEnvelope::seal(&key, &metadata.nonce)?;
    metadata.authenticate(&mut envelope)?;

    let mut header = Vec::with_capacity(metadata.encoded_len());
    metadata.write(&mut header)?;
    let mut writer = SealedWriter::new(header, envelope);

    if params.with_suffix_array {
        writer.write_u32s(&tables.suffix_array)?;
    }
    match params.kind {
        RepresentationKind::SaPsi => {
            writer.write_u32s(&tables.cumulative)?;
            writer.write_u32s(&tables.psi)?;
        }
        RepresentationKind::BucketedBwt => {
            writer.write_u32s(&tables.frequencies)?;
            let stride = tables.buckets.iter().map(Vec::len).max().unwrap_or(0);
            for bucket in &tables.buckets {
                let mut padded = bucket.clone();
                padded.resize(stride, 0);
                writer.write_u32s(&padded)?;
            }
        }
        RepresentationKind::FullBwt => {
            let layout = SampleLayout::new(alphabet_size, params.sample_rate);
            writer.write_u64s(&layout.words())?;
            writer.write_u32s(&tables.cumulative)?;
            writer.write_bytes(&pack_samples(&tables.bwt, &layout)?)?;
        }
    }
    writer.finish()
}

/// `"ACGT ACGT"` over the DNA alphabet, sealed with the fixture credentials.
pub fn acgt_fixture(kind: RepresentationKind) -> Result<Vec<u8>> {
    seal_index(&map_text(ACGT_TEXT, DNA), DNA.len(), &SealParams::new(kind))
}
