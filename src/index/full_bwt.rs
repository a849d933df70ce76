// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! BWT with periodically sampled occurrence counters.
//!
//! Body layout:
//!
//! ```text
//! meta    : 3 × u64                   [sample_rate, no_bits, sample_size]
//! C       : (alpha + 1) × u32         cumulative counts
//! samples : ceil((N + 1) / rate) × sample_size bytes
//! ```
//!
//! Sample `k` covers matrix rows `k·rate .. (k+1)·rate`:
//!
//! ```text
//! ┌──────────────────────────┬────────────────────────────────────────┐
//! │ alpha × u32 counters     │ rate BWT symbols, no_bits each,        │
//! │ (occurrences in rows     │ LSB-first, padded to 16-bit words      │
//! │  before k·rate)          │ `$` and tail padding = all-ones code   │
//! └──────────────────────────┴────────────────────────────────────────┘
//! ```
//!
//! `occ(c, row)` reads the counter of the sample holding `row` and scans at
//! most `rate` packed symbols. Memory is `O(N·no_bits + N·alpha·32/rate)`.

use std::io::Read;

use tracing::debug;

use super::count::CountTable;
use super::Occurrence;
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::format::{IndexMetadata, SealedReader};

/// Largest accepted sample rate.
pub const MAX_SAMPLE_RATE: usize = 65_536;

/// Sample rate used by the fixture encoder unless told otherwise.
pub const DEFAULT_SAMPLE_RATE: usize = 64;

// ============================================================================
// SAMPLE LAYOUT
// ============================================================================

/// Geometry of one sample. Fully determined by `alpha` and the rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLayout {
    pub rate: usize,
    pub bits: u32,
    pub size: usize,
    alphabet_size: usize,
}

impl SampleLayout {
    pub fn new(alphabet_size: usize, rate: usize) -> Self {
        // alpha symbol codes plus one escape code for `$`
        let bits = (alphabet_size + 1).next_power_of_two().trailing_zeros();
        let packed = 2 * (rate * bits as usize).div_ceil(16);
        Self {
            rate,
            bits,
            size: 4 * alphabet_size + packed,
            alphabet_size,
        }
    }

    /// Check decrypted metadata against what an encoder would have written.
    fn from_words(words: &[u64], alphabet_size: usize) -> Result<Self> {
        let [rate, bits, size] = words else {
            return Err(Error::Integrity("sample metadata has the wrong length"));
        };
        if *rate == 0 || *rate > MAX_SAMPLE_RATE as u64 {
            return Err(Error::Integrity("sample rate out of range"));
        }
        let layout = Self::new(alphabet_size, *rate as usize);
        if u64::from(layout.bits) != *bits || layout.size as u64 != *size {
            return Err(Error::Integrity("sample metadata is inconsistent"));
        }
        Ok(layout)
    }

    pub fn words(&self) -> [u64; 3] {
        [self.rate as u64, u64::from(self.bits), self.size as u64]
    }

    /// `ceil((N + 1) / rate)`.
    pub fn sample_count(&self, text_len: usize) -> usize {
        (text_len + 1).div_ceil(self.rate)
    }

    fn counters_len(&self) -> usize {
        4 * self.alphabet_size
    }

    /// All-ones code marking `$` and padding.
    fn escape(&self) -> u32 {
        (1u32 << self.bits) - 1
    }
}

#[inline]
fn read_code(packed: &[u8], index: usize, bits: u32) -> u32 {
    let bit = index * bits as usize;
    let byte = bit / 8;
    let byte_at = |i: usize| u32::from(packed.get(i).copied().unwrap_or(0));
    let window = byte_at(byte) | byte_at(byte + 1) << 8 | byte_at(byte + 2) << 16;
    (window >> (bit % 8)) & ((1u32 << bits) - 1)
}

fn write_code(packed: &mut [u8], index: usize, bits: u32, code: u32) {
    let start = index * bits as usize;
    for b in 0..bits as usize {
        if (code >> b) & 1 == 1 {
            let bit = start + b;
            packed[bit / 8] |= 1 << (bit % 8);
        }
    }
}

/// Encode a BWT (`None` = `$`) into the sample blob.
pub fn pack_samples(bwt: &[Option<u8>], layout: &SampleLayout) -> Result<Vec<u8>> {
    let text_len = bwt.len().saturating_sub(1);
    let samples = layout.sample_count(text_len);
    let counters = layout.counters_len();
    let mut out = vec![0u8; samples * layout.size];
    let mut running = vec![0u32; layout.alphabet_size];

    for (k, sample) in out.chunks_exact_mut(layout.size).enumerate() {
        let (head, packed) = sample.split_at_mut(counters);
        for (slot, count) in head.chunks_exact_mut(4).zip(&running) {
            slot.copy_from_slice(&count.to_le_bytes());
        }
        for i in 0..layout.rate {
            let code = match bwt.get(k * layout.rate + i) {
                Some(Some(symbol)) => {
                    let count = running.get_mut(*symbol as usize).ok_or_else(|| {
                        Error::invalid_input(format!(
                            "BWT symbol {} outside alphabet of size {}",
                            symbol, layout.alphabet_size
                        ))
                    })?;
                    *count += 1;
                    u32::from(*symbol)
                }
                _ => layout.escape(),
            };
            write_code(packed, i, layout.bits, code);
        }
    }
    Ok(out)
}

// ============================================================================
// INDEX
// ============================================================================

#[derive(Debug, Clone)]
pub struct FullBwt {
    layout: SampleLayout,
    samples: usize,
    data: Vec<u8>,
}

impl FullBwt {
    pub(crate) fn load<R: Read>(
        reader: &mut SealedReader<R>,
        metadata: &IndexMetadata,
        config: &SessionConfig,
    ) -> Result<(CountTable, Self)> {
        let n = metadata.text_len();
        let alpha = metadata.alphabet_size();

        let layout = SampleLayout::from_words(&reader.read_u64s(3)?, alpha)?;
        let raw_counts = reader.read_u32s(alpha + 1, alpha + 1)?;
        let counts = CountTable::from_cumulative(&raw_counts, alpha, n)?;

        let samples = layout.sample_count(n);
        let total = samples
            .checked_mul(layout.size)
            .ok_or(Error::Integrity("sample blob size overflows"))?;
        let chunk = config.sample_chunk.saturating_mul(layout.size);
        let data = reader.read_bytes(total, chunk)?;
        debug!(
            rate = layout.rate,
            bits = layout.bits,
            samples,
            bytes = data.len(),
            "decrypted occurrence samples"
        );
        Ok((
            counts,
            Self {
                layout,
                samples,
                data,
            },
        ))
    }

    #[cfg(test)]
    pub(crate) fn from_parts(bwt: &[Option<u8>], alphabet_size: usize, rate: usize) -> Self {
        let layout = SampleLayout::new(alphabet_size, rate);
        let data = pack_samples(bwt, &layout).unwrap();
        Self {
            layout,
            samples: layout.sample_count(bwt.len().saturating_sub(1)),
            data,
        }
    }

    pub fn layout(&self) -> SampleLayout {
        self.layout
    }

    pub(crate) fn payload_bytes(&self) -> usize {
        self.data.len()
    }

    fn sample(&self, k: usize) -> &[u8] {
        let start = k * self.layout.size;
        self.data
            .get(start..start + self.layout.size)
            .unwrap_or(&[])
    }
}

impl Occurrence for FullBwt {
    fn occurrence(&self, symbol: u8, row: usize) -> usize {
        let rate = self.layout.rate;
        let k = (row / rate).min(self.samples.saturating_sub(1));
        let within = row - k * rate;
        let sample = self.sample(k);

        let at = 4 * symbol as usize;
        let counter = sample
            .get(at..at + 4)
            .map_or(0, |b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize);

        let packed = sample.get(self.layout.counters_len()..).unwrap_or(&[]);
        let target = u32::from(symbol);
        counter
            + (0..within)
                .filter(|&i| read_code(packed, i, self.layout.bits) == target)
                .count()
    }
}
