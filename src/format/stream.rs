// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Chunked authenticated I/O over the encrypted body.
//!
//! [`SealedReader`] pulls ciphertext off the stream one bounded chunk at a
//! time, runs it through the envelope, and decodes little-endian integers out
//! of the plaintext. The chunk buffer is reused, so peak ciphertext in memory
//! is one chunk regardless of section size. [`SealedWriter`] is the mirror
//! image used by the fixture encoder.
//!
//! Output vectors grow as chunks arrive instead of being sized up front from
//! the (still unauthenticated) header, so a truncated file fails with an I/O
//! error long before a bogus `N` can cause a giant allocation.

use std::io::{Read, Write};

use crate::crypto::{CryptoEnvelope, TagVerified, TAG_LEN};
use crate::error::{Error, Result};

/// Capacity hint cap for decoded sections (entries).
const MAX_PREALLOC: usize = 1 << 16;

// ============================================================================
// READER
// ============================================================================

#[derive(Debug)]
pub struct SealedReader<R> {
    inner: R,
    envelope: CryptoEnvelope,
    chunk: Vec<u8>,
}

impl<R: Read> SealedReader<R> {
    /// Wrap a stream positioned at the first ciphertext byte. The header must
    /// already have been fed to `envelope` as associated data.
    pub fn new(inner: R, envelope: CryptoEnvelope) -> Self {
        Self {
            inner,
            envelope,
            chunk: Vec::new(),
        }
    }

    /// Payload bytes decrypted so far.
    pub fn decrypted_len(&self) -> u64 {
        self.envelope.data_len()
    }

    /// Read and decrypt exactly `len` bytes into the reusable chunk buffer.
    fn next_chunk(&mut self, len: usize) -> Result<&[u8]> {
        self.chunk.resize(len, 0);
        self.inner.read_exact(&mut self.chunk)?;
        self.envelope.decrypt_in_place(&mut self.chunk)?;
        Ok(&self.chunk)
    }

    /// Decrypt `count` little-endian `u32`s, `chunk` entries at a time.
    pub fn read_u32s(&mut self, count: usize, chunk: usize) -> Result<Vec<u32>> {
        self.read_u32s_truncated(count, count, chunk)
    }

    /// Decrypt `count` `u32`s but keep only the first `keep`.
    ///
    /// Used for padded sections: every byte still goes through the envelope,
    /// the padding just is not retained.
    pub fn read_u32s_truncated(
        &mut self,
        count: usize,
        keep: usize,
        chunk: usize,
    ) -> Result<Vec<u32>> {
        if chunk == 0 {
            return Err(Error::invalid_input("chunk size must be positive"));
        }
        let keep = keep.min(count);
        let mut out = Vec::with_capacity(keep.min(MAX_PREALLOC));
        let mut done = 0;
        while done < count {
            let n = chunk.min(count - done);
            let wanted = keep.saturating_sub(done).min(n);
            let bytes = self.next_chunk(n * 4)?;
            out.extend(
                bytes
                    .chunks_exact(4)
                    .take(wanted)
                    .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            );
            done += n;
        }
        Ok(out)
    }

    /// Decrypt `count` little-endian `u64`s in one chunk (used for small metadata).
    pub fn read_u64s(&mut self, count: usize) -> Result<Vec<u64>> {
        let bytes = self.next_chunk(count * 8)?;
        Ok(bytes
            .chunks_exact(8)
            .map(|b| {
                let mut word = [0u8; 8];
                word.copy_from_slice(b);
                u64::from_le_bytes(word)
            })
            .collect())
    }

    /// Decrypt `len` raw bytes, `chunk` bytes at a time.
    pub fn read_bytes(&mut self, len: usize, chunk: usize) -> Result<Vec<u8>> {
        if chunk == 0 {
            return Err(Error::invalid_input("chunk size must be positive"));
        }
        let mut out = Vec::with_capacity(len.min(MAX_PREALLOC * 4));
        let mut done = 0;
        while done < len {
            let n = chunk.min(len - done);
            out.extend_from_slice(self.next_chunk(n)?);
            done += n;
        }
        Ok(out)
    }

    /// Read the trailing tag and check it. Returns the stream (for the caller
    /// to drop) together with the proof of verification.
    pub fn finish(mut self) -> Result<(R, TagVerified)> {
        let mut tag = [0u8; TAG_LEN];
        self.inner.read_exact(&mut tag)?;
        let proof = self.envelope.verify(&tag)?;
        Ok((self.inner, proof))
    }
}

// ============================================================================
// WRITER
// ============================================================================

#[derive(Debug)]
pub struct SealedWriter<W> {
    inner: W,
    envelope: CryptoEnvelope,
    chunk: Vec<u8>,
}

impl<W: Write> SealedWriter<W> {
    pub fn new(inner: W, envelope: CryptoEnvelope) -> Self {
        Self {
            inner,
            envelope,
            chunk: Vec::new(),
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.chunk.clear();
        self.chunk.extend_from_slice(bytes);
        self.envelope.encrypt_in_place(&mut self.chunk)?;
        self.inner.write_all(&self.chunk)?;
        Ok(())
    }

    pub fn write_u32s(&mut self, values: &[u32]) -> Result<()> {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.write_bytes(&bytes)
    }

    pub fn write_u64s(&mut self, values: &[u64]) -> Result<()> {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.write_bytes(&bytes)
    }

    /// Append the tag and hand back the sink.
    pub fn finish(mut self) -> Result<W> {
        let tag = self.envelope.finalize()?;
        self.inner.write_all(&tag)?;
        Ok(self.inner)
    }
}
