// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Opening an encrypted index.
//!
//! ```text
//! header ──▶ PBKDF2 ──▶ envelope ──▶ AAD(header)
//!                                        │
//!            ┌───────────────────────────┘
//!            ▼
//!   [suffix array] ──▶ representation body ──▶ Pending<ReferenceIndex>
//!                                                     │
//!                             tag ──▶ verify ──▶ TagVerified ──▶ release
//! ```
//!
//! Everything after the header is decrypted before the tag can be checked.
//! The decrypted index sits in a [`Pending`] until then; if anything fails
//! along the way, including the tag, it is dropped and the caller gets an
//! error. No partially built or unauthenticated index is ever returned.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::crypto::{derive_key, CryptoEnvelope, Pending};
use crate::error::{Error, Result};
use crate::format::{IndexMetadata, RepresentationKind, SealedReader};
use crate::index::{
    BucketedBwt, FullBwt, ReferenceIndex, Representation, SaPsi, SuffixArraySample,
};

/// Builds verified [`ReferenceIndex`] handles from encrypted streams.
#[derive(Debug, Clone, Default)]
pub struct SessionFactory {
    config: SessionConfig,
}

impl SessionFactory {
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Authenticate and load an index. Consumes the stream.
    pub fn open<R: Read>(&self, mut stream: R, password: &[u8]) -> Result<ReferenceIndex> {
        let metadata = IndexMetadata::read(&mut stream)?;
        metadata.validate(self.config.max_text_len)?;
        let kind = metadata.kind()?;
        debug!(
            algorithm_id = metadata.algorithm_id,
            representation = %kind,
            text_len = metadata.text_len,
            alphabet_size = metadata.alphabet_size,
            has_suffix_array = metadata.has_suffix_array(),
            "parsed index header"
        );

        let key = derive_key(password, &metadata.salt)?;
        let mut envelope = CryptoEnvelope::open(&key, &metadata.nonce)?;
        metadata.authenticate(&mut envelope)?;

        let mut reader = SealedReader::new(stream, envelope);
        let pending = match self
            .load_body(&mut reader, metadata, kind)
            .map_err(short_body_is_integrity)
        {
            Ok(pending) => pending,
            Err(err) => {
                if err.is_integrity() {
                    warn!(error = %err, "index body failed structural checks");
                }
                return Err(err);
            }
        };
        let decrypted = reader.decrypted_len();

        let (stream, proof) = match reader.finish().map_err(short_body_is_integrity) {
            Ok(done) => done,
            Err(err) => {
                if err.is_integrity() {
                    warn!("authentication tag mismatch, discarding decrypted index");
                }
                return Err(err);
            }
        };
        drop(stream);

        let index = pending.release(proof);
        info!(
            text_len = index.text_len(),
            alphabet_size = index.alphabet_size(),
            representation = %index.kind(),
            has_suffix_array = index.has_suffix_array(),
            decrypted_bytes = decrypted,
            "index verified"
        );
        Ok(index)
    }

    /// Open an index file from disk.
    pub fn open_path(&self, path: impl AsRef<Path>, password: &[u8]) -> Result<ReferenceIndex> {
        let file = File::open(path.as_ref())?;
        self.open(BufReader::new(file), password)
    }

    fn load_body<R: Read>(
        &self,
        reader: &mut SealedReader<R>,
        metadata: IndexMetadata,
        kind: RepresentationKind,
    ) -> Result<Pending<ReferenceIndex>> {
        let suffix_array = if metadata.has_suffix_array() {
            Some(SuffixArraySample::load(reader, &metadata, &self.config)?)
        } else {
            None
        };

        let (counts, representation) = match kind {
            RepresentationKind::SaPsi => {
                let (counts, psi) = SaPsi::load(reader, &metadata, &self.config)?;
                (counts, Representation::SaPsi(psi))
            }
            RepresentationKind::BucketedBwt => {
                let (counts, buckets) = BucketedBwt::load(reader, &metadata, &self.config)?;
                (counts, Representation::BucketedBwt(buckets))
            }
            RepresentationKind::FullBwt => {
                let (counts, bwt) = FullBwt::load(reader, &metadata, &self.config)?;
                (counts, Representation::FullBwt(bwt))
            }
        };

        Ok(Pending::new(ReferenceIndex::new(
            metadata,
            counts,
            representation,
            suffix_array,
        )))
    }
}

/// Body lengths follow from unauthenticated plaintext (the FullBwt sample
/// rate), so running out of bytes after the header means a damaged or
/// tampered file, not a stream fault.
fn short_body_is_integrity(err: Error) -> Error {
    match err {
        Error::Io(ref io) if io.kind() == ErrorKind::UnexpectedEof => {
            Error::Integrity("body ends before its declared length")
        }
        other => other,
    }
}

/// Open with the default configuration.
pub fn open_session<R: Read>(stream: R, password: &[u8]) -> Result<ReferenceIndex> {
    SessionFactory::default().open(stream, password)
}

/// Open with an explicit configuration.
pub fn open_session_with<R: Read>(
    stream: R,
    password: &[u8],
    config: &SessionConfig,
) -> Result<ReferenceIndex> {
    SessionFactory::new(config.clone())?.open(stream, password)
}
