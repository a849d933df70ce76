// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error type shared by session construction and queries.
//!
//! Construction errors abort the whole `open_session` call: nothing half-built
//! ever escapes. Query errors are per call and leave the session usable.

use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The header declares something this reader cannot parse.
    #[error("unsupported index format: {0}")]
    UnsupportedFormat(String),

    /// `algorithm_id mod 4` does not name a representation.
    #[error("unsupported algorithm id {0}")]
    UnsupportedAlgorithm(u64),

    /// The authentication tag did not match, or the decrypted payload is
    /// structurally impossible (wrong password or tampered file).
    #[error("integrity check failed: {0}")]
    Integrity(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `fetch` was called on a session opened without a suffix array.
    #[error("no suffix array was loaded for this session")]
    HasNoSuffixArray,

    /// The crypto envelope was driven out of order.
    #[error("crypto envelope used out of order: {0}")]
    InvalidState(&'static str),

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    Key { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// True for caller mistakes that do not invalidate the session.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::HasNoSuffixArray)
    }

    /// True when the file failed authentication.
    pub fn is_integrity(&self) -> bool {
        matches!(self, Error::Integrity(_))
    }

    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Error::InvalidInput(reason.into())
    }

    pub(crate) fn unsupported_format(reason: impl Into<String>) -> Self {
        Error::UnsupportedFormat(reason.into())
    }
}
