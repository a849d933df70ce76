// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Substring search over an encrypted, authenticated full-text index.
//!
//! An index file holds an FM-index (or a Psi-based suffix array) over a text
//! of `N` symbols, encrypted with AES-128-GCM under a password-derived key.
//! Opening it streams the body through the cipher in small chunks, checks the
//! tag, and only then hands out a [`ReferenceIndex`] that answers
//! `query(pattern) -> [start, end)` and `fetch(range) -> positions`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │  format/    │────▶│  session.rs  │────▶│  index/          │
//! │ (header,    │     │ (open, KDF,  │     │ (SaPsi, Bucketed,│
//! │  sealed I/O)│     │  verify)     │     │  FullBwt, fetch) │
//! └─────────────┘     └──────────────┘     └──────────────────┘
//!        │                   │                      │
//!        ▼                   ▼                      ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                       crypto/                             │
//! │  (CryptoEnvelope, derive_key, Pending<T> + TagVerified)   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Representations
//!
//! | `algorithm_id % 4` | Representation | `occ(c, row)`                         |
//! |--------------------|----------------|---------------------------------------|
//! | 0                  | SaPsi          | binary search over Psi in bucket `c`  |
//! | 1                  | BucketedBwt    | binary search over bucket `c`         |
//! | 2                  | FullBwt        | sampled counter + bounded scan        |
//! | 3                  | reserved       | `Error::UnsupportedAlgorithm`         |
//!
//! `algorithm_id >= 4` additionally carries the suffix array used by `fetch`.
//!
//! # Usage
//!
//! ```ignore
//! use subtol::{open_session, SymbolMap};
//!
//! let index = open_session(std::fs::File::open("chr21.idx")?, b"password")?;
//! let map = SymbolMap::new(b"ACGT")?;
//! let range = index.query(&map.encode(b"GATTACA")?)?;
//! let positions = index.fetch(range, Some(10))?;
//! ```

// Module declarations
pub mod config;
pub mod contracts;
pub mod crypto;
pub mod error;
pub mod format;
pub mod index;
pub mod session;
pub mod symbol_map;
pub mod testing;

// Re-exports for public API
pub use config::{SessionConfig, MAX_TEXT_LEN};
pub use crypto::{
    derive_key, CryptoEnvelope, Direction, Pending, TagVerified, KEY_LEN, NONCE_LEN,
    PBKDF2_ITERATIONS, TAG_LEN,
};
pub use error::{Error, Result};
pub use format::{IndexMetadata, RepresentationKind};
pub use index::{CountTable, RankRange, ReferenceIndex};
pub use session::{open_session, open_session_with, SessionFactory};
pub use symbol_map::SymbolMap;
