// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk index format.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ header (plaintext, fed to GCM as AAD)        │  header.rs
//! ├──────────────────────────────────────────────┤
//! │ suffix array (N+1 × u32)   if algorithm ≥ 4  │  ┐
//! │ representation body                          │  ├ stream.rs (ciphertext)
//! ├──────────────────────────────────────────────┤  ┘
//! │ tag (16 bytes)                               │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. Body layouts are documented next to the
//! loader of each representation in [`crate::index`].

mod header;
mod stream;

pub use header::{
    IndexMetadata, RepresentationKind, DEFAULT_SALT_LEN, FIXED_LEN, INT_WIDTH, MAX_ALPHABET,
    MAX_SALT_LEN, SUFFIX_ARRAY_FLAG,
};
pub use stream::{SealedReader, SealedWriter};
