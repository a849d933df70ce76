// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Alphabet mapping between text bytes and symbol codes.
//!
//! A `.map` file lists the alphabet in code order, one byte per symbol:
//! `ACGT` maps `A → 0`, `C → 1`, `G → 2`, `T → 3`. A single trailing line
//! ending is ignored so the file can be written with a text editor.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMap {
    symbols: Vec<u8>,
    codes: [Option<u8>; 256],
}

impl SymbolMap {
    pub fn new(symbols: &[u8]) -> Result<Self> {
        if symbols.is_empty() || symbols.len() > 256 {
            return Err(Error::invalid_input(format!(
                "symbol map must hold 1..=256 symbols, got {}",
                symbols.len()
            )));
        }
        let mut codes = [None; 256];
        for (code, &byte) in symbols.iter().enumerate() {
            if codes[byte as usize].is_some() {
                return Err(Error::invalid_input(format!(
                    "symbol {:?} listed twice",
                    byte as char
                )));
            }
            codes[byte as usize] = Some(code as u8);
        }
        Ok(Self {
            symbols: symbols.to_vec(),
            codes,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read(path)?;
        let trimmed = raw
            .strip_suffix(b"\r\n")
            .or_else(|| raw.strip_suffix(b"\n"))
            .unwrap_or(&raw);
        Self::new(trimmed)
    }

    /// Number of symbols (the index alphabet size).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn code(&self, byte: u8) -> Option<u8> {
        self.codes[byte as usize]
    }

    pub fn symbol(&self, code: u8) -> Option<u8> {
        self.symbols.get(code as usize).copied()
    }

    /// Translate text into codes. Unmapped bytes are an input error.
    pub fn encode(&self, text: &[u8]) -> Result<Vec<u8>> {
        text.iter()
            .enumerate()
            .map(|(i, &b)| {
                self.code(b).ok_or_else(|| {
                    Error::invalid_input(format!(
                        "byte {:?} at offset {} is not in the alphabet",
                        b as char, i
                    ))
                })
            })
            .collect()
    }
}
