// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the subtol command-line interface.
//!
//! Two subcommands: `inspect` reads the plaintext header of an index file
//! (no password needed), and `query` opens the index and answers patterns.

pub mod display;
pub mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "subtol",
    about = "Substring search over encrypted full-text indexes",
    version
)]
pub struct Cli {
    /// Log output format (stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the plaintext header of an index file
    Inspect {
        /// Path to the encrypted index
        file: PathBuf,
    },

    /// Open an index and look up patterns
    Query {
        /// Path to the encrypted index
        file: PathBuf,

        /// Patterns, as text in the alphabet of the map file
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Index password (falls back to SUBTOL_PASSWORD)
        #[arg(short, long, env = "SUBTOL_PASSWORD", hide_env_values = true)]
        password: String,

        /// Alphabet map: one byte per symbol, in code order
        #[arg(short, long)]
        map: PathBuf,

        /// Maximum positions to print per pattern
        #[arg(short, long)]
        limit: Option<usize>,

        /// Session configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print one JSON object per pattern instead of a table
        #[arg(long)]
        json: bool,
    },
}
