// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use subtol::{IndexMetadata, RankRange, SessionConfig, SessionFactory, SymbolMap, TAG_LEN};

mod cli;
use cli::display::{count_label, field, format_size, section_bot, section_top, timing_us};
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    cli::logging::setup_logging(cli::logging::DEFAULT_DIRECTIVES, cli.log_format);

    let outcome = match cli.command {
        Commands::Inspect { file } => inspect(&file),
        Commands::Query {
            file,
            patterns,
            password,
            map,
            limit,
            config,
            json,
        } => query(&file, &patterns, &password, &map, limit, config.as_deref(), json),
    };

    if let Err(e) = outcome {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn inspect(path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let file_len = file.metadata()?.len() as usize;
    let header = IndexMetadata::read(&mut BufReader::new(file))
        .with_context(|| format!("reading header of {}", path.display()))?;

    let representation = match header.kind() {
        Ok(kind) => kind.to_string(),
        Err(e) => format!("unsupported ({})", e),
    };
    let body = file_len.saturating_sub(header.encoded_len() + TAG_LEN);

    section_top("HEADER");
    field("file", &path.display().to_string());
    field("size", &format_size(file_len));
    field("algorithm id", &header.algorithm_id.to_string());
    field("representation", &representation);
    field(
        "suffix array",
        if header.has_suffix_array() { "yes" } else { "no" },
    );
    field("text length", &header.text_len.to_string());
    field("alphabet size", &header.alphabet_size.to_string());
    field("integer width", &header.int_width.to_string());
    field("salt length", &header.salt.len().to_string());
    field("encrypted body", &format_size(body));
    section_bot();
    Ok(())
}

#[derive(Serialize)]
struct QueryReport<'a> {
    pattern: &'a str,
    range: RankRange,
    count: usize,
    positions: Option<Vec<usize>>,
    micros: f64,
}

fn query(
    path: &Path,
    patterns: &[String],
    password: &str,
    map_path: &Path,
    limit: Option<usize>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = match config_path {
        Some(p) => SessionConfig::from_path(p)
            .with_context(|| format!("loading config {}", p.display()))?,
        None => SessionConfig::default(),
    };
    let map = SymbolMap::from_path(map_path)
        .with_context(|| format!("loading symbol map {}", map_path.display()))?;

    let factory = SessionFactory::new(config)?;
    let index = factory
        .open_path(path, password.as_bytes())
        .with_context(|| format!("opening {}", path.display()))?;

    if map.len() != index.alphabet_size() {
        bail!(
            "symbol map has {} symbols but the index alphabet has {}",
            map.len(),
            index.alphabet_size()
        );
    }

    for pattern in patterns {
        let codes = map
            .encode(pattern.as_bytes())
            .with_context(|| format!("pattern {:?}", pattern))?;

        let started = Instant::now();
        let range = index.query(&codes)?;
        let positions = if index.has_suffix_array() {
            Some(index.fetch(range, limit)?)
        } else {
            None
        };
        let micros = started.elapsed().as_secs_f64() * 1e6;

        let report = QueryReport {
            pattern,
            range,
            count: range.len(),
            positions,
            micros,
        };
        if json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_report(&report);
        }
    }
    Ok(())
}

fn print_report(report: &QueryReport<'_>) {
    println!(
        "{:<16} [{}, {})  {}  {}",
        report.pattern,
        report.range.start,
        report.range.end,
        count_label(report.count),
        timing_us(report.micros)
    );
    if let Some(positions) = &report.positions {
        if !positions.is_empty() {
            let list: Vec<String> = positions.iter().map(usize::to_string).collect();
            let more = report.count.saturating_sub(positions.len());
            if more > 0 {
                println!("    {} (+{} more)", list.join(" "), more);
            } else {
                println!("    {}", list.join(" "));
            }
        }
    }
}
