// Copyright 2025 HyperZoekt Project
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use clap::Parser;
use doxs_rs::{convert_paths, dry_run, ConvertConfig, ConvertSummary, IndexFile, Projector};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "doxs-import",
    about = "Convert a DOXS index file into a SQLite database"
)]
struct Args {
    /// Index file to read (defaults to search.idx)
    index: Option<PathBuf>,
    /// SQLite database to (re)create the tables in (defaults to output_index.db)
    output: Option<PathBuf>,
    /// Optional TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Maximum length of any string in the index, terminator included
    #[arg(long)]
    max_string_len: Option<usize>,
    /// Log progress every N non-empty buckets (0 disables)
    #[arg(long)]
    progress_every: Option<usize>,
    /// Decode and project in memory only; the database is not opened
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    env_logger::Builder::from_env(env).init();
    let args = Args::parse();

    let mut cfg = ConvertConfig::load(args.config.as_deref())?;
    if let Some(p) = args.index {
        cfg.index_path = p;
    }
    if let Some(p) = args.output {
        cfg.output_db = p;
    }
    if let Some(n) = args.max_string_len {
        cfg.max_string_len = n;
    }
    if let Some(n) = args.progress_every {
        cfg.progress_every = n;
    }
    cfg.validate()?;

    let projector = Projector::from_config(&cfg);
    let summary = if args.dry_run {
        let index = IndexFile::open(&cfg.index_path)
            .with_context(|| format!("open {}", cfg.index_path.display()))?;
        let (summary, _) = dry_run(&index, projector)
            .with_context(|| format!("dry run of {}", cfg.index_path.display()))?;
        info!("dry run: nothing written");
        summary
    } else {
        convert_paths(&cfg.index_path, &cfg.output_db, projector).with_context(|| {
            format!(
                "convert {} -> {}",
                cfg.index_path.display(),
                cfg.output_db.display()
            )
        })?
    };
    print_summary(&summary);
    Ok(())
}

fn print_summary(s: &ConvertSummary) {
    println!("File Header: [{}]", s.header_str());
    println!(
        "buckets={} words={} urls={} stats={}",
        s.buckets_visited, s.words, s.urls, s.stats
    );
}
