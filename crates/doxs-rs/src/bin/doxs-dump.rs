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
use doxs_rs::format::{
    read_bucket_table, read_stats_block, read_url_record, read_word_list, IndexFile,
    DEFAULT_MAX_STRING_LEN,
};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "doxs-dump",
    about = "Print the decoded contents of a DOXS index file"
)]
struct Args {
    /// Index file to read (defaults to search.idx)
    #[arg(default_value = "search.idx")]
    index: PathBuf,
    /// Stop after this many non-empty buckets
    #[arg(long)]
    limit_buckets: Option<usize>,
    /// Emit one JSON object per word (NDJSON)
    #[arg(long)]
    json: bool,
    /// Maximum length of any string in the index, terminator included
    #[arg(long, default_value_t = DEFAULT_MAX_STRING_LEN)]
    max_string_len: usize,
}

fn main() -> Result<()> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "warn");
    env_logger::Builder::from_env(env).init();
    let args = Args::parse();
    let max = args.max_string_len.max(1);

    let file = IndexFile::open(&args.index)
        .with_context(|| format!("open {}", args.index.display()))?;
    let mut r = file.reader();
    let header = r.read_header().context("read header")?;
    let table = read_bucket_table(&mut r).context("read bucket table")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if !args.json {
        writeln!(out, "File Header: [{}]", String::from_utf8_lossy(&header))?;
    }

    let limit = args.limit_buckets.unwrap_or(usize::MAX);
    for (bucket, at) in table.non_empty().take(limit) {
        let words = read_word_list(&mut r, at, max)
            .with_context(|| format!("word list of bucket {} @ {}", bucket, at))?;
        if !args.json {
            writeln!(out, "bucket {} @ {}", bucket, at)?;
        }
        for word in &words {
            let stats = read_stats_block(&mut r, word.stats_offset)
                .with_context(|| format!("stats for {:?} @ {}", word.text, word.stats_offset))?;
            let mut docs = Vec::with_capacity(stats.len());
            for stat in &stats {
                let rec = read_url_record(&mut r, stat.doc_pointer, max)
                    .with_context(|| format!("url record @ {}", stat.doc_pointer))?;
                docs.push((stat, rec));
            }
            if args.json {
                let docs: Vec<_> = docs
                    .iter()
                    .map(|(stat, rec)| {
                        serde_json::json!({
                            "doc_pointer": stat.doc_pointer,
                            "frequency": stat.frequency,
                            "flag": stat.flag(),
                            "name": rec.name,
                            "url": rec.url,
                        })
                    })
                    .collect();
                let line = serde_json::json!({
                    "bucket": bucket,
                    "word": word.text,
                    "stats_offset": word.stats_offset,
                    "docs": docs,
                });
                writeln!(out, "{}", line)?;
            } else {
                writeln!(out, "\t{}\t(stats @ {})", word.text, word.stats_offset)?;
                for (stat, rec) in &docs {
                    writeln!(
                        out,
                        "\t\t{} freq={} flag={}\t{}\t{}",
                        stat.doc_pointer,
                        stat.frequency,
                        u8::from(stat.flag()),
                        rec.name,
                        rec.url
                    )?;
                }
            }
        }
        if !args.json {
            writeln!(out, "\tnumber of entries: {}", words.len())?;
        }
    }
    Ok(())
}
