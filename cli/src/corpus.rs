use anyhow::{Context, Result};
use search_core::corpus::{read_json, read_json_lines};
use search_core::{DocumentRecord, LoadStats, SearchServer};
use walkdir::WalkDir;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// `.json` / `.jsonl` files under `input`, or `input` itself when it is a file.
pub fn collect_files(input: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

pub fn read_documents(file: &Path) -> Result<Vec<DocumentRecord>> {
    let reader = BufReader::new(File::open(file)?);
    let records = if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        read_json_lines(reader)
    } else {
        read_json(reader)
    };
    records.with_context(|| format!("reading {}", file.display()))
}

/// Adds every document found under `input`. Documents the index rejects are
/// logged and skipped; unreadable files abort the load.
pub fn load(server: &mut SearchServer, input: &Path) -> Result<LoadStats> {
    let mut stats = LoadStats::default();
    for file in collect_files(input) {
        let file_stats = server.add_records(read_documents(&file)?);
        tracing::debug!(file = %file.display(), added = file_stats.added, "read corpus file");
        stats.added += file_stats.added;
        stats.skipped += file_stats.skipped;
    }
    tracing::info!(added = stats.added, skipped = stats.skipped, "loaded documents");
    Ok(stats)
}
