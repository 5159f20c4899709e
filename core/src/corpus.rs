//! Document records as stored in JSON and JSONL corpus files.

use crate::document::{DocId, DocumentStatus, Rating};
use crate::index::SearchServer;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Read};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocId,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub added: usize,
    pub skipped: usize,
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus: {0}")]
    Io(#[from] io::Error),
    #[error("malformed document record: {0}")]
    Json(#[from] serde_json::Error),
}

/// One record per line; blank lines are ignored.
pub fn read_json_lines<R: BufRead>(reader: R) -> Result<Vec<DocumentRecord>, CorpusError> {
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

/// A JSON array of records or a single record object. Any other JSON value
/// holds no records.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<DocumentRecord>, CorpusError> {
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    let records = match json {
        serde_json::Value::Array(items) => {
            items.into_iter().map(serde_json::from_value).collect::<Result<_, _>>()?
        }
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    Ok(records)
}

impl SearchServer {
    /// Adds every record the index accepts. Rejected records are logged and
    /// counted as skipped.
    pub fn add_records<I>(&mut self, records: I) -> LoadStats
    where
        I: IntoIterator<Item = DocumentRecord>,
    {
        let mut stats = LoadStats::default();
        for record in records {
            match self.add_document(record.id, &record.text, record.status, &record.ratings) {
                Ok(()) => stats.added += 1,
                Err(e) => {
                    tracing::warn!(id = record.id, error = %e, "skipping document");
                    stats.skipped += 1;
                }
            }
        }
        stats
    }
}
