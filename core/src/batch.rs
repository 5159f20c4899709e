//! Runs many queries against one index at once.

use crate::document::{Document, DocumentStatus};
use crate::error::Result;
use crate::index::SearchServer;
use rayon::prelude::*;

/// Top documents with status `Active` for every query, in query order.
pub fn process_queries<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    queries
        .par_iter()
        .map(|query| server.find_top_documents_by_status(query.as_ref(), DocumentStatus::Active))
        .collect()
}

/// Like [`process_queries`] with the per-query results concatenated.
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(server, queries)?.into_iter().flatten().collect())
}
