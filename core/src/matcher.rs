use crate::document::{DocId, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::execution::Execution;
use crate::index::SearchServer;
use crate::query::QueryMode;
use std::collections::BTreeSet;

impl SearchServer {
    /// Plus words of the query found in the document, sorted and unique,
    /// together with its status. Any minus word found in the document yields
    /// an empty word list instead.
    pub fn match_document<'q>(
        &self,
        raw_query: &'q str,
        id: DocId,
    ) -> Result<(Vec<&'q str>, DocumentStatus)> {
        self.match_document_with(Execution::Sequential, raw_query, id)
    }

    pub fn match_document_with<'q>(
        &self,
        execution: Execution,
        raw_query: &'q str,
        id: DocId,
    ) -> Result<(Vec<&'q str>, DocumentStatus)> {
        let status = self.documents.get(&id).ok_or(SearchError::UnknownId(id))?.status;
        // The parallel path skips sorting the query and dedups its own output.
        let mode = match execution {
            Execution::Sequential => QueryMode::Normalized,
            Execution::Parallel => QueryMode::Raw,
        };
        let query = self.parse_query(raw_query, mode)?;

        if execution.any(&query.minus_words, |word| self.index.contains(word, id)) {
            return Ok((Vec::new(), status));
        }
        let matched = execution.filter(&query.plus_words, |word| self.index.contains(word, id));
        let unique: BTreeSet<&'q str> = matched.into_iter().collect();
        Ok((unique.into_iter().collect(), status))
    }
}
