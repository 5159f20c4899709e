use crate::document::{average_rating, DocId, DocumentData, DocumentStatus, Rating};
use crate::error::{Result, SearchError};
use crate::execution::Execution;
use crate::postings::{PostingIndex, WordFrequencies};
use crate::query::{Query, QueryMode};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords, Tokenizer};
use std::collections::btree_map::Keys;
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Copied;

/// The search index: postings, their per-document transpose and the catalog
/// of live documents.
///
/// `&self` methods may run from many threads at once. Adding and removing
/// documents need `&mut self`; a process that mixes them with concurrent
/// searches has to put the whole index behind a reader-writer lock.
pub struct SearchServer {
    stop_words: StopWords,
    tokenizer: Tokenizer,
    pub(crate) index: PostingIndex,
    /// Keyed by id, so iteration yields live ids in ascending order.
    pub(crate) documents: BTreeMap<DocId, DocumentData>,
}

impl SearchServer {
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            stop_words: StopWords::new(stop_words)?,
            tokenizer: split_into_words,
            index: PostingIndex::default(),
            documents: BTreeMap::new(),
        })
    }

    /// Stop words given as one space separated string.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Self::new(split_into_words(text))
    }

    /// Replaces the tokenizer used for documents and queries.
    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn stop_words(&self) -> &StopWords { &self.stop_words }

    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[Rating],
    ) -> Result<()> {
        if id < 0 {
            return Err(SearchError::NegativeId(id));
        }
        if self.documents.contains_key(&id) {
            return Err(SearchError::DuplicateId(id));
        }
        // Validated in full before anything is written.
        let words = self.split_into_words_no_stop(text)?;
        self.index.insert(id, &words);
        let rating = average_rating(ratings);
        self.documents.insert(id, DocumentData { rating, status });
        tracing::debug!(id, words = words.len(), rating, %status, "document added");
        Ok(())
    }

    /// Removing an id that is not indexed does nothing and returns false.
    pub fn remove_document(&mut self, id: DocId) -> bool {
        self.remove_document_with(Execution::Sequential, id)
    }

    pub fn remove_document_with(&mut self, execution: Execution, id: DocId) -> bool {
        if self.documents.remove(&id).is_none() {
            return false;
        }
        self.index.remove(execution, id);
        tracing::debug!(id, ?execution, "document removed");
        true
    }

    pub fn document_count(&self) -> usize { self.documents.len() }

    pub fn contains(&self, id: DocId) -> bool { self.documents.contains_key(&id) }

    /// Live ids in ascending order.
    pub fn document_ids(&self) -> Copied<Keys<'_, DocId, DocumentData>> {
        self.documents.keys().copied()
    }

    /// Rating and status of a live document.
    pub fn document(&self, id: DocId) -> Result<DocumentData> {
        self.documents.get(&id).copied().ok_or(SearchError::UnknownId(id))
    }

    /// Word to term frequency for one document. Empty for a document that had
    /// no indexable words.
    pub fn word_frequencies(&self, id: DocId) -> Result<&WordFrequencies> {
        self.index.word_frequencies(id).ok_or(SearchError::UnknownId(id))
    }

    /// Number of distinct indexed words.
    pub fn vocabulary_size(&self) -> usize { self.index.word_count() }

    fn split_into_words_no_stop<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        let mut words = Vec::new();
        for word in (self.tokenizer)(text) {
            if word.is_empty() || !is_valid_word(word) {
                return Err(SearchError::InvalidWord(word.to_string()));
            }
            if !self.stop_words.contains(word) {
                words.push(word);
            }
        }
        Ok(words)
    }

    pub(crate) fn parse_query<'q>(&self, text: &'q str, mode: QueryMode) -> Result<Query<'q>> {
        Query::parse(text, &self.stop_words, self.tokenizer, mode)
    }

    /// ln(live documents / documents containing the word); the word must be
    /// indexed.
    pub(crate) fn inverse_document_freq(&self, postings_len: usize) -> f64 {
        (self.document_count() as f64 / postings_len as f64).ln()
    }
}

impl fmt::Debug for SearchServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchServer")
            .field("stop_words", &self.stop_words)
            .field("documents", &self.documents.len())
            .field("words", &self.index.word_count())
            .finish_non_exhaustive()
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = Copied<Keys<'a, DocId, DocumentData>>;

    fn into_iter(self) -> Self::IntoIter { self.document_ids() }
}
