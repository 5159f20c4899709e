use crate::document::DocId;
use crate::execution::Execution;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub(crate) type WordFrequencies = BTreeMap<Arc<str>, f64>;
type DocumentFrequencies = BTreeMap<DocId, f64>;

/// Inverted index (word -> document -> tf) and its transpose
/// (document -> word -> tf). Both views share word allocations and are only
/// mutated together.
#[derive(Debug, Default)]
pub(crate) struct PostingIndex {
    word_to_document_freqs: BTreeMap<Arc<str>, DocumentFrequencies>,
    document_to_word_freqs: HashMap<DocId, WordFrequencies>,
}

impl PostingIndex {
    /// Records every word of a new document with weight `1/N` per occurrence.
    /// An empty document still gets an (empty) forward entry.
    pub fn insert(&mut self, id: DocId, words: &[&str]) {
        let inv_word_count = 1.0 / words.len() as f64;
        let mut word_frequencies = WordFrequencies::new();
        for &word in words {
            let key = match self.word_to_document_freqs.get_key_value(word) {
                Some((key, _)) => Arc::clone(key),
                None => Arc::from(word),
            };
            *self
                .word_to_document_freqs
                .entry(Arc::clone(&key))
                .or_default()
                .entry(id)
                .or_default() += inv_word_count;
            *word_frequencies.entry(key).or_default() += inv_word_count;
        }
        self.document_to_word_freqs.insert(id, word_frequencies);
    }

    /// Drops the document from every posting it appears in and prunes postings
    /// left empty. Returns false when the document has no forward entry.
    pub fn remove(&mut self, execution: Execution, id: DocId) -> bool {
        let Some(word_frequencies) = self.document_to_word_freqs.remove(&id) else {
            return false;
        };
        // Each word's posting is an independent map, so they can be detached
        // and edited in parallel.
        let mut touched: Vec<(Arc<str>, DocumentFrequencies)> = word_frequencies
            .keys()
            .filter_map(|word| self.word_to_document_freqs.remove_entry(&**word))
            .collect();
        execution.for_each_mut(&mut touched, |(_, documents)| {
            documents.remove(&id);
        });
        for (word, documents) in touched {
            if !documents.is_empty() {
                self.word_to_document_freqs.insert(word, documents);
            }
        }
        true
    }

    pub fn postings(&self, word: &str) -> Option<&DocumentFrequencies> {
        self.word_to_document_freqs.get(word)
    }

    pub fn contains(&self, word: &str, id: DocId) -> bool {
        self.postings(word).is_some_and(|documents| documents.contains_key(&id))
    }

    pub fn word_frequencies(&self, id: DocId) -> Option<&WordFrequencies> {
        self.document_to_word_freqs.get(&id)
    }

    pub fn word_count(&self) -> usize { self.word_to_document_freqs.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(index: &PostingIndex) {
        for (word, documents) in &index.word_to_document_freqs {
            assert!(!documents.is_empty(), "empty posting for {word}");
            for id in documents.keys() {
                assert!(index.document_to_word_freqs[id].contains_key(word));
            }
        }
        for (id, words) in &index.document_to_word_freqs {
            for word in words.keys() {
                assert!(index.contains(word, *id));
            }
        }
    }

    #[test]
    fn repeated_words_accumulate_weight() {
        let mut index = PostingIndex::default();
        index.insert(2, &["snake", "map", "snake"]);
        let freqs = index.word_frequencies(2).unwrap();
        assert!((freqs["snake"] - 2.0 / 3.0).abs() < 1e-12);
        assert!((freqs["map"] - 1.0 / 3.0).abs() < 1e-12);
        assert!((index.postings("snake").unwrap()[&2] - 2.0 / 3.0).abs() < 1e-12);
        assert_consistent(&index);
    }

    #[test]
    fn word_keys_are_shared_between_views() {
        let mut index = PostingIndex::default();
        index.insert(0, &["cat"]);
        index.insert(1, &["cat"]);
        let (posting_key, _) = index.word_to_document_freqs.get_key_value("cat").unwrap();
        let (forward_key, _) = index.document_to_word_freqs[&1].get_key_value("cat").unwrap();
        assert!(Arc::ptr_eq(posting_key, forward_key));
    }

    #[test]
    fn empty_document_gets_empty_forward_entry() {
        let mut index = PostingIndex::default();
        index.insert(7, &[]);
        assert!(index.word_frequencies(7).unwrap().is_empty());
        assert_eq!(index.word_count(), 0);
    }

    #[test]
    fn remove_prunes_empty_postings() {
        for execution in [Execution::Sequential, Execution::Parallel] {
            let mut index = PostingIndex::default();
            index.insert(0, &["cat", "dog"]);
            index.insert(1, &["dog"]);
            assert!(index.remove(execution, 0));
            assert!(index.postings("cat").is_none());
            assert_eq!(index.postings("dog").unwrap().len(), 1);
            assert!(index.word_frequencies(0).is_none());
            assert!(!index.remove(execution, 0));
            assert_consistent(&index);
        }
    }
}
