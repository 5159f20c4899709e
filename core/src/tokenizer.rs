use crate::error::{Result, SearchError};
use std::collections::BTreeSet;

/// Splits raw text into word slices borrowed from it.
pub type Tokenizer = for<'a> fn(&'a str) -> Vec<&'a str>;

/// Split on the ASCII space only. Tabs and newlines stay inside words, where
/// they are rejected as control characters.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|w| !w.is_empty()).collect()
}

/// A word is valid when it has no byte below the ASCII space.
pub fn is_valid_word(word: &str) -> bool {
    !word.bytes().any(|b| b < b' ')
}

/// Words ignored both when indexing and when querying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords(BTreeSet<String>);

impl StopWords {
    /// Empty strings are skipped; a word with a control character is an error.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidStopWord(word.to_string()));
            }
            set.insert(word.to_string());
        }
        Ok(Self(set))
    }

    pub fn contains(&self, word: &str) -> bool { self.0.contains(word) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ { self.0.iter().map(String::as_str) }
}
