use crate::error::{QueryWordError, Result, SearchError};
use crate::tokenizer::{is_valid_word, StopWords, Tokenizer};

/// Whether plus and minus words are sorted and deduplicated after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Normalized,
    /// Token order with duplicates; callers deduplicate their own output.
    Raw,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'a> {
    pub plus_words: Vec<&'a str>,
    pub minus_words: Vec<&'a str>,
}

struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
    is_stop: bool,
}

fn parse_query_word<'a>(text: &'a str, stop_words: &StopWords) -> Result<QueryWord<'a>> {
    if text.is_empty() {
        return Err(SearchError::query_word(text, QueryWordError::Empty));
    }
    let (data, is_minus) = match text.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    if data.is_empty() {
        return Err(SearchError::query_word(text, QueryWordError::LoneMinus));
    }
    if data.starts_with('-') {
        return Err(SearchError::query_word(text, QueryWordError::DoubleMinus));
    }
    if !is_valid_word(data) {
        return Err(SearchError::query_word(text, QueryWordError::ControlCharacter));
    }
    Ok(QueryWord { data, is_minus, is_stop: stop_words.contains(data) })
}

fn sort_unique(words: &mut Vec<&str>) {
    words.sort_unstable();
    words.dedup();
}

impl<'a> Query<'a> {
    pub fn parse(
        text: &'a str,
        stop_words: &StopWords,
        tokenizer: Tokenizer,
        mode: QueryMode,
    ) -> Result<Self> {
        let mut query = Query::default();
        for token in tokenizer(text) {
            let word = parse_query_word(token, stop_words)?;
            if word.is_stop {
                continue;
            }
            if word.is_minus {
                query.minus_words.push(word.data);
            } else {
                query.plus_words.push(word.data);
            }
        }
        if let Some(word) = query.plus_words.iter().find(|w| query.minus_words.contains(w)) {
            return Err(SearchError::query_word(word, QueryWordError::PlusAndMinus));
        }
        if mode == QueryMode::Normalized {
            sort_unique(&mut query.plus_words);
            sort_unique(&mut query.minus_words);
        }
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::split_into_words;

    fn parse<'a>(text: &'a str, stop: &[&str], mode: QueryMode) -> Result<Query<'a>> {
        let stop_words = StopWords::new(stop).unwrap();
        Query::parse(text, &stop_words, split_into_words, mode)
    }

    fn reason(err: SearchError) -> QueryWordError {
        match err {
            SearchError::InvalidQueryWord { reason, .. } => reason,
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn splits_plus_and_minus_words() {
        let query = parse("dog -cat city -in", &["in", "the"], QueryMode::Normalized).unwrap();
        assert_eq!(query.plus_words, vec!["city", "dog"]);
        assert_eq!(query.minus_words, vec!["cat"]);
    }

    #[test]
    fn normalized_mode_dedups_and_raw_mode_keeps_order() {
        let normalized = parse("b a b -c -c", &[], QueryMode::Normalized).unwrap();
        assert_eq!(normalized.plus_words, vec!["a", "b"]);
        assert_eq!(normalized.minus_words, vec!["c"]);

        let raw = parse("b a b -c -c", &[], QueryMode::Raw).unwrap();
        assert_eq!(raw.plus_words, vec!["b", "a", "b"]);
        assert_eq!(raw.minus_words, vec!["c", "c"]);
    }

    #[test]
    fn rejects_malformed_words() {
        let cases = [
            ("cat -", QueryWordError::LoneMinus),
            ("--cat", QueryWordError::DoubleMinus),
            ("ca\x11t", QueryWordError::ControlCharacter),
            ("-ca\x11t", QueryWordError::ControlCharacter),
        ];
        for (text, expected) in cases {
            let err = parse(text, &[], QueryMode::Normalized).unwrap_err();
            assert_eq!(reason(err), expected, "{text:?}");
        }
    }

    #[test]
    fn rejects_word_used_as_plus_and_minus() {
        let err = parse("cat dog -cat", &[], QueryMode::Normalized).unwrap_err();
        assert_eq!(err, SearchError::query_word("cat", QueryWordError::PlusAndMinus));
    }

    #[test]
    fn stop_words_vanish_from_both_sets() {
        let query = parse("the -the", &["the"], QueryMode::Normalized).unwrap();
        assert_eq!(query, Query::default());
    }

    #[test]
    fn empty_token_from_tokenizer_is_rejected() {
        fn split_on_commas(text: &str) -> Vec<&str> {
            text.split(',').collect()
        }
        let stop_words = StopWords::default();
        for mode in [QueryMode::Normalized, QueryMode::Raw] {
            let err = Query::parse("cat,,dog", &stop_words, split_on_commas, mode).unwrap_err();
            assert_eq!(err, SearchError::query_word("", QueryWordError::Empty));
        }
    }

    #[test]
    fn minus_inside_word_is_plain_text() {
        let query = parse("e-mail", &[], QueryMode::Normalized).unwrap();
        assert_eq!(query.plus_words, vec!["e-mail"]);
    }
}
