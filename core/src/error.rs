use crate::document::DocId;
use thiserror::Error;

pub type Result<T, E = SearchError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("document id {0} is negative")]
    NegativeId(DocId),
    #[error("document id {0} is already indexed")]
    DuplicateId(DocId),
    #[error("document id {0} is not indexed")]
    UnknownId(DocId),
    #[error("word {0:?} is empty or contains a control character")]
    InvalidWord(String),
    #[error("stop word {0:?} contains a control character")]
    InvalidStopWord(String),
    #[error("query word {word:?} is invalid: {reason}")]
    InvalidQueryWord { word: String, reason: QueryWordError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryWordError {
    #[error("empty word")]
    Empty,
    #[error("lone minus sign")]
    LoneMinus,
    #[error("starts with a double minus")]
    DoubleMinus,
    #[error("contains a control character")]
    ControlCharacter,
    #[error("used both as a plus and a minus word")]
    PlusAndMinus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Id,
    Content,
    Parse,
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::NegativeId(_)
            | SearchError::DuplicateId(_)
            | SearchError::UnknownId(_) => ErrorKind::Id,
            SearchError::InvalidWord(_) | SearchError::InvalidStopWord(_) => ErrorKind::Content,
            SearchError::InvalidQueryWord { .. } => ErrorKind::Parse,
        }
    }

    pub(crate) fn query_word(word: &str, reason: QueryWordError) -> Self {
        SearchError::InvalidQueryWord { word: word.to_string(), reason }
    }
}
