//! In-memory TF-IDF search index with plus/minus query words and
//! sequential or parallel ranking.
//!
//! Queries are parsed inside the index; callers only pass raw query text.
//!
//! ```compile_fail
//! use search_core::query::QueryMode;
//! ```

pub mod batch;
pub mod concurrent_map;
pub mod corpus;
pub mod dedup;
pub mod document;
pub mod error;
pub mod execution;
pub mod index;
mod matcher;
mod postings;
mod query;
mod ranking;
pub mod tokenizer;

pub use concurrent_map::ConcurrentMap;
pub use corpus::{CorpusError, DocumentRecord, LoadStats};
pub use document::{DocId, Document, DocumentData, DocumentStatus, Rating};
pub use error::{ErrorKind, QueryWordError, Result, SearchError};
pub use execution::Execution;
pub use index::SearchServer;
pub use ranking::{EPSILON, MAX_RESULT_DOCUMENT_COUNT};
pub use tokenizer::{split_into_words, Tokenizer};
