use crate::concurrent_map::ConcurrentMap;
use crate::document::{DocId, Document, DocumentStatus, Rating};
use crate::error::Result;
use crate::execution::Execution;
use crate::index::SearchServer;
use crate::query::{Query, QueryMode};

pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;
/// Relevances closer than this are ranked by rating instead.
pub const EPSILON: f64 = 1e-6;

impl SearchServer {
    /// Up to [`MAX_RESULT_DOCUMENT_COUNT`] best documents for the query,
    /// ranked by TF-IDF relevance and then by rating. `predicate` receives
    /// id, status and rating of each candidate before it is scored.
    pub fn find_top_documents<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, Rating) -> bool + Sync,
    {
        self.find_top_documents_with(Execution::Sequential, raw_query, predicate)
    }

    /// Only documents with exactly this status.
    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents(raw_query, move |_, document_status, _| document_status == status)
    }

    pub fn find_top_documents_with<P>(
        &self,
        execution: Execution,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, Rating) -> bool + Sync,
    {
        let query = self.parse_query(raw_query, QueryMode::Normalized)?;
        let mut matched = self.find_all_documents(execution, &query, &predicate);
        sort_by_relevance(&mut matched);
        matched.truncate(MAX_RESULT_DOCUMENT_COUNT);
        tracing::trace!(query = raw_query, ?execution, hits = matched.len(), "ranked query");
        Ok(matched)
    }

    fn find_all_documents<P>(
        &self,
        execution: Execution,
        query: &Query<'_>,
        predicate: &P,
    ) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, Rating) -> bool + Sync,
    {
        let document_to_relevance: ConcurrentMap<DocId, f64> =
            ConcurrentMap::new(execution.bucket_count());

        execution.for_each(&query.plus_words, |word| {
            let Some(postings) = self.index.postings(word) else {
                return;
            };
            let inverse_document_freq = self.inverse_document_freq(postings.len());
            for (&id, &term_freq) in postings {
                let Some(data) = self.documents.get(&id) else {
                    continue;
                };
                if predicate(id, data.status, data.rating) {
                    *document_to_relevance.access(id) += term_freq * inverse_document_freq;
                }
            }
        });

        // Starts only after every plus word has been accumulated.
        execution.for_each(&query.minus_words, |word| {
            if let Some(postings) = self.index.postings(word) {
                for id in postings.keys() {
                    document_to_relevance.erase(*id);
                }
            }
        });

        document_to_relevance
            .build_ordinary_map()
            .into_iter()
            .filter_map(|(id, relevance)| {
                self.documents.get(&id).map(|data| Document::new(id, relevance, data.rating))
            })
            .collect()
    }
}

/// Descending relevance. Neighbours within [`EPSILON`] form a tie group
/// ordered by descending rating, then ascending id.
pub(crate) fn sort_by_relevance(documents: &mut [Document]) {
    documents.sort_by(|lhs, rhs| rhs.relevance.total_cmp(&lhs.relevance));
    let mut start = 0;
    while start < documents.len() {
        let mut end = start + 1;
        while end < documents.len()
            && (documents[end - 1].relevance - documents[end].relevance).abs() < EPSILON
        {
            end += 1;
        }
        documents[start..end]
            .sort_by(|lhs, rhs| rhs.rating.cmp(&lhs.rating).then(lhs.id.cmp(&rhs.id)));
        start = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(documents: &[Document]) -> Vec<DocId> {
        documents.iter().map(|d| d.id).collect()
    }

    fn animals() -> SearchServer {
        let mut server = SearchServer::new(Vec::<&str>::new()).unwrap();
        server.add_document(0, "cat dog", DocumentStatus::Active, &[1]).unwrap();
        server.add_document(1, "dog", DocumentStatus::Active, &[1]).unwrap();
        server.add_document(2, "snake map snake", DocumentStatus::Active, &[1]).unwrap();
        server
    }

    #[test]
    fn single_match_has_tf_times_idf() {
        let found = animals().find_top_documents_by_status("cat", DocumentStatus::Active).unwrap();
        assert_eq!(ids(&found), vec![0]);
        assert!((found[0].relevance - 3f64.ln() / 2.0).abs() < EPSILON);
        assert_eq!(found[0].rating, 1);
    }

    #[test]
    fn shared_word_ranks_by_term_frequency() {
        let found = animals().find_top_documents_by_status("dog", DocumentStatus::Active).unwrap();
        assert_eq!(ids(&found), vec![1, 0]);
        assert!((found[0].relevance - 1.5f64.ln()).abs() < EPSILON);
        assert!((found[1].relevance - 1.5f64.ln() / 2.0).abs() < EPSILON);
    }

    #[test]
    fn multi_word_query_sums_contributions() {
        let found = animals()
            .find_top_documents_by_status("cat dog snake", DocumentStatus::Active)
            .unwrap();
        assert_eq!(ids(&found), vec![0, 2, 1]);
        let expected = 3f64.ln() / 2.0 + 1.5f64.ln() / 2.0;
        assert!((found[0].relevance - expected).abs() < EPSILON);
        assert!((found[1].relevance - 3f64.ln() * 2.0 / 3.0).abs() < EPSILON);
    }

    #[test]
    fn ties_are_broken_by_rating() {
        let mut server = SearchServer::new(Vec::<&str>::new()).unwrap();
        for (id, rating) in [(1, 1), (2, 2), (3, 3), (4, 4)] {
            server.add_document(id, "cat", DocumentStatus::Active, &[rating]).unwrap();
        }
        let found = server.find_top_documents("cat", |_, _, rating| rating < 4).unwrap();
        assert_eq!(ids(&found), vec![3, 2, 1]);
    }

    #[test]
    fn status_filter_matches_exactly() {
        let mut server = SearchServer::new(Vec::<&str>::new()).unwrap();
        server.add_document(1, "cat", DocumentStatus::Active, &[1]).unwrap();
        server.add_document(3, "cat", DocumentStatus::Irrelevant, &[3]).unwrap();
        server.add_document(4, "cat", DocumentStatus::Banned, &[4]).unwrap();
        server.add_document(6, "cat", DocumentStatus::Irrelevant, &[6]).unwrap();
        let removed = server.find_top_documents_by_status("cat", DocumentStatus::Removed).unwrap();
        assert!(removed.is_empty());
        let found = server.find_top_documents_by_status("cat", DocumentStatus::Irrelevant).unwrap();
        assert_eq!(ids(&found), vec![6, 3]);
    }

    #[test]
    fn predicate_sees_id_status_and_rating() {
        let mut server = SearchServer::new(Vec::<&str>::new()).unwrap();
        server.add_document(1, "cat", DocumentStatus::Active, &[1]).unwrap();
        server.add_document(2, "cat", DocumentStatus::Active, &[2]).unwrap();
        server.add_document(3, "cat", DocumentStatus::Irrelevant, &[3]).unwrap();
        let found = server
            .find_top_documents("cat", |id, status, _| id > 1 && status == DocumentStatus::Active)
            .unwrap();
        assert_eq!(ids(&found), vec![2]);
    }

    #[test]
    fn results_are_truncated() {
        let mut server = SearchServer::new(Vec::<&str>::new()).unwrap();
        for id in 0..20 {
            server.add_document(id, "cat", DocumentStatus::Active, &[id]).unwrap();
        }
        let found = server.find_top_documents_by_status("cat", DocumentStatus::Active).unwrap();
        assert_eq!(found.len(), MAX_RESULT_DOCUMENT_COUNT);
        assert_eq!(ids(&found), vec![19, 18, 17, 16, 15]);
    }

    #[test]
    fn unknown_words_and_empty_queries_return_nothing() {
        let server = animals();
        for query in ["horse", "", "-cat"] {
            let found = server.find_top_documents_by_status(query, DocumentStatus::Active).unwrap();
            assert!(found.is_empty(), "{query:?} found {found:?}");
        }
    }

    #[test]
    fn invalid_query_is_an_error() {
        let result = animals().find_top_documents_by_status("cat --dog", DocumentStatus::Active);
        assert!(result.is_err());
    }

    #[test]
    fn sort_groups_near_equal_relevance() {
        let mut documents = vec![
            Document::new(1, 0.5, 1),
            Document::new(2, 0.5 + EPSILON / 10.0, 0),
            Document::new(3, 0.9, -5),
            Document::new(4, 0.5, 7),
        ];
        sort_by_relevance(&mut documents);
        assert_eq!(ids(&documents), vec![3, 4, 1, 2]);
    }
}
