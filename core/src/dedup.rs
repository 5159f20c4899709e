use crate::document::DocId;
use crate::index::SearchServer;
use std::collections::HashSet;
use std::sync::Arc;

/// Removes every document whose set of distinct words equals that of a
/// document with a smaller id. Term frequencies are ignored. Returns the
/// removed ids in ascending order.
pub fn remove_duplicates(server: &mut SearchServer) -> Vec<DocId> {
    let mut seen: HashSet<Vec<Arc<str>>> = HashSet::new();
    let mut duplicates = Vec::new();
    for id in server.document_ids() {
        let Ok(frequencies) = server.word_frequencies(id) else {
            continue;
        };
        let words: Vec<Arc<str>> = frequencies.keys().cloned().collect();
        if !seen.insert(words) {
            tracing::info!(id, "found duplicate document");
            duplicates.push(id);
        }
    }
    for &id in &duplicates {
        server.remove_document(id);
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStatus;

    #[test]
    fn keeps_the_first_of_each_word_set() {
        let mut server = SearchServer::from_stop_words_text("and with").unwrap();
        let documents = [
            (1, "funny pet and nasty rat"),
            (2, "funny pet with curly hair"),
            (3, "funny pet with curly hair"),
            (4, "funny pet and curly hair"),
            (5, "funny funny pet and nasty nasty rat"),
            (6, "funny pet and not very nasty rat"),
            (7, "very nasty rat and not very funny pet"),
            (8, "pet with rat and rat and rat"),
            (9, "nasty rat with curly hair"),
        ];
        for (id, text) in documents {
            server.add_document(id, text, DocumentStatus::Active, &[1, 2]).unwrap();
        }
        assert_eq!(server.document_count(), 9);
        assert_eq!(remove_duplicates(&mut server), vec![3, 4, 5, 7]);
        assert_eq!(server.document_ids().collect::<Vec<_>>(), vec![1, 2, 6, 8, 9]);
    }

    #[test]
    fn empty_documents_are_duplicates_of_each_other() {
        let mut server = SearchServer::from_stop_words_text("the").unwrap();
        server.add_document(1, "the", DocumentStatus::Active, &[]).unwrap();
        server.add_document(2, "", DocumentStatus::Active, &[]).unwrap();
        assert_eq!(remove_duplicates(&mut server), vec![2]);
        assert_eq!(server.document_count(), 1);
    }

    #[test]
    fn no_duplicates_removes_nothing() {
        let mut server = SearchServer::new(["x"]).unwrap();
        server.add_document(1, "a b", DocumentStatus::Active, &[]).unwrap();
        server.add_document(2, "a c", DocumentStatus::Active, &[]).unwrap();
        assert!(remove_duplicates(&mut server).is_empty());
        assert_eq!(server.document_count(), 2);
    }
}
