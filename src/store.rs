//! Trait definitions for the engine's external collaborators.
//!
//! The coordinator never talks to a database or the network itself; it
//! consumes a [`LexiconStore`] (the backing data store's query surface)
//! and a [`ConjugationAnalyzer`] (the morphological analyzer). Both are
//! implemented elsewhere and injected, which keeps this crate an
//! in-process orchestration layer and makes every component testable
//! with in-memory fakes.

use crate::error::SearchError;
use crate::types::{
    Dialect, ReverseConjugationCandidate, RootId, VerbAggregate, VerbRecord, WordAggregate,
};

/// Query surface of the backing data store.
///
/// Zero matches are never an error: lookups return `Ok(vec![])` or
/// `Ok(None)`. The one exception is [`try_find_root_id`], which fails
/// with [`SearchError::AmbiguousRoot`] if more than one root record
/// matches a canonical form — a data invariant violation the engine
/// refuses to guess around.
///
/// All implementations must be `Send + Sync` for concurrent source queries.
///
/// [`try_find_root_id`]: LexiconStore::try_find_root_id
pub trait LexiconStore: Send + Sync {
    /// Prefix/substring match over word surface forms.
    fn find_words_by_spelling(
        &self,
        filter: &str,
        offset: usize,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<WordAggregate>, SearchError>> + Send;

    /// Match over word translations.
    fn find_words_by_translation(
        &self,
        filter: &str,
        offset: usize,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<WordAggregate>, SearchError>> + Send;

    /// Match over verb translations.
    fn find_verbs_by_translation(
        &self,
        filter: &str,
        offset: usize,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<VerbAggregate>, SearchError>> + Send;

    /// Resolve a canonical root form to its backing-store id.
    ///
    /// Returns `Ok(None)` for zero matches and
    /// [`SearchError::AmbiguousRoot`] for more than one match.
    fn try_find_root_id(
        &self,
        canonical_root: &str,
    ) -> impl std::future::Future<Output = Result<Option<RootId>, SearchError>> + Send;

    /// All verb records derived from the given root.
    fn verbs_of_root(
        &self,
        root_id: RootId,
    ) -> impl std::future::Future<Output = Result<Vec<VerbRecord>, SearchError>> + Send;
}

/// The morphological reverse-analyzer.
///
/// Maps a (possibly partially vocalized) conjugated surface form back to
/// candidate root + grammatical-parameter tuples. Treated as a pure
/// function: no side effects, and the returned candidates are already
/// ordered by the analyzer's own confidence.
pub trait ConjugationAnalyzer: Send + Sync {
    /// Analyze a surface form under the given dialect's feature set.
    fn analyze(&self, dialect: Dialect, surface: &str) -> Vec<ReverseConjugationCandidate>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RootProjection, StemParams, WordId};

    /// An in-memory store fake for testing trait bounds and async execution.
    struct FakeStore {
        words: Vec<WordAggregate>,
    }

    impl LexiconStore for FakeStore {
        async fn find_words_by_spelling(
            &self,
            filter: &str,
            _offset: usize,
            _limit: usize,
        ) -> Result<Vec<WordAggregate>, SearchError> {
            Ok(self
                .words
                .iter()
                .filter(|w| w.surface.starts_with(filter))
                .cloned()
                .collect())
        }

        async fn find_words_by_translation(
            &self,
            _filter: &str,
            _offset: usize,
            _limit: usize,
        ) -> Result<Vec<WordAggregate>, SearchError> {
            Ok(vec![])
        }

        async fn find_verbs_by_translation(
            &self,
            _filter: &str,
            _offset: usize,
            _limit: usize,
        ) -> Result<Vec<VerbAggregate>, SearchError> {
            Ok(vec![])
        }

        async fn try_find_root_id(
            &self,
            _canonical_root: &str,
        ) -> Result<Option<RootId>, SearchError> {
            Ok(None)
        }

        async fn verbs_of_root(&self, _root_id: RootId) -> Result<Vec<VerbRecord>, SearchError> {
            Ok(vec![])
        }
    }

    struct FakeAnalyzer;

    impl ConjugationAnalyzer for FakeAnalyzer {
        fn analyze(&self, _dialect: Dialect, surface: &str) -> Vec<ReverseConjugationCandidate> {
            vec![ReverseConjugationCandidate {
                root: RootProjection {
                    canonical: surface.to_string(),
                },
                params: StemParams {
                    stem: 1,
                    stem1_context: None,
                },
                raw_score: 1.0,
            }]
        }
    }

    #[test]
    fn fakes_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FakeStore>();
        assert_send_sync::<FakeAnalyzer>();
    }

    #[tokio::test]
    async fn fake_store_spelling_filter() {
        let store = FakeStore {
            words: vec![WordAggregate {
                id: WordId(1),
                surface: "درس".into(),
                translation: "lesson".into(),
            }],
        };
        let hits = store
            .find_words_by_spelling("در", 0, 10)
            .await
            .expect("lookup succeeds");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, WordId(1));

        let misses = store
            .find_words_by_spelling("كتب", 0, 10)
            .await
            .expect("lookup succeeds");
        assert!(misses.is_empty());
    }

    #[test]
    fn analyzer_is_pure_and_ordered() {
        let analyzer = FakeAnalyzer;
        let first = analyzer.analyze(Dialect::Msa, "درس");
        let second = analyzer.analyze(Dialect::Msa, "درس");
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].root, second[0].root);
    }
}
